use clap::{App, Arg};
use foursat::cdcl::{self, SolverOptions};
use foursat::errors::*;
use foursat::{dp, dpll, parser, resolution, Verdict};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

fn main() {
    let matches = App::new("foursat")
        .version("0.1.0")
        .about("SAT solver: resolution, DP, DPLL and CDCL")
        .arg(
            Arg::with_name("file")
                .index(1)
                .required(true)
                .help("Input file in DIMACS CNF format"),
        )
        .arg(
            Arg::with_name("algorithm")
                .long("algorithm")
                .short("a")
                .takes_value(true)
                .possible_values(&["cdcl", "dpll", "dp", "resolution"])
                .default_value("cdcl")
                .help("Decision procedure to run"),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .takes_value(true)
                .help("Seed for the CDCL branching fallback"),
        )
        .arg(
            Arg::with_name("log")
                .long("log")
                .takes_value(true)
                .help("Append the result line to this file"),
        )
        .arg(
            Arg::with_name("parallel")
                .long("parallel")
                .help("Parallel pair scan in the resolution procedure"),
        )
        .get_matches();

    if let Err(e) = run(&matches) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(matches: &clap::ArgMatches) -> Result<()> {
    let filename = matches.value_of("file").expect("file is required");
    let dimacs = parser::parse_dimacs_file(filename)?;

    let mut options = SolverOptions::default();
    if let Some(seed) = matches.value_of("seed") {
        options.seed = Some(seed.parse().chain_err(|| "seed must be an integer")?);
    }

    let (verdict, elapsed) = match matches.value_of("algorithm") {
        Some("dpll") => {
            let mut solver = dpll::Solver::new_from_dimacs(dimacs);
            timed(|| solver.solve())
        }
        Some("dp") => {
            let solver = dp::Solver::new_from_dimacs(dimacs);
            timed(|| solver.solve())
        }
        Some("resolution") => {
            let solver = resolution::Solver::new_from_dimacs(dimacs);
            let parallel = matches.is_present("parallel");
            timed(|| solver.solve(parallel))
        }
        _ => {
            let mut solver = cdcl::Solver::new_from_dimacs(dimacs, options);
            timed(|| solver.solve())
        }
    };

    let ms = elapsed.as_secs_f64() * 1000.0;
    println!("{} in {:.3} ms", verdict, ms);

    if let Some(log) = matches.value_of("log") {
        let name = Path::new(filename)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| filename.to_string());
        let mut out = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log)
            .chain_err(|| format!("could not open {}", log))?;
        writeln!(out, "{}: {} in {:.3} ms", name, verdict, ms)?;
    }

    Ok(())
}

fn timed<F: FnOnce() -> Verdict>(solve: F) -> (Verdict, std::time::Duration) {
    let start = Instant::now();
    let verdict = solve();
    (verdict, start.elapsed())
}
