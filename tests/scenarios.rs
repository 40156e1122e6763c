//! End-to-end scenarios through the DIMACS front-end.

use foursat::cdcl::{self, SolverOptions};
use foursat::{dp, dpll, parser, resolution, Verdict};

fn parse(input: &str) -> parser::Dimacs {
    parser::parse_dimacs_from_buf_reader(&mut input.as_bytes()).expect("valid dimacs")
}

fn cdcl_verdict(input: &str) -> Verdict {
    cdcl::Solver::new_from_dimacs(parse(input), SolverOptions::with_seed(42)).solve()
}

fn check_model(input: &str, model: &[bool]) {
    for cl in &parse(input).clauses {
        assert!(
            cl.lits.iter().any(|&l| {
                if l.is_positive() {
                    model[l.var()]
                } else {
                    !model[l.var()]
                }
            }),
            "clause {:?} not satisfied by model {:?}",
            cl,
            model
        );
    }
}

const TRIVIAL_SAT: &str = "p cnf 1 1\n1 0\n";
const TRIVIAL_UNSAT: &str = "p cnf 1 2\n1 0\n-1 0\n";
const EMPTY_CLAUSE: &str = "p cnf 2 1\n0\n";
const CHAIN: &str = "p cnf 4 4\n1 0\n-1 2 0\n-2 3 0\n-3 4 0\n";

const PIGEONHOLE_3_2: &str = "\
c three pigeons, two holes
p cnf 6 9
1 2 0
3 4 0
5 6 0
-1 -3 0
-1 -5 0
-3 -5 0
-2 -4 0
-2 -6 0
-4 -6 0
";

const K3_COLORING: &str = "\
c triangle, three colours
p cnf 9 12
1 2 3 0
4 5 6 0
7 8 9 0
-1 -4 0
-2 -5 0
-3 -6 0
-4 -7 0
-5 -8 0
-6 -9 0
-1 -7 0
-2 -8 0
-3 -9 0
";

#[test]
fn trivial_sat() {
    assert_eq!(cdcl_verdict(TRIVIAL_SAT), Verdict::Sat);
}

#[test]
fn trivial_unsat() {
    assert_eq!(cdcl_verdict(TRIVIAL_UNSAT), Verdict::Unsat);
}

#[test]
fn empty_clause_up_front_is_unsat_without_search() {
    let mut solver = cdcl::Solver::new_from_dimacs(parse(EMPTY_CLAUSE), SolverOptions::default());
    assert_eq!(solver.solve(), Verdict::Unsat);
    assert_eq!(solver.n_picks(), 0);
}

#[test]
fn pigeonhole_is_unsat() {
    assert_eq!(cdcl_verdict(PIGEONHOLE_3_2), Verdict::Unsat);
}

#[test]
fn triangle_coloring_is_sat_with_a_valid_model() {
    let mut solver =
        cdcl::Solver::new_from_dimacs(parse(K3_COLORING), SolverOptions::with_seed(42));
    assert_eq!(solver.solve(), Verdict::Sat);
    check_model(K3_COLORING, &solver.model());
}

#[test]
fn implication_chain_needs_no_branching() {
    let mut solver = cdcl::Solver::new_from_dimacs(parse(CHAIN), SolverOptions::default());
    assert_eq!(solver.solve(), Verdict::Sat);
    assert_eq!(solver.n_picks(), 0);
    assert_eq!(solver.model(), vec![true, true, true, true]);
}

#[test]
fn baselines_agree_on_the_scenarios() {
    let cases = [
        (TRIVIAL_SAT, Verdict::Sat),
        (TRIVIAL_UNSAT, Verdict::Unsat),
        (EMPTY_CLAUSE, Verdict::Unsat),
        (PIGEONHOLE_3_2, Verdict::Unsat),
        (CHAIN, Verdict::Sat),
    ];
    for &(input, expected) in &cases {
        assert_eq!(dpll::Solver::new_from_dimacs(parse(input)).solve(), expected);
        assert_eq!(dp::Solver::new_from_dimacs(parse(input)).solve(), expected);
        assert_eq!(
            resolution::Solver::new_from_dimacs(parse(input)).solve(false),
            expected
        );
    }
}
