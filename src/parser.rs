//! DIMACS CNF reader shared by all four procedures.

use crate::errors::*;
use crate::{Clause, Lit};
use regex::Regex;
use std::fs::File;
use std::io;
use std::io::BufRead;

/// A parsed DIMACS CNF formula.
pub struct Dimacs {
    /// Number of variables: the header value, raised to the largest
    /// variable actually mentioned by a clause.
    pub n_vars: usize,
    /// Number of clauses declared by the header, zero if no header was seen.
    pub n_clauses: usize,
    /// The clauses, in file order. A bare `0` yields an empty clause.
    pub clauses: Vec<Clause>,
}

impl Dimacs {
    /// Returns true if some clause is empty.
    pub fn has_empty_clause(&self) -> bool {
        self.clauses.iter().any(|cl| cl.lits.is_empty())
    }
}

/// Parse a DIMACS CNF file.
pub fn parse_dimacs_file(filename: &str) -> Result<Dimacs> {
    let file = File::open(filename).chain_err(|| format!("could not open {}", filename))?;
    let mut reader = io::BufReader::new(file);
    parse_dimacs_from_buf_reader(&mut reader)
}

/// Parse DIMACS CNF from a buffer reader.
///
/// Comment lines (`c ...`) and empty lines are skipped. A clause ends at
/// the `0` token, not at the newline, so a clause may span several lines.
/// The `p cnf N M` header is optional; without it the variable count is
/// derived from the literals seen.
pub fn parse_dimacs_from_buf_reader<F>(reader: &mut F) -> Result<Dimacs>
where
    F: BufRead,
{
    let re_header = Regex::new(r"p\s+cnf\s+(\d+)\s+(\d+)").unwrap();
    let re_number = Regex::new(r"(-?\d+)").unwrap();

    let mut n_vars = 0usize;
    let mut n_clauses = 0usize;
    let mut clauses = vec![];
    let mut current: Vec<Lit> = vec![];
    let mut in_clause = false;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('c') {
            continue;
        }
        if line.starts_with('p') {
            if let Some(cap) = re_header.captures(line) {
                n_vars = cap[1].parse()?;
                n_clauses = cap[2].parse()?;
            }
            continue;
        }
        for cap in re_number.captures_iter(line) {
            let l = cap[1].parse::<i32>()?;
            if l == 0 {
                clauses.push(Clause {
                    lits: std::mem::replace(&mut current, vec![]),
                });
                in_clause = false;
            } else {
                let var = l.unsigned_abs() as usize;
                if var > n_vars {
                    n_vars = var;
                }
                current.push(Lit(l));
                in_clause = true;
            }
        }
    }

    if in_clause {
        return Err("clause not terminated by 0".into());
    }

    Ok(Dimacs {
        n_vars,
        n_clauses,
        clauses,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Dimacs> {
        parse_dimacs_from_buf_reader(&mut input.as_bytes())
    }

    #[test]
    fn parses_header_comments_and_clauses() {
        let d = parse("c a comment\np cnf 3 2\n1 -2 0\n2 3 0\n").unwrap();
        assert_eq!(d.n_vars, 3);
        assert_eq!(d.n_clauses, 2);
        assert_eq!(d.clauses.len(), 2);
        assert_eq!(d.clauses[0].lits, vec![Lit(1), Lit(-2)]);
        assert_eq!(d.clauses[1].lits, vec![Lit(2), Lit(3)]);
    }

    #[test]
    fn clause_may_span_multiple_lines() {
        let d = parse("p cnf 4 1\n1 -2\n3\n-4 0\n").unwrap();
        assert_eq!(d.clauses.len(), 1);
        assert_eq!(d.clauses[0].lits, vec![Lit(1), Lit(-2), Lit(3), Lit(-4)]);
    }

    #[test]
    fn several_clauses_on_one_line() {
        let d = parse("p cnf 2 2\n1 0 -2 0\n").unwrap();
        assert_eq!(d.clauses.len(), 2);
        assert_eq!(d.clauses[0].lits, vec![Lit(1)]);
        assert_eq!(d.clauses[1].lits, vec![Lit(-2)]);
    }

    #[test]
    fn bare_zero_is_an_empty_clause() {
        let d = parse("p cnf 2 1\n0\n").unwrap();
        assert_eq!(d.clauses.len(), 1);
        assert!(d.has_empty_clause());
    }

    #[test]
    fn header_is_optional() {
        let d = parse("1 2 0\n-3 0\n").unwrap();
        assert_eq!(d.n_vars, 3);
        assert_eq!(d.n_clauses, 0);
        assert_eq!(d.clauses.len(), 2);
    }

    #[test]
    fn variable_count_raised_past_header() {
        let d = parse("p cnf 2 1\n1 -5 0\n").unwrap();
        assert_eq!(d.n_vars, 5);
    }

    #[test]
    fn missing_terminator_is_an_error() {
        assert!(parse("p cnf 2 1\n1 -2\n").is_err());
    }

    #[test]
    fn empty_lines_are_ignored() {
        let d = parse("\np cnf 1 1\n\n1 0\n\n").unwrap();
        assert_eq!(d.clauses.len(), 1);
    }
}
