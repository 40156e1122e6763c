//! Decision by saturation under pairwise resolution.

use crate::errors::*;
use crate::parser::{self, Dimacs};
use crate::{Lit, Verdict};
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::fs::File;
use std::io;

type LitSet = BTreeSet<Lit>;

/// Decision by resolution closure: saturate the clause set under
/// pairwise resolution until either the empty clause appears (UNSAT)
/// or a round adds nothing new (SAT).
pub struct Solver {
    clauses: BTreeSet<LitSet>,
}

impl Solver {
    /// Read a formula in DIMACS format from a file.
    pub fn new_from_file(filename: &str) -> Result<Self> {
        let file = File::open(filename).chain_err(|| format!("could not open {}", filename))?;
        let mut reader = io::BufReader::new(file);
        Ok(Solver::new_from_dimacs(parser::parse_dimacs_from_buf_reader(
            &mut reader,
        )?))
    }

    /// Build a solver from a parsed DIMACS formula.
    pub fn new_from_dimacs(dimacs: Dimacs) -> Self {
        Solver {
            clauses: dimacs
                .clauses
                .into_iter()
                .map(|cl| cl.lits.into_iter().collect())
                .collect(),
        }
    }

    /// Returns the number of distinct input clauses.
    pub fn n_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// Run the closure. With `parallel` set, each round's pair scan is
    /// distributed over a thread pool; the verdict does not depend on
    /// the choice.
    pub fn solve(&self, parallel: bool) -> Verdict {
        let mut clauses = self.clauses.clone();
        if clauses.iter().any(|cl| cl.is_empty()) {
            return Verdict::Unsat;
        }
        loop {
            let all: Vec<&LitSet> = clauses.iter().collect();
            let resolvents = round(&all, parallel);
            if resolvents.iter().any(|cl| cl.is_empty()) {
                return Verdict::Unsat;
            }
            let before = clauses.len();
            clauses.extend(resolvents);
            if clauses.len() == before {
                return Verdict::Sat;
            }
        }
    }
}

fn round(all: &[&LitSet], parallel: bool) -> Vec<LitSet> {
    if parallel {
        all.par_iter()
            .enumerate()
            .flat_map_iter(|(i, c1)| {
                all[i + 1..]
                    .iter()
                    .filter_map(|c2| resolve_pair(c1, c2))
                    .collect::<Vec<_>>()
            })
            .collect()
    } else {
        let mut out = vec![];
        for (i, c1) in all.iter().enumerate() {
            for c2 in &all[i + 1..] {
                if let Some(r) = resolve_pair(c1, c2) {
                    out.push(r);
                }
            }
        }
        out
    }
}

/// Resolve two clauses on the first complementary literal pair, if any.
/// Tautological resolvents are discarded.
fn resolve_pair(c1: &LitSet, c2: &LitSet) -> Option<LitSet> {
    let &pivot = c1.iter().find(|&&lit| c2.contains(&!lit))?;
    let resolvent: LitSet = c1
        .iter()
        .filter(|&&l| l != pivot)
        .chain(c2.iter().filter(|&&l| l != !pivot))
        .copied()
        .collect();
    if resolvent.iter().any(|&l| resolvent.contains(&!l)) {
        return None;
    }
    Some(resolvent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solver(raw: &[&[i32]]) -> Solver {
        Solver {
            clauses: raw
                .iter()
                .map(|cl| cl.iter().map(|&l| Lit(l)).collect())
                .collect(),
        }
    }

    fn set(raw: &[i32]) -> LitSet {
        raw.iter().map(|&l| Lit(l)).collect()
    }

    #[test]
    fn resolves_on_first_complementary_pair() {
        let r = resolve_pair(&set(&[1, 2]), &set(&[-1, 3])).unwrap();
        assert_eq!(r, set(&[2, 3]));
    }

    #[test]
    fn no_resolvent_without_complementary_pair() {
        assert!(resolve_pair(&set(&[1, 2]), &set(&[2, 3])).is_none());
    }

    #[test]
    fn tautological_resolvent_is_discarded() {
        // Resolving on 1 leaves both 2 and -2.
        assert!(resolve_pair(&set(&[1, 2]), &set(&[-1, -2])).is_none());
    }

    #[test]
    fn unit_contradiction_derives_the_empty_clause() {
        let s = solver(&[&[1], &[-1]]);
        assert_eq!(s.solve(false), Verdict::Unsat);
    }

    #[test]
    fn satisfiable_formula_saturates() {
        let s = solver(&[&[1, 2], &[-1, 3], &[-2, -3]]);
        assert_eq!(s.solve(false), Verdict::Sat);
    }

    #[test]
    fn chained_implications_to_a_contradiction() {
        let s = solver(&[&[1], &[-1, 2], &[-2, 3], &[-3]]);
        assert_eq!(s.solve(false), Verdict::Unsat);
    }

    #[test]
    fn parallel_scan_agrees_with_sequential() {
        let formulas: &[&[&[i32]]] = &[
            &[&[1], &[-1]],
            &[&[1, 2], &[-1, 3], &[-2, -3]],
            &[&[1, 2], &[-1, 2], &[1, -2], &[-1, -2]],
        ];
        for raw in formulas {
            let s = solver(raw);
            assert_eq!(s.solve(false), s.solve(true));
        }
    }

    #[test]
    fn empty_input_clause_is_unsat() {
        let s = solver(&[&[1, 2], &[]]);
        assert_eq!(s.solve(false), Verdict::Unsat);
    }
}
