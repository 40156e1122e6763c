//! Decision by Davis-Putnam variable elimination.

use crate::errors::*;
use crate::parser::{self, Dimacs};
use crate::{Lit, Var, Verdict};
use std::collections::BTreeSet;
use std::fs::File;
use std::io;

type LitSet = BTreeSet<Lit>;
type Cnf = Vec<LitSet>;

/// Decision by Davis-Putnam variable elimination: unit propagation,
/// a pure-literal pass, then replacing all clauses over the smallest
/// remaining variable by their cross-resolvents.
pub struct Solver {
    clauses: Cnf,
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

    /// Decide satisfiability.
    pub fn solve(&self) -> Verdict {
        if davis_putnam(self.clauses.clone()) {
            Verdict::Sat
        } else {
            Verdict::Unsat
        }
    }
}

fn davis_putnam(mut cnf: Cnf) -> bool {
    if contains_empty_clause(&cnf) {
        return false;
    }
    if cnf.is_empty() {
        return true;
    }

    if !unit_propagate(&mut cnf) {
        return false;
    }
    eliminate_pure_literals(&mut cnf);
    if cnf.is_empty() {
        return true;
    }
    if contains_empty_clause(&cnf) {
        return false;
    }

    let var = match cnf
        .iter()
        .flat_map(|cl| cl.iter().map(|l| l.var()))
        .min()
    {
        Some(v) => v,
        None => return true,
    };
    davis_putnam(resolve_on_variable(&cnf, var))
}

fn contains_empty_clause(cnf: &Cnf) -> bool {
    cnf.iter().any(|cl| cl.is_empty())
}

fn remove_clauses_with_literal(cnf: &mut Cnf, lit: Lit) {
    cnf.retain(|cl| !cl.contains(&lit));
}

fn remove_literal_from_clauses(cnf: &mut Cnf, lit: Lit) {
    for cl in cnf.iter_mut() {
        cl.remove(&lit);
    }
}

/// Apply unit clauses until none remain; false if an empty clause
/// appears along the way.
fn unit_propagate(cnf: &mut Cnf) -> bool {
    loop {
        let unit = cnf
            .iter()
            .find(|cl| cl.len() == 1)
            .and_then(|cl| cl.iter().next().copied());
        match unit {
            Some(lit) => {
                remove_clauses_with_literal(cnf, lit);
                remove_literal_from_clauses(cnf, !lit);
            }
            None => break,
        }
    }
    !contains_empty_clause(cnf)
}

/// One pass over the literals seen in the formula, removing every
/// clause containing a literal whose negation never occurs. New pure
/// literals created by a removal wait for the next recursion step.
fn eliminate_pure_literals(cnf: &mut Cnf) {
    let mut occurring: BTreeSet<Lit> = BTreeSet::new();
    for cl in cnf.iter() {
        occurring.extend(cl.iter().copied());
    }
    for &lit in &occurring {
        if !occurring.contains(&!lit) {
            remove_clauses_with_literal(cnf, lit);
        }
    }
}

/// Replace every clause mentioning `var` by the cross-product of
/// resolvents on it.
fn resolve_on_variable(cnf: &Cnf, var: Var) -> Cnf {
    let pos_lit = Lit::new(var, true);
    let mut pos_clauses = vec![];
    let mut neg_clauses = vec![];
    let mut rest = vec![];
    for cl in cnf {
        if cl.contains(&pos_lit) {
            pos_clauses.push(cl);
        } else if cl.contains(&!pos_lit) {
            neg_clauses.push(cl);
        } else {
            rest.push(cl.clone());
        }
    }

    let mut resolvents = rest;
    for c1 in &pos_clauses {
        for c2 in &neg_clauses {
            let resolvent: LitSet = c1
                .iter()
                .filter(|&&l| l != pos_lit)
                .chain(c2.iter().filter(|&&l| l != !pos_lit))
                .copied()
                .collect();
            resolvents.push(resolvent);
        }
    }
    resolvents
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cnf(raw: &[&[i32]]) -> Cnf {
        raw.iter()
            .map(|cl| cl.iter().map(|&l| Lit(l)).collect())
            .collect()
    }

    fn solver(raw: &[&[i32]]) -> Solver {
        Solver { clauses: cnf(raw) }
    }

    #[test]
    fn unit_propagation_simplifies() {
        let mut f = cnf(&[&[1], &[-1, 2], &[-2, 3]]);
        assert!(unit_propagate(&mut f));
        assert!(f.is_empty());
    }

    #[test]
    fn unit_propagation_detects_contradiction() {
        let mut f = cnf(&[&[1], &[-1]]);
        assert!(!unit_propagate(&mut f));
    }

    #[test]
    fn pure_literal_pass_is_one_shot() {
        // 3 is pure; removing its clause makes -2 pure, but that is
        // left for the next recursion step.
        let mut f = cnf(&[&[3, 2], &[-2, 1], &[-1, -2]]);
        eliminate_pure_literals(&mut f);
        assert_eq!(f, cnf(&[&[-2, 1], &[-1, -2]]));
    }

    #[test]
    fn cross_resolution_eliminates_the_variable() {
        let f = cnf(&[&[1, 2], &[1, 3], &[-1, 4], &[2, 4]]);
        let reduced = resolve_on_variable(&f, 0);
        assert_eq!(reduced, cnf(&[&[2, 4], &[2, 4], &[3, 4]]));
    }

    #[test]
    fn trivially_satisfiable() {
        assert_eq!(solver(&[&[1]]).solve(), Verdict::Sat);
        assert_eq!(solver(&[]).solve(), Verdict::Sat);
    }

    #[test]
    fn contradictory_units_are_unsat() {
        assert_eq!(solver(&[&[1], &[-1]]).solve(), Verdict::Unsat);
    }

    #[test]
    fn two_variable_contradiction_is_unsat() {
        let s = solver(&[&[1, 2], &[-1, 2], &[1, -2], &[-1, -2]]);
        assert_eq!(s.solve(), Verdict::Unsat);
    }

    #[test]
    fn satisfiable_after_elimination() {
        let s = solver(&[&[1, 2], &[-1, 3], &[-2, -3], &[2, 3]]);
        assert_eq!(s.solve(), Verdict::Sat);
    }

    #[test]
    fn empty_input_clause_is_unsat() {
        assert_eq!(solver(&[&[1], &[]]).solve(), Verdict::Unsat);
    }
}
