//! Decision by recursive DPLL with unit propagation.

use crate::errors::*;
use crate::parser::{self, Dimacs};
use crate::{Clause, LBool, Lit, Var, Verdict};
use std::fs::File;
use std::io;

/// Decision by recursive DPLL: unit propagation with a per-call undo
/// log, chronological backtracking, branching on the first unassigned
/// variable with True tried before False.
pub struct Solver {
    clauses: Vec<Clause>,
    values: Vec<LBool>,
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
            values: vec![LBool::Undef; dimacs.n_vars],
            clauses: dimacs.clauses,
        }
    }

    /// Decide satisfiability.
    pub fn solve(&mut self) -> Verdict {
        if self.search() {
            Verdict::Sat
        } else {
            Verdict::Unsat
        }
    }

    /// The assignment found by a SAT run; unassigned variables read as
    /// false.
    pub fn model(&self) -> Vec<bool> {
        self.values.iter().map(|&x| x == LBool::True).collect()
    }

    fn value_lit(&self, lit: Lit) -> LBool {
        if lit.is_positive() {
            self.values[lit.var()]
        } else {
            !self.values[lit.var()]
        }
    }

    /// True if any literal is true, False if all are false, Undef
    /// otherwise.
    fn evaluate(&self, clause: &Clause) -> LBool {
        let mut unresolved = false;
        for &lit in &clause.lits {
            match self.value_lit(lit) {
                LBool::True => return LBool::True,
                LBool::False => {}
                LBool::Undef => unresolved = true,
            }
        }
        if unresolved {
            LBool::Undef
        } else {
            LBool::False
        }
    }

    /// Assign forced literals until fixpoint, logging every assignment
    /// in `changes`; false on a falsified clause.
    fn unit_propagate(&mut self, changes: &mut Vec<Var>) -> bool {
        let mut changed = true;
        while changed {
            changed = false;
            for ci in 0..self.clauses.len() {
                let mut unassigned = None;
                let mut unassigned_count = 0;
                let mut satisfied = false;
                for &lit in &self.clauses[ci].lits {
                    match self.value_lit(lit) {
                        LBool::True => {
                            satisfied = true;
                            break;
                        }
                        LBool::False => {}
                        LBool::Undef => {
                            unassigned = Some(lit);
                            unassigned_count += 1;
                        }
                    }
                }
                if satisfied {
                    continue;
                }
                if unassigned_count == 0 {
                    return false;
                }
                if unassigned_count == 1 {
                    if let Some(lit) = unassigned {
                        self.values[lit.var()] = lit.is_positive().into();
                        changes.push(lit.var());
                        changed = true;
                    }
                }
            }
        }
        true
    }

    fn undo(&mut self, changes: &[Var]) {
        for &v in changes {
            self.values[v] = LBool::Undef;
        }
    }

    fn search(&mut self) -> bool {
        let mut changes = vec![];

        if !self.unit_propagate(&mut changes) {
            self.undo(&changes);
            return false;
        }

        let mut all_satisfied = true;
        for ci in 0..self.clauses.len() {
            match self.evaluate(&self.clauses[ci]) {
                LBool::False => {
                    self.undo(&changes);
                    return false;
                }
                LBool::Undef => all_satisfied = false,
                LBool::True => {}
            }
        }
        if all_satisfied {
            return true;
        }

        let var = match self.values.iter().position(|&v| v == LBool::Undef) {
            Some(v) => v,
            None => {
                self.undo(&changes);
                return false;
            }
        };

        self.values[var] = LBool::True;
        if self.search() {
            return true;
        }
        self.values[var] = LBool::False;
        if self.search() {
            return true;
        }
        self.values[var] = LBool::Undef;

        self.undo(&changes);
        false
    }
}
