use super::clause_db::{ClauseDb, ClauseIndex};
use super::solver_options::SolverOptions;
use super::trail::Trail;
use super::var_manager::VarManager;
use crate::errors::*;
use crate::parser::{self, Dimacs};
use crate::{Clause, LBool, Lit, Var, Verdict};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Outcome of a propagation pass.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Propagation {
    Normal,
    Conflict,
}

enum ClauseState {
    Satisfied,
    Falsified,
    Unit(Lit),
    Pending,
}

/// A CDCL solver: trail-style assignment, iterative unit propagation,
/// First-UIP conflict analysis with non-chronological backjumping, and
/// a frequency/polarity branching heuristic with periodic decay.
pub struct Solver {
    clause_db: ClauseDb,
    vars: VarManager,
    trail: Trail,
    /// Index of the clause falsified by the most recent propagation.
    kappa: Option<ClauseIndex>,
    pick_counter: usize,
    already_unsatisfied: bool,
    options: SolverOptions,
    rng: StdRng,
}

impl Solver {
    /// Create a solver over `n_vars` variables and the given clauses.
    pub fn new(n_vars: usize, clauses: Vec<Clause>, options: SolverOptions) -> Self {
        let vars = VarManager::new(n_vars, &clauses);
        let mut clause_db = ClauseDb::new();
        let mut already_unsatisfied = false;
        for cl in clauses {
            if cl.lits.is_empty() {
                already_unsatisfied = true;
            }
            clause_db.add_original(cl);
        }
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Solver {
            clause_db,
            vars,
            trail: Trail::new(),
            kappa: None,
            pick_counter: 0,
            already_unsatisfied,
            options,
            rng,
        }
    }

    /// Create a solver from a parsed DIMACS formula.
    pub fn new_from_dimacs(dimacs: Dimacs, options: SolverOptions) -> Self {
        Solver::new(dimacs.n_vars, dimacs.clauses, options)
    }

    /// Read a formula in DIMACS format from a file.
    pub fn new_from_file(filename: &str, options: SolverOptions) -> Result<Self> {
        Ok(Solver::new_from_dimacs(
            parser::parse_dimacs_file(filename)?,
            options,
        ))
    }

    /// Returns the number of variables in the formula.
    pub fn n_vars(&self) -> usize {
        self.vars.n_vars()
    }

    /// Returns the number of original clauses in the formula.
    pub fn n_clauses(&self) -> usize {
        self.clause_db.n_original()
    }

    /// Returns the number of learnt clauses.
    pub fn n_learnts(&self) -> usize {
        self.clause_db.n_learnt()
    }

    /// The learnt clauses, in the order they were derived.
    pub fn learnt_clauses(&self) -> impl Iterator<Item = &Clause> {
        self.clause_db.learnts()
    }

    /// Returns the assignment of the variable.
    pub fn value(&self, x: Var) -> LBool {
        self.vars.value(x)
    }

    /// The current assignment as booleans; after a SAT verdict this is a
    /// model of the formula.
    pub fn model(&self) -> Vec<bool> {
        self.vars.model()
    }

    /// Number of branching picks since the last heuristic decay.
    pub fn n_picks(&self) -> usize {
        self.pick_counter
    }

    /// Decide satisfiability.
    pub fn solve(&mut self) -> Verdict {
        if self.already_unsatisfied {
            return Verdict::Unsat;
        }
        if self.unit_propagate() == Propagation::Conflict {
            return Verdict::Unsat;
        }
        while !self.vars.all_assigned() {
            let lit = self.pick_branching_lit();
            self.trail.new_level();
            self.assign(lit, self.trail.decision_level(), None);
            loop {
                if self.unit_propagate() == Propagation::Normal {
                    break;
                }
                if self.trail.decision_level() == 0 {
                    return Verdict::Unsat;
                }
                match self.kappa {
                    Some(kappa) => {
                        self.conflict_analysis_and_backjump(kappa);
                    }
                    None => break,
                }
            }
        }
        Verdict::Sat
    }

    fn assign(&mut self, lit: Lit, dl: i32, ante: Option<ClauseIndex>) {
        self.vars.assign(lit, dl, ante);
        self.trail.push(lit.var());
    }

    fn classify(&self, ci: ClauseIndex) -> ClauseState {
        let cl = self.clause_db.get(ci);
        let mut unset = None;
        let mut unset_count = 0;
        let mut false_count = 0;
        for &lit in &cl.lits {
            match self.vars.value_lit(lit) {
                LBool::True => return ClauseState::Satisfied,
                LBool::False => false_count += 1,
                LBool::Undef => {
                    unset_count += 1;
                    unset = Some(lit);
                }
            }
        }
        if unset_count == 1 {
            if let Some(lit) = unset {
                return ClauseState::Unit(lit);
            }
        }
        if false_count == cl.lits.len() {
            ClauseState::Falsified
        } else {
            ClauseState::Pending
        }
    }

    /// Scan all clauses in index order until a full pass assigns
    /// nothing. Every unit assignment restarts the scan from the first
    /// clause, keeping the propagation order deterministic.
    fn unit_propagate(&mut self) -> Propagation {
        // TODO: two watched literals per clause instead of full rescans
        let dl = self.trail.decision_level();
        let mut unit_found = true;
        while unit_found {
            unit_found = false;
            for ci in 0..self.clause_db.len() {
                match self.classify(ci) {
                    ClauseState::Satisfied | ClauseState::Pending => {}
                    ClauseState::Unit(lit) => {
                        self.assign(lit, dl, Some(ci));
                        unit_found = true;
                        break;
                    }
                    ClauseState::Falsified => {
                        self.kappa = Some(ci);
                        return Propagation::Conflict;
                    }
                }
            }
        }
        self.kappa = None;
        Propagation::Normal
    }

    /// Resolve the First-UIP learnt clause out of the implication graph,
    /// record it, and unwind the trail to the backjump level, which is
    /// returned.
    fn conflict_analysis_and_backjump(&mut self, kappa: ClauseIndex) -> i32 {
        let dl = self.trail.decision_level();
        let mut learnt = self.clause_db.get(kappa).clone();

        loop {
            let mut this_level_count = 0;
            let mut resolver = None;
            for &lit in &learnt.lits {
                let v = lit.var();
                if self.vars.level(v) == dl {
                    this_level_count += 1;
                    if self.vars.antecedent(v).is_some() {
                        resolver = Some(v);
                    }
                }
            }
            if this_level_count == 1 {
                break;
            }
            match resolver {
                Some(v) => learnt = self.resolve(learnt, v),
                None => break,
            }
        }

        self.vars.record_learnt(&learnt);
        let beta = learnt
            .lits
            .iter()
            .map(|l| self.vars.level(l.var()))
            .filter(|&lv| lv != dl)
            .max()
            .unwrap_or(0);
        self.clause_db.add_learnt(learnt);

        for v in self.trail.backjump_to(beta) {
            self.vars.unassign(v);
        }
        beta
    }

    /// Resolve `clause` with the antecedent of `v`, removing both
    /// phases of `v` and normalizing to the canonical form: ascending
    /// signed-integer order without duplicates.
    fn resolve(&self, mut clause: Clause, v: Var) -> Clause {
        if let Some(ante) = self.vars.antecedent(v) {
            let other = self.clause_db.get(ante);
            clause.lits.extend_from_slice(&other.lits);
        }
        let pivot = Lit::new(v, true);
        clause.lits.retain(|&l| l != pivot && l != !pivot);
        clause.lits.sort();
        clause.lits.dedup();
        clause
    }

    /// Pick the next decision literal: decay on schedule, then the
    /// highest-frequency unassigned variable in its preferred phase.
    fn pick_branching_lit(&mut self) -> Lit {
        let n = self.vars.n_vars();
        debug_assert!(self.vars.n_assigned() < n);

        if self.pick_counter > self.options.decay_interval_per_var * n {
            self.vars.decay();
            self.pick_counter = 0;
        }

        if let Some(v) = self.vars.max_freq_var() {
            self.pick_counter += 1;
            return self.vars.polarity_lit(v);
        }

        // Unreachable while the freq sentinel invariant holds; kept as
        // a bounded random fallback.
        for _ in 0..self.options.fallback_draws_per_var * n {
            let v = self.rng.gen_range(0..n);
            if self.vars.freq(v) != -1 {
                return self.vars.polarity_lit(v);
            }
        }
        Lit(1)
    }
}
