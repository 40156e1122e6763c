use crate::cdcl::clause_db::ClauseIndex;
use crate::{Clause, LBool, Lit, Var};

/// Per-variable solver state: assignment, decision level, antecedent,
/// and the frequency/polarity counters driving the branching heuristic.
///
/// While a variable is assigned its `freq` holds the sentinel `-1`,
/// which keeps it out of the branching argmax; the persistent counter
/// lives in `orig_freq` and is restored on unassign.
pub struct VarManager {
    values: Vec<LBool>,
    level: Vec<i32>,
    antecedent: Vec<Option<ClauseIndex>>,
    freq: Vec<i64>,
    orig_freq: Vec<i64>,
    polarity: Vec<i64>,
    n_assigned: usize,
}

impl VarManager {
    /// Build the state for `n_vars` variables, counting occurrence
    /// frequencies and polarities over the input clauses.
    pub fn new(n_vars: usize, clauses: &[Clause]) -> Self {
        let mut freq = vec![0i64; n_vars];
        let mut polarity = vec![0i64; n_vars];
        for cl in clauses {
            for &lit in &cl.lits {
                freq[lit.var()] += 1;
                polarity[lit.var()] += if lit.is_positive() { 1 } else { -1 };
            }
        }
        VarManager {
            values: vec![LBool::Undef; n_vars],
            level: vec![-1; n_vars],
            antecedent: vec![None; n_vars],
            orig_freq: freq.clone(),
            freq,
            polarity,
            n_assigned: 0,
        }
    }

    pub fn n_vars(&self) -> usize {
        self.values.len()
    }

    pub fn n_assigned(&self) -> usize {
        self.n_assigned
    }

    pub fn all_assigned(&self) -> bool {
        self.n_assigned == self.values.len()
    }

    pub fn value(&self, v: Var) -> LBool {
        self.values[v]
    }

    pub fn value_lit(&self, p: Lit) -> LBool {
        if p.is_positive() {
            self.values[p.var()]
        } else {
            !self.values[p.var()]
        }
    }

    pub fn level(&self, v: Var) -> i32 {
        self.level[v]
    }

    pub fn antecedent(&self, v: Var) -> Option<ClauseIndex> {
        self.antecedent[v]
    }

    pub fn freq(&self, v: Var) -> i64 {
        self.freq[v]
    }

    /// Make the literal true at the given decision level.
    pub fn assign(&mut self, p: Lit, dl: i32, ante: Option<ClauseIndex>) {
        let v = p.var();
        debug_assert_eq!(self.values[v], LBool::Undef);
        self.values[v] = p.is_positive().into();
        self.level[v] = dl;
        self.antecedent[v] = ante;
        self.freq[v] = -1;
        self.n_assigned += 1;
    }

    /// Clear the assignment of `v`, restoring its frequency counter.
    pub fn unassign(&mut self, v: Var) {
        debug_assert_ne!(self.values[v], LBool::Undef);
        self.values[v] = LBool::Undef;
        self.level[v] = -1;
        self.antecedent[v] = None;
        self.freq[v] = self.orig_freq[v];
        self.n_assigned -= 1;
    }

    /// Bookkeeping for a freshly learnt clause: bump polarity and the
    /// frequency counters of every participating variable. Assigned
    /// variables only accumulate in `orig_freq` and pick the bump up
    /// when they are unassigned.
    pub fn record_learnt(&mut self, cl: &Clause) {
        for &lit in &cl.lits {
            let v = lit.var();
            self.polarity[v] += if lit.is_positive() { 1 } else { -1 };
            if self.freq[v] != -1 {
                self.freq[v] += 1;
            }
            self.orig_freq[v] += 1;
        }
    }

    /// Halve every persistent counter, and the live counter of every
    /// unassigned variable.
    pub fn decay(&mut self) {
        for v in 0..self.values.len() {
            self.orig_freq[v] /= 2;
            if self.freq[v] != -1 {
                self.freq[v] /= 2;
            }
        }
    }

    /// The unassigned variable with the highest frequency, ties broken
    /// by smallest index. `None` when every variable is assigned.
    pub fn max_freq_var(&self) -> Option<Var> {
        let mut best: Option<Var> = None;
        let mut max_freq = -1i64;
        for v in 0..self.values.len() {
            if self.freq[v] > max_freq {
                max_freq = self.freq[v];
                best = Some(v);
            }
        }
        best
    }

    /// The preferred-phase literal of `v`: positive unless the polarity
    /// counter has gone negative.
    pub fn polarity_lit(&self, v: Var) -> Lit {
        Lit::new(v, self.polarity[v] >= 0)
    }

    /// The current assignment as a vector of booleans; unassigned
    /// variables read as false.
    pub fn model(&self) -> Vec<bool> {
        self.values.iter().map(|&x| x == LBool::True).collect()
    }
}
