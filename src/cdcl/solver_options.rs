/// Solver options.
#[derive(Clone, Copy, Debug)]
pub struct SolverOptions {
    /// Seed for the branching fallback RNG; `None` draws from entropy.
    pub seed: Option<u64>,
    /// The frequency counters are halved once the pick counter exceeds
    /// this many picks per variable.
    pub decay_interval_per_var: usize,
    /// Random fallback draws per variable before the heuristic gives up.
    pub fallback_draws_per_var: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        SolverOptions {
            seed: None,
            decay_interval_per_var: 20,
            fallback_draws_per_var: 10,
        }
    }
}

impl SolverOptions {
    /// Options with a fixed RNG seed, for reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        SolverOptions {
            seed: Some(seed),
            ..Default::default()
        }
    }
}
