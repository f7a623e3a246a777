#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The default maximum number of search rounds.
pub const DEFAULT_MAX_ROUNDS: usize = 50;

/// The default number of candidates kept after each round.
pub const DEFAULT_POPULATION: usize = 32;

/// The default number of rounds over which an unchanged best fitness stops the search.
pub const DEFAULT_STAGNATION_WINDOW: usize = 5;

/// Options that control the search done by a [`Solver`](super::Solver).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolveOptions {
    /// The maximum number of rounds to run.
    pub max_rounds: usize,

    /// The number of candidates kept after each round. The candidates with the highest fitness
    /// survive.
    pub population: usize,

    /// If the best fitness is identical over this many consecutive rounds, the search stops.
    ///
    /// A window of 0 disables stagnation detection.
    pub stagnation_window: usize,

    /// The number of worker threads used to expand candidates. With 1 thread, candidates are
    /// expanded on the calling thread.
    pub threads: usize,

    /// Whether to substitute every isolated input equation into the other input equations
    /// before the first round.
    pub seed_substitutions: bool,

    /// Whether to substitute isolated candidates into the other candidates after each round.
    pub substitute_isolated: bool,

    /// Whether to also add the basic simplification of each candidate (see
    /// [`rules::algebra`](crate::rules::algebra)) when it is expanded.
    pub reduce: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            population: DEFAULT_POPULATION,
            stagnation_window: DEFAULT_STAGNATION_WINDOW,
            threads: 1,
            seed_substitutions: true,
            substitute_isolated: true,
            reduce: true,
        }
    }
}

impl SolveOptions {
    /// Wraps the given [`SolveOptions`] into a builder for further customization.
    pub fn into_builder(self) -> SolveOptionsBuilder {
        SolveOptionsBuilder(self)
    }
}

/// Helper struct to build a [`SolveOptions`] struct.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SolveOptionsBuilder(SolveOptions);

impl SolveOptionsBuilder {
    /// Creates a new builder with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of rounds.
    pub fn max_rounds(mut self, max_rounds: usize) -> Self {
        self.0.max_rounds = max_rounds;
        self
    }

    /// Sets the number of candidates kept after each round. A population of 0 is treated as 1.
    pub fn population(mut self, population: usize) -> Self {
        self.0.population = population.max(1);
        self
    }

    /// Sets the stagnation window. See [`SolveOptions::stagnation_window`] for more information.
    pub fn stagnation_window(mut self, stagnation_window: usize) -> Self {
        self.0.stagnation_window = stagnation_window;
        self
    }

    /// Sets the number of worker threads. A count of 0 is treated as 1.
    pub fn threads(mut self, threads: usize) -> Self {
        self.0.threads = threads.max(1);
        self
    }

    /// Sets whether isolated input equations are substituted into each other before the search.
    pub fn seed_substitutions(mut self, seed_substitutions: bool) -> Self {
        self.0.seed_substitutions = seed_substitutions;
        self
    }

    /// Sets whether isolated candidates are substituted into the other candidates each round.
    pub fn substitute_isolated(mut self, substitute_isolated: bool) -> Self {
        self.0.substitute_isolated = substitute_isolated;
        self
    }

    /// Sets whether the basic simplification of each candidate is added when it is expanded.
    pub fn reduce(mut self, reduce: bool) -> Self {
        self.0.reduce = reduce;
        self
    }

    /// Builds the [`SolveOptions`] struct.
    pub fn build(self) -> SolveOptions {
        self.0
    }
}
