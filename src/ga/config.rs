//! GA configuration.
//!
//! [`TspConfig`] holds all parameters that control the evolutionary loop.

use super::error::TspError;

/// Configuration for the TSP genetic algorithm.
///
/// Controls problem size, population size, elitism, termination,
/// reporting, and parallelism. All sizes are fixed for the whole run.
///
/// # Defaults
///
/// ```
/// use u_tspga::ga::TspConfig;
///
/// let config = TspConfig::default();
/// assert_eq!(config.epochs, 500);
/// assert_eq!(config.seed, 12345);
/// assert_eq!(config.n_cities, 250);
/// assert_eq!(config.population_size, 40_000);
/// assert_eq!(config.elite_count(), 4_000);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_tspga::ga::TspConfig;
///
/// let config = TspConfig::default()
///     .with_n_cities(50)
///     .with_population_size(1_000)
///     .with_elite_ratio(0.2)
///     .with_epochs(100)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TspConfig {
    /// Number of generations to run after the initial population is sorted.
    ///
    /// Zero is allowed and returns the best of the initial population.
    pub epochs: usize,

    /// Seed of the run's single pseudo-random stream.
    pub seed: u32,

    /// Number of cities. Must match the city slice handed to the runner.
    pub n_cities: usize,

    /// Number of chromosomes in the population.
    pub population_size: usize,

    /// Fraction of the population preserved as elites (0.0–1.0).
    ///
    /// Elite chromosomes are copied unchanged to the next generation and
    /// are the only parents used for crossover.
    pub elite_ratio: f64,

    /// Mutation rounds applied to the identity population before the first
    /// evaluation.
    pub init_mutations: usize,

    /// Generations between progress checkpoints (offset by one).
    ///
    /// Set to 0 to disable periodic checkpoints; the final check always runs.
    pub report_interval: usize,

    /// Whether checkpoints validate every chromosome instead of only the best.
    pub validate_all: bool,

    /// Whether to run the data-parallel phases on rayon workers.
    pub parallel: bool,

    /// Size of a dedicated worker pool.
    ///
    /// `None` uses rayon's global pool. Ignored when `parallel` is false.
    pub threads: Option<usize>,
}

impl Default for TspConfig {
    fn default() -> Self {
        Self {
            epochs: 500,
            seed: 12345,
            n_cities: 250,
            population_size: 40_000,
            elite_ratio: 0.1,
            init_mutations: 10,
            report_interval: 50,
            validate_all: false,
            parallel: true,
            threads: None,
        }
    }
}

impl TspConfig {
    /// Sets the number of generations.
    pub fn with_epochs(mut self, n: usize) -> Self {
        self.epochs = n;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the number of cities.
    pub fn with_n_cities(mut self, n: usize) -> Self {
        self.n_cities = n;
        self
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the elite ratio.
    pub fn with_elite_ratio(mut self, ratio: f64) -> Self {
        self.elite_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Sets the number of initial mutation rounds.
    pub fn with_init_mutations(mut self, n: usize) -> Self {
        self.init_mutations = n;
        self
    }

    /// Sets the checkpoint interval (0 to disable).
    pub fn with_report_interval(mut self, n: usize) -> Self {
        self.report_interval = n;
        self
    }

    /// Enables or disables whole-population validation at checkpoints.
    pub fn with_validate_all(mut self, validate_all: bool) -> Self {
        self.validate_all = validate_all;
        self
    }

    /// Enables or disables parallel phases.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Runs on a dedicated pool of `n` worker threads.
    pub fn with_threads(mut self, n: usize) -> Self {
        self.threads = Some(n);
        self
    }

    /// Number of elite chromosomes: `floor(population_size × elite_ratio)`.
    pub fn elite_count(&self) -> usize {
        (self.population_size as f64 * self.elite_ratio) as usize
    }

    /// Number of offspring produced per generation.
    pub fn offspring_count(&self) -> usize {
        self.population_size.saturating_sub(self.elite_count())
    }

    /// Whether `generation` is a progress checkpoint.
    ///
    /// With the default interval of 50 these are generations 1, 51, 101, ...
    pub fn is_checkpoint(&self, generation: usize) -> bool {
        let k = self.report_interval;
        k > 0 && generation % k == 1 % k
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), TspError> {
        if self.n_cities == 0 {
            return Err(invalid("n_cities must be at least 1"));
        }
        if self.population_size < 2 {
            return Err(invalid("population_size must be at least 2"));
        }
        if u32::try_from(self.n_cities).is_err() {
            return Err(invalid("n_cities exceeds the u32 index range"));
        }
        if u32::try_from(self.population_size).is_err() {
            return Err(invalid("population_size exceeds the u32 index range"));
        }
        let elite_count = self.elite_count();
        if elite_count == 0 {
            return Err(invalid("elite_ratio too low: no parents for crossover"));
        }
        if elite_count >= self.population_size {
            return Err(invalid(
                "elite_ratio too high: elites fill entire population",
            ));
        }
        if self.threads == Some(0) {
            return Err(invalid("threads must be positive or None"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> TspError {
    TspError::InvalidConfig(msg.into())
}
