//! GA generational loop execution.
//!
//! [`TspRunner`] orchestrates the complete evolutionary process:
//! initialization → evaluation → sort → {copy elite → mate → mutate →
//! promote → evaluate → sort → checkpoint}* → final check.
//!
//! Each phase completes for the whole population before the next one
//! starts. Inside a phase, chromosomes are processed independently (on
//! rayon workers when `parallel` is set), and every random choice of the
//! generation has already been drawn on the calling thread.

use super::config::TspConfig;
use super::error::TspError;
use super::fitness::evaluate;
use super::operators::{draw_mates, draw_swaps, mate, mutate};
use super::population::Population;
use super::selection::sort_population;
use crate::geometry::{random_cities, City};
use crate::rng::Lcg;

/// Progress snapshot taken at a checkpoint generation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Checkpoint {
    /// Zero-based generation index.
    pub generation: usize,
    /// Best tour length after that generation.
    pub best_distance: f32,
}

/// Result of a TSP GA run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TspResult {
    /// Best tour of the final sorted population.
    pub best_tour: Vec<u32>,

    /// Closed length of `best_tour`.
    pub best_distance: f32,

    /// Total number of generations executed.
    pub generations: usize,

    /// Best fitness of the initial population, then after each generation.
    pub fitness_history: Vec<f32>,

    /// Progress reports taken at checkpoint generations.
    pub checkpoints: Vec<Checkpoint>,
}

/// Executes the TSP GA generational loop.
///
/// # Usage
///
/// ```
/// use u_tspga::ga::{TspConfig, TspRunner};
///
/// let config = TspConfig::default()
///     .with_n_cities(12)
///     .with_population_size(60)
///     .with_epochs(20);
/// let (cities, result) = TspRunner::solve(&config).unwrap();
/// assert_eq!(cities.len(), 12);
/// assert_eq!(result.best_tour.len(), 12);
/// ```
pub struct TspRunner;

impl TspRunner {
    /// Generates `config.n_cities` random cities from `config.seed` and
    /// runs the GA on them with the same random stream.
    pub fn solve(config: &TspConfig) -> Result<(Vec<City>, TspResult), TspError> {
        let mut rng = Lcg::new(config.seed);
        let cities = random_cities(config.n_cities, &mut rng);
        let result = Self::run(&cities, config, &mut rng)?;
        Ok((cities, result))
    }

    /// Runs the GA over `cities`, drawing every random choice from `rng`.
    ///
    /// `config.seed` is not consulted; the caller owns the stream.
    ///
    /// # Errors
    /// - [`TspError::InvalidConfig`] if the configuration is invalid or
    ///   `cities.len() != config.n_cities`.
    /// - [`TspError::Allocation`] if the populations cannot be allocated.
    /// - [`TspError::ThreadPool`] if a dedicated pool cannot be started.
    /// - [`TspError::InvalidPermutation`] if a checkpoint finds a corrupted
    ///   tour. The run stops there.
    pub fn run(cities: &[City], config: &TspConfig, rng: &mut Lcg) -> Result<TspResult, TspError> {
        config.validate()?;
        if cities.len() != config.n_cities {
            return Err(TspError::InvalidConfig(format!(
                "got {} cities, configured for {}",
                cities.len(),
                config.n_cities
            )));
        }

        match config.threads {
            Some(threads) if config.parallel => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()?;
                pool.install(|| evolve(cities, config, rng))
            }
            _ => evolve(cities, config, rng),
        }
    }
}

fn evolve(cities: &[City], config: &TspConfig, rng: &mut Lcg) -> Result<TspResult, TspError> {
    let n = cities.len();
    let size = config.population_size;
    let elite = config.elite_count();
    let offspring = config.offspring_count();
    let parallel = config.parallel;

    tracing::info!(
        cities = n,
        population = size,
        elite,
        epochs = config.epochs,
        parallel,
        "starting TSP genetic algorithm"
    );

    // 1. Identity tours, shuffled by whole-population mutation rounds
    let mut current = Population::identity(size, n)?;
    let mut scratch = Population::identity(size, n)?;
    for _ in 0..config.init_mutations {
        let swaps = draw_swaps(rng, size, n);
        mutate(&mut current, 0, &swaps, parallel);
    }

    // 2. Evaluate and sort the initial population
    evaluate(&mut current, cities, parallel);
    sort_population(&mut current, &mut scratch, parallel);

    let mut fitness_history = Vec::with_capacity(config.epochs + 1);
    fitness_history.push(current.best().1);
    let mut checkpoints = Vec::new();

    // 3. Generational loop
    for gen in 0..config.epochs {
        // All draws of the generation, in stream order, before any dispatch
        let mates = draw_mates(rng, offspring, elite, n);
        let swaps = draw_swaps(rng, offspring, n);

        scratch.copy_prefix_from(&current, elite);
        mate(&current, elite, &mut scratch, &mates, parallel);
        mutate(&mut scratch, elite, &swaps, parallel);
        std::mem::swap(&mut current, &mut scratch);

        evaluate(&mut current, cities, parallel);
        sort_population(&mut current, &mut scratch, parallel);

        let best_distance = current.best().1;
        fitness_history.push(best_distance);
        tracing::debug!(generation = gen, best_distance, "generation complete");

        if config.is_checkpoint(gen) {
            tracing::info!(generation = gen, best_distance, "progress");
            checkpoints.push(Checkpoint {
                generation: gen,
                best_distance,
            });
            check_population(&current, Some(gen), config.validate_all)?;
        }
    }

    // 4. Final sanity check
    check_population(&current, None, config.validate_all)?;

    let (best_tour, best_distance) = current.best();
    tracing::info!(best_distance, "finished");

    Ok(TspResult {
        best_tour: best_tour.to_vec(),
        best_distance,
        generations: config.epochs,
        fitness_history,
        checkpoints,
    })
}

/// Verifies the best tour, or every tour when `all` is set.
fn check_population(
    population: &Population,
    generation: Option<usize>,
    all: bool,
) -> Result<(), TspError> {
    let invalid = if all {
        population.first_invalid()
    } else if population.is_valid(0) {
        None
    } else {
        Some(0)
    };

    match invalid {
        None => Ok(()),
        Some(index) => {
            tracing::error!(?generation, index, "tour is not a valid permutation of cities");
            Err(TspError::InvalidPermutation { generation, index })
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
