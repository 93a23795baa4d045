//! Error type for the TSP genetic algorithm.

use std::collections::TryReserveError;

/// Errors raised by the GA.
///
/// None of these are recoverable mid-run: a run either completes every
/// generation with valid populations or stops with one of these.
#[derive(Debug, thiserror::Error)]
pub enum TspError {
    /// A tour is not a permutation of all cities.
    ///
    /// This signals a defect in the generation pipeline, never bad input.
    #[error("chromosome {index} is not a valid permutation of cities{}", generation_suffix(.generation))]
    InvalidPermutation {
        /// Generation at which the check failed (`None` for checks outside
        /// the generation loop).
        generation: Option<usize>,
        /// Index of the offending chromosome in the sorted population.
        index: usize,
    },

    /// Backing storage for populations could not be reserved.
    #[error("failed to allocate {what}")]
    Allocation {
        what: &'static str,
        #[source]
        source: TryReserveError,
    },

    /// Run parameters are inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The dedicated worker pool could not be started.
    #[error("failed to build worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

fn generation_suffix(generation: &Option<usize>) -> String {
    match generation {
        Some(g) => format!(" (generation {g})"),
        None => String::new(),
    }
}
