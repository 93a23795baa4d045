//! Elitist genetic algorithm for the planar Traveling Salesman Problem.
//!
//! A chromosome is a tour: a permutation of city indices with a cached
//! closed-tour length (its fitness; lower is better). Two flat populations
//! are allocated once; each generation copies the elite, breeds the rest
//! from elite parents, mutates the offspring, and re-sorts.
//!
//! # Key Types
//!
//! - [`TspConfig`]: Run parameters (sizes, elitism, epochs, parallelism)
//! - [`TspRunner`]: Executes the generational loop
//! - [`TspResult`]: Best tour, its length, and progress history
//! - [`Population`]: Flat-backed chromosome storage
//! - [`TspError`]: Fatal conditions of a run
//!
//! # Submodules
//!
//! - [`operators`]: Order-preserving crossover, swap mutation, pre-drawn choices
//! - [`selection`]: Deterministic merge sort by fitness
//! - [`fitness`]: Parallel tour-length evaluation
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
mod error;
pub mod fitness;
pub mod operators;
mod population;
mod runner;
pub mod selection;

pub use config::TspConfig;
pub use error::TspError;
pub use population::{is_permutation, Population};
pub use runner::{Checkpoint, TspResult, TspRunner};
