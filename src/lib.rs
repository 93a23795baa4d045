//! Parallel, seed-reproducible genetic algorithm for the planar
//! Traveling Salesman Problem.
//!
//! - [`rng`]: The single deterministic random stream of a run
//! - [`geometry`]: Cities, `f32` distances, tour length, city generation
//! - [`ga`]: Population model, operators, selection, and the generation loop
//!
//! # Reproducibility
//!
//! Every random choice is drawn from one [`rng::Lcg`] on the calling
//! thread, in a fixed order, before the data-parallel phases run. A run is
//! therefore fully determined by its seed and sizes; the number of worker
//! threads never changes the result.
//!
//! ```
//! use u_tspga::ga::{TspConfig, TspRunner};
//!
//! let config = TspConfig::default()
//!     .with_n_cities(10)
//!     .with_population_size(50)
//!     .with_epochs(10);
//! let (_, a) = TspRunner::solve(&config.clone().with_parallel(false)).unwrap();
//! let (_, b) = TspRunner::solve(&config.with_threads(2)).unwrap();
//! assert_eq!(a.best_tour, b.best_tour);
//! ```

pub mod ga;
pub mod geometry;
pub mod rng;
