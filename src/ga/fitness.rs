//! Fitness evaluation.

use super::population::Population;
use crate::geometry::{tour_length, City};
use rayon::prelude::*;

/// Recomputes the fitness of every chromosome as its closed tour length.
///
/// Chromosomes are independent, so the parallel path splits the population
/// across rayon workers; each tour is still summed sequentially, which
/// keeps results identical to the sequential path.
pub fn evaluate(population: &mut Population, cities: &[City], parallel: bool) {
    let n = population.n_cities;
    if parallel {
        population
            .genes
            .par_chunks_exact(n)
            .zip(population.fitness.par_iter_mut())
            .for_each(|(tour, fit)| *fit = tour_length(cities, tour));
    } else {
        for (tour, fit) in population
            .genes
            .chunks_exact(n)
            .zip(population.fitness.iter_mut())
        {
            *fit = tour_length(cities, tour);
        }
    }
}
