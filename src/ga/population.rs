//! Flat-backed population of tour chromosomes.
//!
//! All tours of a population live in one contiguous `Vec<u32>` of
//! `size × n_cities` cells; chromosome `i` occupies
//! `genes[i * n_cities..(i + 1) * n_cities]`. Fitness values live in a
//! parallel `Vec<f32>`. Storage is reserved once and never reallocated.

use super::error::TspError;

/// A fixed-size population of tours and their cached lengths.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    pub(crate) n_cities: usize,
    pub(crate) genes: Vec<u32>,
    pub(crate) fitness: Vec<f32>,
}

impl Population {
    /// Allocates `size` chromosomes, each holding the identity tour
    /// `0, 1, ..., n_cities - 1` with fitness `f32::INFINITY`.
    ///
    /// # Errors
    /// [`TspError::Allocation`] if the backing storage cannot be reserved,
    /// [`TspError::InvalidConfig`] if `n_cities` is zero or does not fit
    /// a `u32` city index.
    pub fn identity(size: usize, n_cities: usize) -> Result<Self, TspError> {
        if n_cities == 0 || u32::try_from(n_cities).is_err() {
            return Err(TspError::InvalidConfig(format!(
                "cannot build tours over {n_cities} cities"
            )));
        }
        let cells = size.checked_mul(n_cities).ok_or_else(|| {
            TspError::InvalidConfig(format!(
                "population of {size} x {n_cities} cities overflows"
            ))
        })?;

        let mut genes: Vec<u32> = Vec::new();
        genes
            .try_reserve_exact(cells)
            .map_err(|source| TspError::Allocation {
                what: "population tours",
                source,
            })?;
        let mut fitness: Vec<f32> = Vec::new();
        fitness
            .try_reserve_exact(size)
            .map_err(|source| TspError::Allocation {
                what: "population fitness",
                source,
            })?;

        for _ in 0..size {
            genes.extend(0..n_cities as u32);
        }
        fitness.resize(size, f32::INFINITY);

        Ok(Self {
            n_cities,
            genes,
            fitness,
        })
    }

    /// Builds a population from explicit tours.
    ///
    /// Tours are not checked for validity, only for length; see
    /// [`first_invalid`](Self::first_invalid).
    pub fn from_tours<T: AsRef<[u32]>>(n_cities: usize, tours: &[T]) -> Result<Self, TspError> {
        if n_cities == 0 {
            return Err(TspError::InvalidConfig(
                "cannot build tours over 0 cities".into(),
            ));
        }
        let mut genes = Vec::with_capacity(tours.len() * n_cities);
        for (i, tour) in tours.iter().enumerate() {
            let tour = tour.as_ref();
            if tour.len() != n_cities {
                return Err(TspError::InvalidConfig(format!(
                    "tour {i} has {} cities, expected {n_cities}",
                    tour.len()
                )));
            }
            genes.extend_from_slice(tour);
        }
        Ok(Self {
            n_cities,
            genes,
            fitness: vec![f32::INFINITY; tours.len()],
        })
    }

    /// Number of chromosomes.
    pub fn len(&self) -> usize {
        self.fitness.len()
    }

    /// Returns `true` if the population holds no chromosomes.
    pub fn is_empty(&self) -> bool {
        self.fitness.is_empty()
    }

    /// Number of cities per tour.
    pub fn n_cities(&self) -> usize {
        self.n_cities
    }

    /// Tour of chromosome `i`.
    pub fn tour(&self, i: usize) -> &[u32] {
        &self.genes[i * self.n_cities..(i + 1) * self.n_cities]
    }

    /// Mutable tour of chromosome `i`.
    ///
    /// Callers must restore the permutation invariant before the next
    /// evaluation; the cached fitness is stale until then.
    pub fn tour_mut(&mut self, i: usize) -> &mut [u32] {
        &mut self.genes[i * self.n_cities..(i + 1) * self.n_cities]
    }

    /// Cached fitness (closed tour length) of chromosome `i`.
    pub fn fitness(&self, i: usize) -> f32 {
        self.fitness[i]
    }

    /// All cached fitness values, in chromosome order.
    pub fn fitness_values(&self) -> &[f32] {
        &self.fitness
    }

    /// Iterates over all tours in chromosome order.
    pub fn tours(&self) -> std::slice::ChunksExact<'_, u32> {
        self.genes.chunks_exact(self.n_cities)
    }

    /// First chromosome's tour and fitness.
    ///
    /// After sorting this is the best chromosome.
    ///
    /// # Panics
    /// Panics if the population is empty.
    pub fn best(&self) -> (&[u32], f32) {
        (self.tour(0), self.fitness(0))
    }

    /// Whether chromosome `i` is a permutation of `[0, n_cities)`.
    pub fn is_valid(&self, i: usize) -> bool {
        is_permutation(self.tour(i))
    }

    /// Index of the first chromosome that is not a valid permutation.
    pub fn first_invalid(&self) -> Option<usize> {
        self.tours().position(|tour| !is_permutation(tour))
    }

    /// Copies the first `count` chromosomes (tours and fitness) of `other`.
    ///
    /// # Panics
    /// Panics if the populations differ in tour length or `count` exceeds
    /// either population.
    pub fn copy_prefix_from(&mut self, other: &Population, count: usize) {
        assert_eq!(self.n_cities, other.n_cities, "tour lengths differ");
        let cells = count * self.n_cities;
        self.genes[..cells].copy_from_slice(&other.genes[..cells]);
        self.fitness[..count].copy_from_slice(&other.fitness[..count]);
    }

    /// Overwrites `self` with `other`'s chromosomes rearranged by `order`:
    /// slot `k` receives chromosome `order[k]`.
    pub(crate) fn gather_from(&mut self, other: &Population, order: &[usize], parallel: bool) {
        use rayon::prelude::*;

        let n = self.n_cities;
        if parallel {
            self.genes
                .par_chunks_exact_mut(n)
                .zip(self.fitness.par_iter_mut())
                .zip(order.par_iter())
                .for_each(|((tour, fit), &src)| {
                    tour.copy_from_slice(other.tour(src));
                    *fit = other.fitness[src];
                });
        } else {
            for ((tour, fit), &src) in self
                .genes
                .chunks_exact_mut(n)
                .zip(self.fitness.iter_mut())
                .zip(order)
            {
                tour.copy_from_slice(other.tour(src));
                *fit = other.fitness[src];
            }
        }
    }
}

/// Whether `tour` visits every city in `[0, tour.len())` exactly once.
pub fn is_permutation(tour: &[u32]) -> bool {
    let mut seen = vec![false; tour.len()];
    for &city in tour {
        match seen.get_mut(city as usize) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_population() {
        let pop = Population::identity(3, 4).unwrap();
        assert_eq!(pop.len(), 3);
        assert_eq!(pop.n_cities(), 4);
        for tour in pop.tours() {
            assert_eq!(tour, &[0, 1, 2, 3]);
        }
        assert!(pop.fitness_values().iter().all(|f| f.is_infinite()));
        assert_eq!(pop.first_invalid(), None);
    }

    #[test]
    fn test_identity_rejects_zero_cities() {
        assert!(matches!(
            Population::identity(3, 0),
            Err(TspError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_identity_overflow() {
        assert!(Population::identity(usize::MAX, 2).is_err());
    }

    #[test]
    fn test_from_tours_checks_length() {
        assert!(Population::from_tours(3, &[vec![0u32, 1, 2], vec![2, 1]]).is_err());
        let pop = Population::from_tours(3, &[[0u32, 1, 2], [2, 1, 0]]).unwrap();
        assert_eq!(pop.tour(1), &[2, 1, 0]);
    }

    #[test]
    fn test_is_permutation() {
        assert!(is_permutation(&[]));
        assert!(is_permutation(&[0]));
        assert!(is_permutation(&[2, 0, 1]));
        assert!(!is_permutation(&[0, 0, 1]));
        assert!(!is_permutation(&[0, 1, 3]));
    }

    #[test]
    fn test_first_invalid() {
        let pop = Population::from_tours(3, &[[0u32, 1, 2], [1, 1, 2], [2, 1, 2]]).unwrap();
        assert!(pop.is_valid(0));
        assert!(!pop.is_valid(1));
        assert_eq!(pop.first_invalid(), Some(1));
    }

    #[test]
    fn test_tour_mut_is_isolated() {
        let mut pop = Population::identity(3, 4).unwrap();
        pop.tour_mut(1).swap(0, 3);
        assert_eq!(pop.tour(0), &[0, 1, 2, 3]);
        assert_eq!(pop.tour(1), &[3, 1, 2, 0]);
        assert_eq!(pop.tour(2), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_copy_prefix_from() {
        let src = Population::from_tours(3, &[[2u32, 1, 0], [1, 2, 0], [0, 2, 1]]).unwrap();
        let mut dst = Population::identity(3, 3).unwrap();
        dst.copy_prefix_from(&src, 2);
        assert_eq!(dst.tour(0), &[2, 1, 0]);
        assert_eq!(dst.tour(1), &[1, 2, 0]);
        assert_eq!(dst.tour(2), &[0, 1, 2]);
    }

    #[test]
    fn test_gather_from() {
        let mut src = Population::from_tours(2, &[[0u32, 1], [1, 0], [0, 1]]).unwrap();
        src.fitness = vec![3.0, 1.0, 2.0];
        for parallel in [false, true] {
            let mut dst = Population::identity(3, 2).unwrap();
            dst.gather_from(&src, &[1, 2, 0], parallel);
            assert_eq!(dst.fitness_values(), &[1.0, 2.0, 3.0]);
            assert_eq!(dst.tour(0), &[1, 0]);
            assert_eq!(dst.tour(1), &[0, 1]);
        }
    }
}
