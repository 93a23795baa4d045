//! Permutation crossover and mutation operators.
//!
//! Operators come in two layers:
//!
//! - Tour-level primitives ([`order_crossover_into`], [`order_crossover`],
//!   [`swap_mutation`]) that work on `&[u32]` city-index tours.
//! - Population-level phases ([`mate`], [`mutate`]) that apply a primitive
//!   to every offspring slot, sequentially or across rayon workers.
//!
//! Phases never draw random numbers themselves. All choices of a phase are
//! drawn up front on the calling thread ([`draw_mates`], [`draw_swaps`]),
//! so the outcome for chromosome `k` depends only on draw `k`, not on which
//! worker processes it.
//!
//! # References
//!
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"
//! - Cicirello (2023), "Genetic Operators for Permutation Representation"

use super::population::Population;
use crate::rng::Lcg;
use rayon::prelude::*;

// ============================================================================
// Random draws
// ============================================================================

/// Parents and cut point for one offspring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MateDraw {
    /// Elite index supplying the prefix.
    pub first: usize,
    /// Elite index supplying the remaining cities, in its order.
    pub second: usize,
    /// Cut point: the prefix length taken from `first`.
    pub pos: usize,
}

/// Two tour positions to exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapDraw {
    pub a: usize,
    pub b: usize,
}

/// Draws `count` crossover choices, three values per offspring in the order
/// `first`, `second`, `pos`.
pub fn draw_mates(rng: &mut Lcg, count: usize, elite: usize, n_cities: usize) -> Vec<MateDraw> {
    (0..count)
        .map(|_| {
            let first = rng.below(elite);
            let second = rng.below(elite);
            let pos = rng.below(n_cities);
            MateDraw { first, second, pos }
        })
        .collect()
}

/// Draws `count` swap mutations, two positions per chromosome.
pub fn draw_swaps(rng: &mut Lcg, count: usize, n_cities: usize) -> Vec<SwapDraw> {
    (0..count)
        .map(|_| {
            let a = rng.below(n_cities);
            let b = rng.below(n_cities);
            SwapDraw { a, b }
        })
        .collect()
}

// ============================================================================
// Crossover
// ============================================================================

/// Order-preserving one-point crossover into a caller-owned child.
///
/// Copies `first[..pos]` into `child[..pos]`, then fills `child[pos..]` with
/// the cities of `second` that are not in that prefix, in `second`'s order.
/// If both parents are permutations, so is the child.
///
/// `seen` is a marker buffer with one slot per city. A city counts as placed
/// when its slot equals `stamp`, so a buffer can be reused without clearing
/// as long as every call gets a stamp it has not seen before.
///
/// # Panics
/// Panics if the slices differ in length, `pos > first.len()`, or a city
/// index is out of range for `seen`.
pub fn order_crossover_into(
    first: &[u32],
    second: &[u32],
    pos: usize,
    child: &mut [u32],
    seen: &mut [u32],
    stamp: u32,
) {
    assert_eq!(first.len(), second.len(), "parents must have equal length");
    assert_eq!(first.len(), child.len(), "child must match parent length");

    let (head, tail) = child.split_at_mut(pos);
    head.copy_from_slice(&first[..pos]);
    for &city in head.iter() {
        seen[city as usize] = stamp;
    }

    let donors = second
        .iter()
        .copied()
        .filter(|&city| seen[city as usize] != stamp);
    for (slot, city) in tail.iter_mut().zip(donors) {
        *slot = city;
    }
}

/// Allocating form of [`order_crossover_into`].
///
/// `pos == 0` reproduces `second`; `pos == first.len()` reproduces `first`.
///
/// # Examples
///
/// ```
/// use u_tspga::ga::operators::order_crossover;
///
/// let child = order_crossover(&[0, 1, 2, 3, 4], &[4, 3, 2, 1, 0], 2);
/// assert_eq!(child, vec![0, 1, 4, 3, 2]);
/// ```
pub fn order_crossover(first: &[u32], second: &[u32], pos: usize) -> Vec<u32> {
    let n = first.len();
    let mut child = vec![0; n];
    let mut seen = vec![0; n];
    order_crossover_into(first, second, pos, &mut child, &mut seen, 1);
    child
}

/// Fills offspring slots `elite..` of `children` by crossing elite parents
/// of `parents`, one [`MateDraw`] per slot.
///
/// `parents` must be sorted so that its first `elite` chromosomes are the
/// elite; `children` is written only from index `elite` on.
///
/// # Panics
/// Panics if `draws.len()` differs from the number of offspring slots.
pub fn mate(
    parents: &Population,
    elite: usize,
    children: &mut Population,
    draws: &[MateDraw],
    parallel: bool,
) {
    let n = parents.n_cities;
    assert_eq!(
        draws.len(),
        children.len() - elite,
        "one draw per offspring slot"
    );
    let offspring = &mut children.genes[elite * n..];

    let breed = |seen: &mut Vec<u32>, (m, (child, draw)): (usize, (&mut [u32], &MateDraw))| {
        order_crossover_into(
            parents.tour(draw.first),
            parents.tour(draw.second),
            draw.pos,
            child,
            seen,
            m as u32 + 1,
        );
    };

    if parallel {
        offspring
            .par_chunks_exact_mut(n)
            .zip(draws.par_iter())
            .enumerate()
            .for_each_init(|| vec![0u32; n], breed);
    } else {
        let mut seen = vec![0u32; n];
        offspring
            .chunks_exact_mut(n)
            .zip(draws.iter())
            .enumerate()
            .for_each(|item| breed(&mut seen, item));
    }
}

// ============================================================================
// Mutation
// ============================================================================

/// Exchanges the cities at positions `a` and `b`. `a == b` is a no-op.
#[inline]
pub fn swap_mutation(tour: &mut [u32], a: usize, b: usize) {
    tour.swap(a, b);
}

/// Applies `draws[k]` to chromosome `start + k` of `population`.
///
/// # Panics
/// Panics if `draws.len()` differs from `population.len() - start`.
pub fn mutate(population: &mut Population, start: usize, draws: &[SwapDraw], parallel: bool) {
    let n = population.n_cities;
    assert_eq!(
        draws.len(),
        population.len() - start,
        "one draw per mutated chromosome"
    );
    let tours = &mut population.genes[start * n..];

    if parallel {
        tours
            .par_chunks_exact_mut(n)
            .zip(draws.par_iter())
            .for_each(|(tour, d)| swap_mutation(tour, d.a, d.b));
    } else {
        for (tour, d) in tours.chunks_exact_mut(n).zip(draws) {
            swap_mutation(tour, d.a, d.b);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::population::is_permutation;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn shuffled(n: usize, seed: u64) -> Vec<u32> {
        let mut tour: Vec<u32> = (0..n as u32).collect();
        tour.shuffle(&mut StdRng::seed_from_u64(seed));
        tour
    }

    /// Whether `sub` appears in `tour` in the same relative order.
    fn is_subsequence(sub: &[u32], tour: &[u32]) -> bool {
        let mut it = tour.iter();
        sub.iter().all(|c| it.any(|t| t == c))
    }

    // ---- Draws ----

    #[test]
    fn test_draw_mates_order() {
        let draws = draw_mates(&mut Lcg::new(1), 2, 4, 5);
        let mut replay = Lcg::new(1);
        let values: Vec<u32> = (0..6).map(|_| replay.next_value()).collect();
        assert_eq!(
            draws[0],
            MateDraw {
                first: values[0] as usize % 4,
                second: values[1] as usize % 4,
                pos: values[2] as usize % 5,
            }
        );
        assert_eq!(draws[1].pos, values[5] as usize % 5);
    }

    #[test]
    fn test_draw_swaps_in_range() {
        let draws = draw_swaps(&mut Lcg::new(7), 1000, 13);
        assert_eq!(draws.len(), 1000);
        assert!(draws.iter().all(|d| d.a < 13 && d.b < 13));
    }

    // ---- Crossover ----

    #[test]
    fn test_crossover_example() {
        let a = [0, 1, 2, 3, 4, 5];
        let b = [5, 3, 1, 0, 4, 2];
        assert_eq!(order_crossover(&a, &b, 3), vec![0, 1, 2, 5, 3, 4]);
    }

    #[test]
    fn test_crossover_pos_zero_copies_second() {
        let a = shuffled(30, 1);
        let b = shuffled(30, 2);
        assert_eq!(order_crossover(&a, &b, 0), b);
    }

    #[test]
    fn test_crossover_pos_full_copies_first() {
        let a = shuffled(30, 3);
        let b = shuffled(30, 4);
        assert_eq!(order_crossover(&a, &b, 30), a);
    }

    #[test]
    fn test_crossover_identical_parents() {
        let a = shuffled(12, 5);
        for pos in 0..=12 {
            assert_eq!(order_crossover(&a, &a, pos), a);
        }
    }

    #[test]
    fn test_stamp_reuse_without_clearing() {
        let a = shuffled(20, 6);
        let b = shuffled(20, 7);
        let mut seen = vec![0u32; 20];
        let mut child = vec![0u32; 20];
        for (stamp, pos) in (1..).zip(0..=20) {
            order_crossover_into(&a, &b, pos, &mut child, &mut seen, stamp);
            assert_eq!(child, order_crossover(&a, &b, pos));
        }
    }

    #[test]
    fn test_mate_fills_only_offspring_slots() {
        let parents = Population::from_tours(4, &[[3u32, 2, 1, 0], [0, 1, 2, 3], [1, 3, 0, 2]])
            .unwrap();
        let mut children = Population::from_tours(4, &[[9u32, 9, 9, 9]; 3]).unwrap();
        let draws = [
            MateDraw { first: 0, second: 1, pos: 1 },
            MateDraw { first: 1, second: 0, pos: 4 },
        ];
        mate(&parents, 1, &mut children, &draws, false);

        assert_eq!(children.tour(0), &[9, 9, 9, 9]);
        assert_eq!(children.tour(1), &[3, 0, 1, 2]);
        assert_eq!(children.tour(2), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_mate_parallel_matches_sequential() {
        let n = 25;
        let tours: Vec<Vec<u32>> = (0..200).map(|s| shuffled(n, s)).collect();
        let parents = Population::from_tours(n, &tours).unwrap();
        let elite = 20;
        let draws = draw_mates(&mut Lcg::new(12345), tours.len() - elite, elite, n);

        let mut seq = Population::identity(tours.len(), n).unwrap();
        let mut par = seq.clone();
        mate(&parents, elite, &mut seq, &draws, false);
        mate(&parents, elite, &mut par, &draws, true);

        assert_eq!(seq, par);
        assert_eq!(seq.first_invalid(), None);
    }

    // ---- Mutation ----

    #[test]
    fn test_swap_mutation() {
        let mut tour = vec![0, 1, 2, 3];
        swap_mutation(&mut tour, 0, 3);
        assert_eq!(tour, vec![3, 1, 2, 0]);
        swap_mutation(&mut tour, 2, 2);
        assert_eq!(tour, vec![3, 1, 2, 0]);
    }

    #[test]
    fn test_mutate_skips_prefix() {
        let mut pop = Population::identity(3, 3).unwrap();
        let draws = [SwapDraw { a: 0, b: 2 }, SwapDraw { a: 1, b: 1 }];
        mutate(&mut pop, 1, &draws, false);
        assert_eq!(pop.tour(0), &[0, 1, 2]);
        assert_eq!(pop.tour(1), &[2, 1, 0]);
        assert_eq!(pop.tour(2), &[0, 1, 2]);
    }

    #[test]
    fn test_mutate_parallel_matches_sequential() {
        let mut seq = Population::identity(500, 17).unwrap();
        let mut par = seq.clone();
        let draws = draw_swaps(&mut Lcg::new(4), 500, 17);
        mutate(&mut seq, 0, &draws, false);
        mutate(&mut par, 0, &draws, true);
        assert_eq!(seq, par);
    }

    // ---- Properties ----

    fn parents_and_cut() -> impl Strategy<Value = (Vec<u32>, Vec<u32>, usize)> {
        (1usize..60).prop_flat_map(|n| {
            let identity: Vec<u32> = (0..n as u32).collect();
            (
                Just(identity.clone()).prop_shuffle(),
                Just(identity).prop_shuffle(),
                0..=n,
            )
        })
    }

    proptest! {
        #[test]
        fn prop_crossover_is_order_preserving((a, b, pos) in parents_and_cut()) {
            let child = order_crossover(&a, &b, pos);

            prop_assert!(is_permutation(&child));
            prop_assert_eq!(&child[..pos], &a[..pos]);
            prop_assert!(is_subsequence(&child[pos..], &b));
        }

        #[test]
        fn prop_swap_is_transposition(
            (tour, a, b) in (1usize..60).prop_flat_map(|n| {
                (Just((0..n as u32).collect::<Vec<_>>()).prop_shuffle(), 0..n, 0..n)
            })
        ) {
            let mut mutated = tour.clone();
            swap_mutation(&mut mutated, a, b);

            prop_assert!(is_permutation(&mutated));
            let changed = tour.iter().zip(&mutated).filter(|(x, y)| x != y).count();
            if a == b {
                prop_assert_eq!(changed, 0);
            } else {
                prop_assert_eq!(changed, 2);
                prop_assert_eq!(mutated[a], tour[b]);
                prop_assert_eq!(mutated[b], tour[a]);
            }
        }
    }
}
