//! Elitist selection by merge sort.
//!
//! The population is ordered ascending by fitness; the leading
//! `elite_count` chromosomes are then the elite. The sort is a
//! top-down merge sort over chromosome indices whose output depends only
//! on the fitness values: ties keep their relative order (the merge takes
//! from the left run on equality), so later phases always see the same
//! elite prefix for the same fitness vector.
//!
//! # References
//!
//! - Knuth (1998), *The Art of Computer Programming, Vol. 3*, §5.2.4

use super::population::Population;

/// Below this many elements the two halves are sorted on the current thread.
const PARALLEL_CUTOFF: usize = 4096;

/// Returns chromosome indices ordered ascending by `fitness`.
///
/// # Examples
///
/// ```
/// use u_tspga::ga::selection::sort_order;
///
/// let order = sort_order(&[3.0, 1.0, 2.0, 1.0], false);
/// assert_eq!(order, vec![1, 3, 2, 0]);
/// ```
pub fn sort_order(fitness: &[f32], parallel: bool) -> Vec<usize> {
    let mut order: Vec<usize> = (0..fitness.len()).collect();
    let mut buf = vec![0usize; fitness.len()];
    merge_sort(&mut order, &mut buf, fitness, parallel);
    order
}

/// Sorts `population` ascending by fitness, using `spare` as the target
/// buffer.
///
/// On return `population` holds the sorted chromosomes and `spare` holds
/// stale data of the same shape. Tours move together with their fitness.
pub fn sort_population(population: &mut Population, spare: &mut Population, parallel: bool) {
    let order = sort_order(&population.fitness, parallel);
    spare.gather_from(population, &order, parallel);
    std::mem::swap(population, spare);
}

fn merge_sort(order: &mut [usize], buf: &mut [usize], fitness: &[f32], parallel: bool) {
    let n = order.len();
    if n < 2 {
        return;
    }
    if n == 2 {
        if fitness[order[0]] > fitness[order[1]] {
            order.swap(0, 1);
        }
        return;
    }

    let mid = n / 2;
    {
        let (left, right) = order.split_at_mut(mid);
        let (buf_left, buf_right) = buf.split_at_mut(mid);
        if parallel && n >= PARALLEL_CUTOFF {
            rayon::join(
                || merge_sort(left, buf_left, fitness, parallel),
                || merge_sort(right, buf_right, fitness, parallel),
            );
        } else {
            merge_sort(left, buf_left, fitness, parallel);
            merge_sort(right, buf_right, fitness, parallel);
        }
    }

    merge(&order[..mid], &order[mid..], buf, fitness);
    order.copy_from_slice(buf);
}

/// Merges two sorted runs into `out`, preferring `left` on ties.
fn merge(left: &[usize], right: &[usize], out: &mut [usize], fitness: &[f32]) {
    let (mut i, mut j) = (0, 0);
    for slot in out.iter_mut() {
        let take_left =
            j == right.len() || (i < left.len() && fitness[left[i]] <= fitness[right[j]]);
        if take_left {
            *slot = left[i];
            i += 1;
        } else {
            *slot = right[j];
            j += 1;
        }
    }
}
