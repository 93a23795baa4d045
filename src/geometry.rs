//! Planar city model and tour length.
//!
//! Distances are computed in single precision so that fitness values are
//! reproducible bit for bit across runs and platforms.

use crate::rng::Lcg;

/// Cities are placed on an integral grid `[0, COORD_RANGE)²`.
pub const COORD_RANGE: usize = 4096;

/// A city on the integral plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct City {
    pub x: i32,
    pub y: i32,
}

impl City {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Euclidean distance between two cities, in `f32`.
#[inline]
pub fn distance(a: City, b: City) -> f32 {
    let dx = (a.x - b.x) as f32;
    let dy = (a.y - b.y) as f32;
    (dx * dx + dy * dy).sqrt()
}

/// Length of the closed tour visiting `cities` in `tour` order.
///
/// Edges are summed sequentially along the tour, then the closing edge
/// from the last city back to the first is added. The summation order is
/// fixed, so the result for a given tour never depends on who computes it.
///
/// # Panics
/// Panics if `tour` contains an index outside `cities`.
pub fn tour_length(cities: &[City], tour: &[u32]) -> f32 {
    let (first, last) = match (tour.first(), tour.last()) {
        (Some(&f), Some(&l)) => (f, l),
        _ => return 0.0,
    };

    let open: f32 = tour.windows(2).fold(0.0, |acc, edge| {
        acc + distance(cities[edge[0] as usize], cities[edge[1] as usize])
    });
    open + distance(cities[last as usize], cities[first as usize])
}

/// Generates `n` cities uniformly on the grid.
///
/// Consumes two values per city (`x` then `y`), in city index order.
pub fn random_cities(n: usize, rng: &mut Lcg) -> Vec<City> {
    (0..n)
        .map(|_| {
            let x = rng.below(COORD_RANGE) as i32;
            let y = rng.below(COORD_RANGE) as i32;
            City::new(x, y)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<City> {
        vec![
            City::new(0, 0),
            City::new(3, 0),
            City::new(3, 4),
            City::new(0, 4),
        ]
    }

    #[test]
    fn test_distance_pythagorean() {
        assert_eq!(distance(City::new(0, 0), City::new(3, 4)), 5.0);
        assert_eq!(distance(City::new(3, 4), City::new(0, 0)), 5.0);
        assert_eq!(distance(City::new(7, 7), City::new(7, 7)), 0.0);
    }

    #[test]
    fn test_tour_length_closed() {
        let cities = square();
        assert_eq!(tour_length(&cities, &[0, 1, 2, 3]), 14.0);
        // Crossing diagonals: 5 + 4 + 5 + 4
        assert_eq!(tour_length(&cities, &[0, 2, 1, 3]), 18.0);
    }

    #[test]
    fn test_tour_length_rotation_invariant_on_integers() {
        let cities = square();
        assert_eq!(
            tour_length(&cities, &[0, 1, 2, 3]),
            tour_length(&cities, &[2, 3, 0, 1])
        );
    }

    #[test]
    fn test_tour_length_degenerate() {
        let cities = square();
        assert_eq!(tour_length(&cities, &[]), 0.0);
        assert_eq!(tour_length(&cities, &[2]), 0.0);
        assert_eq!(tour_length(&cities, &[0, 2]), 10.0);
    }

    #[test]
    fn test_random_cities_in_range_and_reproducible() {
        let a = random_cities(500, &mut Lcg::new(12345));
        let b = random_cities(500, &mut Lcg::new(12345));
        assert_eq!(a, b);
        for c in &a {
            assert!((0..COORD_RANGE as i32).contains(&c.x));
            assert!((0..COORD_RANGE as i32).contains(&c.y));
        }
    }

    #[test]
    fn test_random_cities_draw_order() {
        let mut rng = Lcg::new(3);
        let cities = random_cities(2, &mut rng);

        let mut replay = Lcg::new(3);
        let expected: Vec<i32> = (0..4)
            .map(|_| (replay.next_value() % 4096) as i32)
            .collect();
        assert_eq!(cities[0], City::new(expected[0], expected[1]));
        assert_eq!(cities[1], City::new(expected[2], expected[3]));
        assert_eq!(rng, replay);
    }
}
