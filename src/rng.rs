//! Deterministic pseudo-random stream.
//!
//! Every random choice of a run (city placement, initial shuffling,
//! parent/crossover-point picks, swap positions) is drawn from a single
//! [`Lcg`] in a fixed order. Given the same seed and the same run
//! parameters, the stream, and therefore the whole search, is
//! bit-reproducible regardless of how many worker threads execute the
//! data-parallel phases.

/// Multiplier of the linear-congruential recurrence.
pub const LCG_MULTIPLIER: u32 = 214_013;

/// Increment of the linear-congruential recurrence.
pub const LCG_INCREMENT: u32 = 2_531_011;

/// Number of low-order state bits discarded by [`Lcg::next_value`].
const OUTPUT_SHIFT: u32 = 13;

/// 32-bit linear congruential generator.
///
/// `state = 214013 * state + 2531011 (mod 2^32)`, output `state >> 13`.
///
/// A run owns exactly one generator and advances it only on the
/// orchestrating thread, before parallel work is dispatched.
///
/// # Examples
///
/// ```
/// use u_tspga::rng::Lcg;
///
/// let mut a = Lcg::new(12345);
/// let mut b = Lcg::new(12345);
/// assert_eq!(a.next_value(), b.next_value());
/// assert!(a.below(10) < 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    /// Creates a generator seeded with `seed`.
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Returns the current internal state.
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Advances the recurrence and returns the next output value.
    ///
    /// Outputs are in `[0, 2^19)`.
    #[inline]
    pub fn next_value(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        self.state >> OUTPUT_SHIFT
    }

    /// Draws an index in `[0, n)` as `next_value() % n`.
    ///
    /// # Panics
    /// Panics if `n == 0`.
    #[inline]
    pub fn below(&mut self, n: usize) -> usize {
        assert!(n > 0, "cannot draw from an empty range");
        self.next_value() as usize % n
    }
}
