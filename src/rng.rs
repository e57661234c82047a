use std::time::{SystemTime, UNIX_EPOCH};

/** xorshift* generator over a single 64-bit word.

Every stochastic decision of the search (shuffles, tie-breaks, perturbation,
squash offsets) draws from one instance of this generator, so a run is
reproducible from its seed alone.
*/
#[derive(Debug, Clone)]
pub struct Xorshift64Star {
    /// generator state (never zero)
    state: u64,
}

impl Xorshift64Star {
    /// creates a generator from an explicit seed (reproducible runs)
    pub fn new(seed: u64) -> Self {
        // the all-zero state is a fixed point of the xorshift step
        Self { state: if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed } }
    }

    /// creates a time-seeded generator
    pub fn from_time() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x9E37_79B9_7F4A_7C15);
        Self::new(nanos)
    }

    /// next raw 64-bit output
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    /** uniform integer in `[0, bound)`. `bound` must be positive.
    Rejection sampling removes the modulo bias. */
    pub fn usize_below(&mut self, bound: usize) -> usize {
        assert!(bound > 0, "usize_below: bound must be positive");
        let bound64 = bound as u64;
        let threshold = bound64.wrapping_neg() % bound64;
        loop {
            let r = self.next_u64();
            if r >= threshold {
                return (r % bound64) as usize;
            }
        }
    }

    /// Fisher-Yates shuffle
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.usize_below(i + 1);
            slice.swap(i, j);
        }
    }
}
