//! Seeded pseudo-random number generator
//!
//! Deterministic PRNG for reproducible noise and stochastic strategies.
//! Uses a simple but effective xorshift algorithm.

/// Fallback state; xorshift never leaves the all-zero state.
const NONZERO_STATE: u64 = 0x853c49e6748fea9b;

/// Seeded random number generator
///
/// Deterministic: same seed + index = same sequence
#[derive(Clone, Debug)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    /// Create a new RNG from a 32-byte seed and match index
    pub fn new(seed: &[u8; 32], match_index: u32) -> Self {
        // Combine seed bytes into initial state
        let mut state = 0u64;
        for (i, chunk) in seed.chunks(8).enumerate() {
            let mut bytes = [0u8; 8];
            bytes[..chunk.len()].copy_from_slice(chunk);
            state ^= u64::from_le_bytes(bytes).wrapping_add(i as u64);
        }

        // Mix in match index
        state ^= (match_index as u64).wrapping_mul(0x517cc1b727220a95);

        Self::from_state(state)
    }

    fn from_state(state: u64) -> Self {
        let state = if state == 0 { NONZERO_STATE } else { state };

        // Warm up the generator
        let mut rng = Self { state };
        for _ in 0..8 {
            rng.next_u64();
        }

        rng
    }

    /// Split off an independent stream, advancing this one
    pub fn split(&mut self) -> Self {
        let state = self.next_u64();
        Self::from_state(state)
    }

    /// Create RNG for a specific round within a match
    pub fn for_round(&self, round: u64) -> Self {
        let mut new_state = self.state;
        new_state ^= round.wrapping_mul(0x9e3779b97f4a7c15);
        if new_state == 0 {
            new_state = NONZERO_STATE;
        }

        let mut rng = Self { state: new_state };
        rng.next_u64(); // Mix
        rng
    }

    /// Generate next u64
    pub fn next_u64(&mut self) -> u64 {
        // xorshift64*
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        self.state.wrapping_mul(0x2545f4914f6cdd1d)
    }

    /// Generate next u32
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Uniform value in [0, 1) with 53 bits of precision
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// True with probability `p`. Always false for p <= 0, always true for p >= 1.
    pub fn bernoulli(&mut self, p: f64) -> bool {
        if p <= 0.0 {
            return false;
        }
        if p >= 1.0 {
            return true;
        }
        self.next_f64() < p
    }
}
