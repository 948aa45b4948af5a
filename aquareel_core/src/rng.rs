use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::error::RngError;

pub type HmacSha256 = Hmac<Sha256>;

/// A source of uniform integers. One instance owns one seed sequence;
/// every draw advances the internal state, so a batch of spins must
/// hold the source exclusively for its whole run.
pub trait RandomSource {
    /// Next value in `[0, bound)`. `bound` must be positive.
    fn next(&mut self, bound: u32) -> Result<u32, RngError>;
}

/// Maps a unit-interval value onto `[0, bound)`.
fn scale(unit: f64, bound: u32) -> u32 {
    ((unit * bound as f64) as u32).min(bound - 1)
}

/// Linear congruential generator with the classic Numerical Recipes
/// constants. Fully reproducible from its seed; the fixture generator
/// for tests and replayable batches.
pub struct Lcg {
    state: u64,
}

const LCG_A: u64 = 1_664_525;
const LCG_C: u64 = 1_013_904_223;
const LCG_M: u64 = 1 << 32;

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self { state: seed % LCG_M }
    }
}

impl RandomSource for Lcg {
    fn next(&mut self, bound: u32) -> Result<u32, RngError> {
        if bound == 0 {
            return Err(RngError::ZeroBound);
        }
        self.state = (LCG_A.wrapping_mul(self.state).wrapping_add(LCG_C)) % LCG_M;
        Ok(scale(self.state as f64 / LCG_M as f64, bound))
    }
}

/// Sine-noise generator: each draw folds the seed through
/// `sin(seed) * 10000` and takes the fractional part. Deterministic but
/// with poor statistical structure; kept for parity with legacy sheets.
pub struct ChaoticRng {
    state: f64,
}

impl ChaoticRng {
    pub fn new(seed: f64) -> Self {
        Self { state: seed }
    }
}

impl RandomSource for ChaoticRng {
    fn next(&mut self, bound: u32) -> Result<u32, RngError> {
        if bound == 0 {
            return Err(RngError::ZeroBound);
        }
        self.state = self.state.sin() * 10_000.0;
        let unit = self.state - self.state.floor();
        Ok(scale(unit, bound))
    }
}

/// Cube-root iteration generator: runs a fixed number of Newton steps
/// toward the root of `x^3 = seed` and draws from the fractional part
/// of the approximation.
pub struct NewtonRng {
    state: f64,
}

const NEWTON_ITERATIONS: u32 = 10;
const NEWTON_EPSILON: f64 = 1e-10;

impl NewtonRng {
    pub fn new(seed: f64) -> Self {
        Self { state: seed }
    }
}

impl RandomSource for NewtonRng {
    fn next(&mut self, bound: u32) -> Result<u32, RngError> {
        if bound == 0 {
            return Err(RngError::ZeroBound);
        }
        let mut x = self.state / 1000.0;
        for _ in 0..NEWTON_ITERATIONS {
            let fx = x * x * x - self.state;
            let fpx = 3.0 * x * x;
            x -= fx / (fpx + NEWTON_EPSILON);
        }
        self.state = x * 10_000.0;
        Ok(scale(x.fract().abs(), bound))
    }
}

pub fn derive_hash_hex(input: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    hex::encode(hasher.finalize())
}

/// Provably fair source: an HMAC-SHA256 counter stream over
/// `server_seed` keyed with `client_seed:nonce` messages. The server
/// commits to its seed up front via `server_seed_hash_hex`; after play,
/// revealing the seed lets a client recompute every draw.
pub struct FairRng {
    server_seed: String,
    client_seed: String,
    nonce: u64,
    buffer: Vec<u8>,
    cursor: usize,
}

impl FairRng {
    pub fn new(server_seed: impl Into<String>, client_seed: impl Into<String>, nonce: u64) -> Self {
        Self {
            server_seed: server_seed.into(),
            client_seed: client_seed.into(),
            nonce,
            buffer: Vec::new(),
            cursor: 0,
        }
    }

    /// The commitment published before any spin.
    pub fn server_seed_hash_hex(&self) -> String {
        derive_hash_hex(self.server_seed.as_bytes())
    }

    fn refill(&mut self) -> Result<(), RngError> {
        let mut mac = HmacSha256::new_from_slice(self.server_seed.as_bytes())
            .map_err(|e| RngError::Keying(e.to_string()))?;
        mac.update(format!("{}:{}", self.client_seed, self.nonce).as_bytes());
        self.buffer = mac.finalize().into_bytes().to_vec();
        self.cursor = 0;
        self.nonce += 1;
        Ok(())
    }
}

impl RandomSource for FairRng {
    fn next(&mut self, bound: u32) -> Result<u32, RngError> {
        if bound == 0 {
            return Err(RngError::ZeroBound);
        }
        if self.cursor + 4 > self.buffer.len() {
            self.refill()?;
        }
        let chunk = &self.buffer[self.cursor..self.cursor + 4];
        self.cursor += 4;
        let v = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        Ok(scale(v as f64 / (u32::MAX as f64 + 1.0), bound))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draws(src: &mut dyn RandomSource, bound: u32, n: usize) -> Vec<u32> {
        (0..n).map(|_| src.next(bound).unwrap()).collect()
    }

    #[test]
    fn lcg_is_repeatable() {
        let mut a = Lcg::new(12345);
        let mut b = Lcg::new(12345);
        assert_eq!(draws(&mut a, 11, 20), draws(&mut b, 11, 20));
    }

    #[test]
    fn lcg_stays_in_bounds() {
        let mut rng = Lcg::new(987654321);
        for _ in 0..1000 {
            assert!(rng.next(72).unwrap() < 72);
        }
    }

    #[test]
    fn lcg_seeds_diverge() {
        let mut a = Lcg::new(1);
        let mut b = Lcg::new(2);
        assert_ne!(draws(&mut a, 1000, 10), draws(&mut b, 1000, 10));
    }

    #[test]
    fn chaotic_is_repeatable_and_bounded() {
        let mut a = ChaoticRng::new(42.0);
        let mut b = ChaoticRng::new(42.0);
        let seq = draws(&mut a, 11, 50);
        assert_eq!(seq, draws(&mut b, 11, 50));
        assert!(seq.iter().all(|&v| v < 11));
    }

    #[test]
    fn newton_is_repeatable_and_bounded() {
        let mut a = NewtonRng::new(12345.0);
        let mut b = NewtonRng::new(12345.0);
        let seq = draws(&mut a, 11, 50);
        assert_eq!(seq, draws(&mut b, 11, 50));
        assert!(seq.iter().all(|&v| v < 11));
    }

    #[test]
    fn fair_stream_is_repeatable() {
        let mut a = FairRng::new("server", "client", 1);
        let mut b = FairRng::new("server", "client", 1);
        assert_eq!(a.server_seed_hash_hex(), b.server_seed_hash_hex());
        assert_eq!(draws(&mut a, 72, 40), draws(&mut b, 72, 40));
    }

    #[test]
    fn fair_stream_depends_on_all_seeds() {
        let base = draws(&mut FairRng::new("server", "client", 1), 72, 16);
        assert_ne!(base, draws(&mut FairRng::new("other", "client", 1), 72, 16));
        assert_ne!(base, draws(&mut FairRng::new("server", "other", 1), 72, 16));
        assert_ne!(base, draws(&mut FairRng::new("server", "client", 2), 72, 16));
    }

    #[test]
    fn zero_bound_is_an_error() {
        assert!(matches!(Lcg::new(1).next(0), Err(RngError::ZeroBound)));
        assert!(matches!(FairRng::new("s", "c", 0).next(0), Err(RngError::ZeroBound)));
    }

    #[test]
    fn bound_one_always_draws_zero() {
        let mut rng = ChaoticRng::new(7.0);
        for _ in 0..20 {
            assert_eq!(rng.next(1).unwrap(), 0);
        }
    }
}
