//! Math core for a 3x5 reel slot: weighted reel strips, spin draws,
//! left-to-right payline evaluation, and sequential batch orchestration.
//! Randomness comes in through the [`rng::RandomSource`] trait; result
//! persistence and balance bookkeeping stay with the caller.

pub mod engine;
pub mod error;
pub mod lines;
pub mod parsheet;
pub mod reels;
pub mod rng;
pub mod symbols;

pub use crate::engine::{BatchResult, BetContext, EngineParams, SpinEngine, SpinOutcome};
pub use crate::error::{ConfigError, DataIntegrityWarning, RngError};
pub use crate::lines::{evaluate_lines, LineEvaluation, Payline, ResultMatrix, WinningLine};
pub use crate::parsheet::{MatrixDims, Parsheet};
pub use crate::reels::{build_reel_strips, ReelStrip, DEFAULT_STRIP_LENGTH};
pub use crate::rng::{derive_hash_hex, ChaoticRng, FairRng, Lcg, NewtonRng, RandomSource};
pub use crate::symbols::{MultiplierTier, SpecialKind, Symbol};
