use thiserror::Error;

/// Structural problems in the catalogue, paylines, or bet context.
/// Detected once, before any spin runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse par-sheet: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("symbol `{name}` declares id {id} but sits at catalogue position {position}")]
    IdMismatch {
        name: String,
        id: u32,
        position: usize,
    },
    #[error("symbol `{name}` has {got} multiplier tiers, need at least 3 to cover runs of 3..5")]
    ShortMultiplierTable { name: String, got: usize },
    #[error("payline {index} has {got} entries, expected one per reel ({reels})")]
    PaylineLength {
        index: usize,
        got: usize,
        reels: usize,
    },
    #[error("reel {reel} strip is empty (all instance counts zero)")]
    EmptyReelStrip { reel: usize },
    #[error("bet per line must be positive, got {0}")]
    NonPositiveBet(f64),
    #[error("line count must be positive")]
    ZeroLines,
}

/// A random source failed to produce a draw. Fatal to the in-progress
/// spin; the remaining batch is aborted, never retried.
#[derive(Debug, Error)]
pub enum RngError {
    #[error("random draw requested with zero bound")]
    ZeroBound,
    #[error("failed to key the hmac stream: {0}")]
    Keying(String),
}

/// A payline or matrix reference was out of range during evaluation.
/// Non-fatal: the offending position is skipped and the scan continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataIntegrityWarning {
    /// A payline row index pointed outside the result matrix.
    RowOutOfRange {
        line: usize,
        reel: usize,
        row: usize,
    },
    /// A drawn symbol id had no entry in the catalogue.
    UnknownSymbol { line: usize, reel: usize, id: u32 },
}

impl std::fmt::Display for DataIntegrityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataIntegrityWarning::RowOutOfRange { line, reel, row } => {
                write!(f, "line {line}: row index {row} at reel {reel} is outside the matrix")
            }
            DataIntegrityWarning::UnknownSymbol { line, reel, id } => {
                write!(f, "line {line}: symbol id {id} at reel {reel} is not in the catalogue")
            }
        }
    }
}
