use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::lines::Payline;
use crate::symbols::Symbol;

/// Result-matrix dimensions: `x` reels wide, `y` rows tall.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MatrixDims {
    pub x: usize,
    pub y: usize,
}

/// The game parameter sheet: matrix shape, payline table, bet ladder,
/// and the symbol catalogue. Field names match the sheet JSON supplied
/// by game configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parsheet {
    pub id: String,
    pub matrix: MatrixDims,
    #[serde(rename = "linesApiData")]
    pub lines_api_data: Vec<Payline>,
    #[serde(rename = "linesCount", default)]
    pub lines_count: Vec<usize>,
    #[serde(default)]
    pub bets: Vec<f64>,
    #[serde(rename = "Symbols")]
    pub symbols: Vec<Symbol>,
}

impl Parsheet {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The SL-AQUA sheet shipped with the crate: 5x3 matrix, 20
    /// paylines, 17 symbols including Wild, Scatter, Bonus, FreeSpin
    /// and Jackpot.
    pub fn sl_aqua() -> Self {
        Self::from_json(include_str!("../assets/sl_aqua.json"))
            .expect("embedded SL-AQUA par-sheet parses")
    }
}
