use tracing::debug;

use crate::error::{ConfigError, DataIntegrityWarning, RngError};
use crate::lines::{evaluate_lines, Payline, ResultMatrix, WinningLine};
use crate::parsheet::Parsheet;
use crate::reels::{build_reel_strips, ReelStrip, DEFAULT_STRIP_LENGTH};
use crate::rng::RandomSource;
use crate::symbols::Symbol;

/// Everything a spin batch needs besides randomness: the catalogue,
/// the payline table, and the grid shape. Immutable once handed to the
/// engine.
#[derive(Debug, Clone)]
pub struct EngineParams {
    pub symbols: Vec<Symbol>,
    pub paylines: Vec<Payline>,
    pub rows: usize,
    pub reels: usize,
    pub strip_length: usize,
}

impl EngineParams {
    pub fn from_parsheet(sheet: &Parsheet) -> Self {
        Self {
            symbols: sheet.symbols.clone(),
            paylines: sheet.lines_api_data.clone(),
            rows: sheet.matrix.y,
            reels: sheet.matrix.x,
            strip_length: DEFAULT_STRIP_LENGTH,
        }
    }
}

/// Stake for one batch: bet per line and how many lines are played.
/// The caller debits `total_bet()` and credits each outcome's payout.
#[derive(Debug, Clone, Copy)]
pub struct BetContext {
    bet_per_line: f64,
    line_count: usize,
}

impl BetContext {
    pub fn new(bet_per_line: f64, line_count: usize) -> Result<Self, ConfigError> {
        if !(bet_per_line > 0.0) {
            return Err(ConfigError::NonPositiveBet(bet_per_line));
        }
        if line_count == 0 {
            return Err(ConfigError::ZeroLines);
        }
        Ok(Self {
            bet_per_line,
            line_count,
        })
    }

    pub fn bet_per_line(&self) -> f64 {
        self.bet_per_line
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn total_bet(&self) -> f64 {
        self.bet_per_line * self.line_count as f64
    }
}

/// One settled spin. Owned by the caller; the core keeps nothing.
#[derive(Debug, Clone)]
pub struct SpinOutcome {
    pub matrix: ResultMatrix,
    pub total_payout: f64,
    pub winning_lines: Vec<WinningLine>,
    pub warnings: Vec<DataIntegrityWarning>,
}

/// Outcomes produced before the batch finished or died. `error` is set
/// when a random-source failure cut the batch short; the spins already
/// settled remain valid.
#[derive(Debug)]
pub struct BatchResult {
    pub outcomes: Vec<SpinOutcome>,
    pub error: Option<RngError>,
}

impl BatchResult {
    pub fn total_payout(&self) -> f64 {
        self.outcomes.iter().map(|o| o.total_payout).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Spin driver: validates the configuration once, builds the reel
/// strips once, then draws and settles spins strictly in sequence
/// against a caller-owned random source.
pub struct SpinEngine {
    params: EngineParams,
    strips: Vec<ReelStrip>,
}

impl SpinEngine {
    pub fn new(params: EngineParams) -> Result<Self, ConfigError> {
        for (position, sym) in params.symbols.iter().enumerate() {
            if sym.id as usize != position {
                return Err(ConfigError::IdMismatch {
                    name: sym.name.clone(),
                    id: sym.id,
                    position,
                });
            }
            // a present table must cover runs of 3..5
            if !sym.multiplier.is_empty() && sym.multiplier.len() < 3 {
                return Err(ConfigError::ShortMultiplierTable {
                    name: sym.name.clone(),
                    got: sym.multiplier.len(),
                });
            }
        }
        for (index, line) in params.paylines.iter().enumerate() {
            if line.len() != params.reels {
                return Err(ConfigError::PaylineLength {
                    index,
                    got: line.len(),
                    reels: params.reels,
                });
            }
        }

        let strips = build_reel_strips(&params.symbols, params.reels, params.strip_length);
        if let Some(reel) = strips.iter().position(|s| s.is_empty()) {
            return Err(ConfigError::EmptyReelStrip { reel });
        }

        Ok(Self { params, strips })
    }

    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    pub fn strips(&self) -> &[ReelStrip] {
        &self.strips
    }

    /// One cell: reshuffle a copy of the reel's strip with draws from
    /// the source, then draw a stopping index against the actual strip
    /// length. The per-cell reshuffle is the reference behavior this
    /// engine reproduces; see DESIGN.md before changing it.
    fn draw_cell(&self, strip: &ReelStrip, rng: &mut dyn RandomSource) -> Result<u32, RngError> {
        let mut deck = strip.ids().to_vec();
        for i in (1..deck.len()).rev() {
            let j = rng.next(i as u32 + 1)? as usize;
            deck.swap(i, j);
        }
        let stop = rng.next(deck.len() as u32)? as usize;
        Ok(deck[stop])
    }

    /// Draws a full `rows x reels` grid, row-major. A source failure
    /// aborts the spin; there are no retries.
    pub fn generate_matrix(&self, rng: &mut dyn RandomSource) -> Result<ResultMatrix, RngError> {
        let mut matrix = Vec::with_capacity(self.params.rows);
        for _ in 0..self.params.rows {
            let mut row = Vec::with_capacity(self.params.reels);
            for strip in &self.strips {
                row.push(self.draw_cell(strip, rng)?);
            }
            matrix.push(row);
        }
        Ok(matrix)
    }

    /// One full spin: draw the grid, settle every payline.
    pub fn spin(
        &self,
        rng: &mut dyn RandomSource,
        bet: &BetContext,
    ) -> Result<SpinOutcome, RngError> {
        let matrix = self.generate_matrix(rng)?;
        let eval = evaluate_lines(&matrix, &self.params.paylines, &self.params.symbols, bet.bet_per_line());
        debug!(
            payout = eval.total_payout,
            wins = eval.winning_lines.len(),
            "spin settled"
        );
        Ok(SpinOutcome {
            matrix,
            total_payout: eval.total_payout,
            winning_lines: eval.winning_lines,
            warnings: eval.warnings,
        })
    }

    /// Runs `spin_count` spins in strict sequence against one source.
    /// A fatal draw error stops the batch; the outcomes already
    /// produced come back alongside it.
    pub fn run_batch(
        &self,
        rng: &mut dyn RandomSource,
        bet: &BetContext,
        spin_count: u64,
    ) -> BatchResult {
        let mut outcomes = Vec::with_capacity(spin_count as usize);
        for _ in 0..spin_count {
            match self.spin(rng, bet) {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    return BatchResult {
                        outcomes,
                        error: Some(e),
                    }
                }
            }
        }
        BatchResult {
            outcomes,
            error: None,
        }
    }
}
