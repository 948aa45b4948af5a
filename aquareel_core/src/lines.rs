use tracing::warn;

use crate::error::DataIntegrityWarning;
use crate::symbols::Symbol;

/// Row index per reel, left to right. Declared by game configuration.
pub type Payline = Vec<usize>;

/// A symbol id grid, `rows x reels`, produced by one spin and dropped
/// after evaluation.
pub type ResultMatrix = Vec<Vec<u32>>;

/// One paying line: which payline, what it matched, and what it pays.
#[derive(Debug, Clone, PartialEq)]
pub struct WinningLine {
    pub line_index: usize,
    pub symbol: u32,
    pub count: u32,
    pub amount: f64,
    pub free_spins: u32,
}

/// Evaluator output: the total, the winning lines in payline
/// declaration order, and any reference problems absorbed along the
/// way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineEvaluation {
    pub total_payout: f64,
    pub winning_lines: Vec<WinningLine>,
    pub warnings: Vec<DataIntegrityWarning>,
}

/// Left-to-right run accumulator. Wilds extend the run without fixing
/// the matched symbol; the first plain symbol fixes it; special
/// symbols and mismatches stop the scan.
#[derive(Debug, Default)]
struct RunScan {
    first: Option<u32>,
    count: u32,
}

enum Step {
    Continue,
    Stop,
}

impl RunScan {
    fn feed(&mut self, symbol: &Symbol) -> Step {
        if symbol.kind().breaks_runs() {
            return Step::Stop;
        }
        if symbol.is_wild() {
            self.count += 1;
            return Step::Continue;
        }
        match self.first {
            None => {
                self.first = Some(symbol.id);
                self.count += 1;
                Step::Continue
            }
            Some(first) if first == symbol.id => {
                self.count += 1;
                Step::Continue
            }
            Some(_) => Step::Stop,
        }
    }

    /// The win this run is worth, if any. A run that never saw a plain
    /// symbol (all wilds) has no identity to pay, and a run whose
    /// multiplier table does not reach its length pays nothing.
    fn settle(self, line_index: usize, symbols: &[Symbol], bet_per_line: f64) -> Option<WinningLine> {
        if self.count < 3 {
            return None;
        }
        let first = self.first?;
        let tier = symbols[first as usize].tier_for_run(self.count)?;
        Some(WinningLine {
            line_index,
            symbol: first,
            count: self.count,
            amount: tier.line_multiplier() * bet_per_line,
            free_spins: tier.free_spins(),
        })
    }
}

/// Evaluates every payline against the matrix. Out-of-range rows and
/// unknown symbol ids are skipped with a warning; a malformed position
/// never aborts the rest of the grid.
pub fn evaluate_lines(
    matrix: &ResultMatrix,
    paylines: &[Payline],
    symbols: &[Symbol],
    bet_per_line: f64,
) -> LineEvaluation {
    let mut eval = LineEvaluation::default();

    for (line_index, line) in paylines.iter().enumerate() {
        let mut scan = RunScan::default();

        for (reel, &row) in line.iter().enumerate() {
            let Some(&id) = matrix.get(row).and_then(|r| r.get(reel)) else {
                let w = DataIntegrityWarning::RowOutOfRange {
                    line: line_index,
                    reel,
                    row,
                };
                warn!(%w, "skipping payline position");
                eval.warnings.push(w);
                continue;
            };
            let Some(symbol) = symbols.get(id as usize) else {
                let w = DataIntegrityWarning::UnknownSymbol {
                    line: line_index,
                    reel,
                    id,
                };
                warn!(%w, "skipping payline position");
                eval.warnings.push(w);
                continue;
            };
            if let Step::Stop = scan.feed(symbol) {
                break;
            }
        }

        if let Some(win) = scan.settle(line_index, symbols, bet_per_line) {
            eval.total_payout += win.amount;
            eval.winning_lines.push(win);
        }
    }

    eval
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::Symbol;

    fn catalogue() -> Vec<Symbol> {
        vec![
            Symbol::new(0, "0", &[7; 5]).with_tiers(&[(150.0, 0), (70.0, 0), (30.0, 0)]),
            Symbol::new(1, "1", &[7; 5]).with_tiers(&[(150.0, 0), (70.0, 0), (30.0, 0)]),
            Symbol::new(2, "Wild", &[5; 5]),
            Symbol::new(3, "Scatter", &[3; 5]).with_tiers(&[(800.0, 0), (400.0, 0), (200.0, 0)]),
            Symbol::new(4, "Bonus", &[3; 5]),
            Symbol::new(5, "FreeSpin", &[3; 5]).with_tiers(&[(0.0, 10), (0.0, 5), (0.0, 3)]),
            Symbol::new(6, "bare", &[3; 5]),
        ]
    }

    fn row_line() -> Payline {
        vec![0, 0, 0, 0, 0]
    }

    #[test]
    fn five_of_a_kind_pays_the_top_tier() {
        let eval = evaluate_lines(&vec![vec![0; 5]], &[row_line()], &catalogue(), 2.0);
        assert_eq!(eval.total_payout, 300.0);
        assert_eq!(eval.winning_lines.len(), 1);
        let win = &eval.winning_lines[0];
        assert_eq!((win.symbol, win.count, win.amount), (0, 5, 300.0));
        assert!(eval.warnings.is_empty());
    }

    #[test]
    fn three_of_a_kind_pays_the_bottom_tier() {
        let eval = evaluate_lines(&vec![vec![0, 0, 0, 1, 1]], &[row_line()], &catalogue(), 1.0);
        assert_eq!(eval.total_payout, 30.0);
        assert_eq!(eval.winning_lines[0].count, 3);
    }

    #[test]
    fn two_of_a_kind_pays_nothing() {
        let eval = evaluate_lines(&vec![vec![0, 0, 1, 0, 0]], &[row_line()], &catalogue(), 1.0);
        assert_eq!(eval.total_payout, 0.0);
        assert!(eval.winning_lines.is_empty());
    }

    #[test]
    fn wilds_extend_a_run_without_fixing_it() {
        // W W 0 0 0 -> run of five paying symbol 0's top tier
        let eval = evaluate_lines(&vec![vec![2, 2, 0, 0, 0]], &[row_line()], &catalogue(), 1.0);
        assert_eq!(eval.total_payout, 150.0);
        assert_eq!(eval.winning_lines[0].symbol, 0);
        assert_eq!(eval.winning_lines[0].count, 5);
    }

    #[test]
    fn wild_in_the_middle_joins_the_run() {
        let eval = evaluate_lines(&vec![vec![1, 2, 1, 0, 0]], &[row_line()], &catalogue(), 1.0);
        assert_eq!(eval.winning_lines[0].symbol, 1);
        assert_eq!(eval.winning_lines[0].count, 3);
        assert_eq!(eval.total_payout, 30.0);
    }

    #[test]
    fn all_wild_run_never_pays() {
        let eval = evaluate_lines(&vec![vec![2, 2, 2, 2, 2]], &[row_line()], &catalogue(), 1.0);
        assert_eq!(eval.total_payout, 0.0);
        assert!(eval.winning_lines.is_empty());
    }

    #[test]
    fn short_wild_run_never_pays() {
        let eval = evaluate_lines(&vec![vec![2, 2, 3, 0, 0]], &[row_line()], &catalogue(), 1.0);
        assert_eq!(eval.total_payout, 0.0);
    }

    #[test]
    fn scatter_stops_the_scan_where_it_appears() {
        // 0 0 0 Scatter 0: run is 3, not 4, regardless of what follows
        let eval = evaluate_lines(&vec![vec![0, 0, 0, 3, 0]], &[row_line()], &catalogue(), 1.0);
        assert_eq!(eval.winning_lines[0].count, 3);
        assert_eq!(eval.total_payout, 30.0);
    }

    #[test]
    fn run_breakers_before_three_kill_the_line() {
        for breaker in [3u32, 4, 5] {
            let eval = evaluate_lines(&vec![vec![0, 0, breaker, 0, 0]], &[row_line()], &catalogue(), 1.0);
            assert_eq!(eval.total_payout, 0.0, "breaker id {breaker}");
        }
    }

    #[test]
    fn mismatch_stops_the_run() {
        let eval = evaluate_lines(&vec![vec![0, 0, 0, 1, 0]], &[row_line()], &catalogue(), 1.0);
        assert_eq!(eval.winning_lines[0].count, 3);
    }

    #[test]
    fn missing_tier_means_no_win() {
        // symbol 6 has no multiplier table at all
        let eval = evaluate_lines(&vec![vec![6, 6, 6, 6, 6]], &[row_line()], &catalogue(), 1.0);
        assert_eq!(eval.total_payout, 0.0);
        assert!(eval.winning_lines.is_empty());
    }

    #[test]
    fn out_of_range_row_warns_and_other_lines_still_pay() {
        let matrix = vec![vec![0; 5], vec![1; 5], vec![6; 5]];
        let bad = vec![5, 5, 5, 5, 5];
        let eval = evaluate_lines(&matrix, &[bad, vec![1, 1, 1, 1, 1]], &catalogue(), 1.0);
        assert_eq!(eval.warnings.len(), 5);
        assert!(matches!(
            eval.warnings[0],
            DataIntegrityWarning::RowOutOfRange { line: 0, reel: 0, row: 5 }
        ));
        assert_eq!(eval.total_payout, 150.0);
        assert_eq!(eval.winning_lines[0].line_index, 1);
    }

    #[test]
    fn unknown_symbol_is_skipped_and_the_scan_continues() {
        // id 99 is not in the catalogue; the run resumes past it
        let eval = evaluate_lines(&vec![vec![0, 99, 0, 0, 0]], &[row_line()], &catalogue(), 1.0);
        assert_eq!(eval.warnings.len(), 1);
        assert!(matches!(
            eval.warnings[0],
            DataIntegrityWarning::UnknownSymbol { line: 0, reel: 1, id: 99 }
        ));
        assert_eq!(eval.winning_lines[0].count, 4);
        assert_eq!(eval.total_payout, 70.0);
    }

    #[test]
    fn total_is_the_sum_over_winning_lines() {
        let matrix = vec![vec![0; 5], vec![1; 5], vec![6; 5]];
        let lines = vec![vec![0; 5], vec![1; 5], vec![2; 5], vec![0, 1, 2, 1, 0]];
        let eval = evaluate_lines(&matrix, &lines, &catalogue(), 1.0);
        let summed: f64 = eval.winning_lines.iter().map(|w| w.amount).sum();
        assert_eq!(eval.total_payout, summed);
        assert!(eval.total_payout >= 0.0);
    }

    #[test]
    fn winning_lines_follow_declaration_order() {
        let matrix = vec![vec![0; 5], vec![1; 5], vec![0; 5]];
        let lines = vec![vec![2; 5], vec![0; 5], vec![1; 5]];
        let eval = evaluate_lines(&matrix, &lines, &catalogue(), 1.0);
        let order: Vec<usize> = eval.winning_lines.iter().map(|w| w.line_index).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn free_spin_award_is_carried_on_the_win() {
        // FreeSpin is a run breaker, so exercise the field through a
        // plain symbol with a free-spin tier
        let symbols = vec![Symbol::new(0, "0", &[7; 5]).with_tiers(&[(0.0, 10), (0.0, 5), (0.0, 3)])];
        let eval = evaluate_lines(&vec![vec![0; 5]], &[row_line()], &symbols, 1.0);
        assert_eq!(eval.winning_lines[0].free_spins, 10);
        assert_eq!(eval.total_payout, 0.0);
    }
}
