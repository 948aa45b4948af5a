use crate::symbols::Symbol;

/// Default strip length: the build truncates to this, never pads.
pub const DEFAULT_STRIP_LENGTH: usize = 72;

/// The ordered symbol ids one reel can stop on. Built once per
/// catalogue and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReelStrip(Vec<u32>);

impl ReelStrip {
    pub fn ids(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Expands the catalogue into one strip per reel: for each symbol, in
/// catalogue order, its per-reel instance count of copies, truncated to
/// `strip_length`. A catalogue whose counts sum below `strip_length`
/// yields a shorter strip; downstream draws bound against the actual
/// length. Deterministic, no randomness.
pub fn build_reel_strips(symbols: &[Symbol], reel_count: usize, strip_length: usize) -> Vec<ReelStrip> {
    (0..reel_count)
        .map(|reel| {
            let mut strip = Vec::with_capacity(strip_length);
            'fill: for sym in symbols {
                for _ in 0..sym.instances_on(reel) {
                    if strip.len() == strip_length {
                        break 'fill;
                    }
                    strip.push(sym.id);
                }
            }
            ReelStrip(strip)
        })
        .collect()
}
