use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One `[lineMultiplier, freeSpins]` pair from a symbol's multiplier
/// table. The table is indexed by `5 - runLength`, so entry 0 pays a
/// five-of-a-kind and entry 2 a three-of-a-kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiplierTier(pub f64, pub u32);

impl MultiplierTier {
    pub fn line_multiplier(&self) -> f64 {
        self.0
    }

    pub fn free_spins(&self) -> u32 {
        self.1
    }
}

/// How a symbol behaves during run matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialKind {
    Plain,
    Wild,
    Scatter,
    Bonus,
    FreeSpin,
    Jackpot,
}

impl SpecialKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Wild" => SpecialKind::Wild,
            "Scatter" => SpecialKind::Scatter,
            "Bonus" => SpecialKind::Bonus,
            "FreeSpin" => SpecialKind::FreeSpin,
            "Jackpot" => SpecialKind::Jackpot,
            _ => SpecialKind::Plain,
        }
    }

    /// Scatter, Bonus, Jackpot and FreeSpin terminate a line scan
    /// wherever they appear; they never join a left-to-right run.
    pub fn breaks_runs(&self) -> bool {
        matches!(
            self,
            SpecialKind::Scatter | SpecialKind::Bonus | SpecialKind::Jackpot | SpecialKind::FreeSpin
        )
    }
}

/// One catalogue entry, in the par-sheet's own field layout.
///
/// `reelInstance` keys are stringified reel indices as they appear in
/// the sheet JSON; a reel with no entry contributes zero copies to that
/// strip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symbol {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Id")]
    pub id: u32,
    #[serde(rename = "reelInstance")]
    pub reel_instance: BTreeMap<String, u32>,
    #[serde(rename = "useWildSub", default)]
    pub use_wild_sub: bool,
    #[serde(rename = "multiplier", default, skip_serializing_if = "Vec::is_empty")]
    pub multiplier: Vec<MultiplierTier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Symbol {
    pub fn new(id: u32, name: impl Into<String>, per_reel: &[u32]) -> Self {
        Self {
            name: name.into(),
            id,
            reel_instance: per_reel
                .iter()
                .enumerate()
                .map(|(r, n)| (r.to_string(), *n))
                .collect(),
            use_wild_sub: false,
            multiplier: Vec::new(),
            description: None,
        }
    }

    pub fn with_tiers(mut self, tiers: &[(f64, u32)]) -> Self {
        self.multiplier = tiers.iter().map(|&(m, fs)| MultiplierTier(m, fs)).collect();
        self
    }

    pub fn kind(&self) -> SpecialKind {
        SpecialKind::from_name(&self.name)
    }

    pub fn is_wild(&self) -> bool {
        self.kind() == SpecialKind::Wild
    }

    /// Instance count for one reel; absent entries count as zero.
    pub fn instances_on(&self, reel: usize) -> u32 {
        self.reel_instance
            .get(&reel.to_string())
            .copied()
            .unwrap_or(0)
    }

    /// Tier paying a run of `count` symbols, if the table reaches it.
    pub fn tier_for_run(&self, count: u32) -> Option<&MultiplierTier> {
        let idx = 5u32.checked_sub(count)? as usize;
        self.multiplier.get(idx)
    }
}
