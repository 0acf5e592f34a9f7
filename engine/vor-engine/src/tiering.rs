//! Tier assignment within position groups.
//!
//! Two policies share the `TierPolicy` interface. Quantile tiers split the
//! players who beat replacement into equal-count bands and leave everyone
//! else ungraded. Fixed-width tiers step every player by a point width and
//! have no ungraded sentinel.

use crate::error::{BoardError, Result};
use crate::models::{Position, Tier, VorRecord};
use crate::DEFAULT_QUANTILE;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Tiering policy for a single position group
pub trait TierPolicy {
    /// Tiers for one position group, index-aligned with `vors`
    fn assign(&self, vors: &[Option<f64>]) -> Vec<Tier>;
}

/// Equal-count bands over players with positive VOR
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantileTiers {
    /// Band fraction in (0, 1]; 0.2 means five bands of 20%
    pub q: f64,
}

impl QuantileTiers {
    pub fn new(q: f64) -> Result<Self> {
        let tiers = Self { q };
        tiers.validate()?;
        Ok(tiers)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.q.is_finite() && self.q > 0.0 && self.q <= 1.0) {
            return Err(BoardError::config(format!(
                "quantile tier fraction must be in (0, 1], got {}",
                self.q
            )));
        }
        Ok(())
    }

    /// Number of bands, ceil(1 / q)
    pub fn bins(&self) -> usize {
        (1.0 / self.q).ceil() as usize
    }
}

impl TierPolicy for QuantileTiers {
    fn assign(&self, vors: &[Option<f64>]) -> Vec<Tier> {
        let mut tiers = vec![Tier::UNGRADED; vors.len()];

        let mut positive: Vec<(usize, f64)> = vors
            .iter()
            .enumerate()
            .filter_map(|(i, vor)| vor.filter(|v| *v > 0.0).map(|v| (i, v)))
            .collect();

        if positive.is_empty() {
            return tiers;
        }

        let bins = self.bins();
        if bins <= 1 || positive.len() < bins {
            // Too few players to subdivide
            for (i, _) in positive {
                tiers[i] = Tier::TOP;
            }
            return tiers;
        }

        // Stable: equal VOR keeps input order
        positive.sort_by(|a, b| b.1.total_cmp(&a.1));

        let count = positive.len();
        for (rank, (i, _)) in positive.into_iter().enumerate() {
            tiers[i] = Tier(quantile_band(rank, count, bins));
        }
        tiers
    }
}

/// Band of a 0-based rank when `count` ranks are cut into `bins` quantiles.
///
/// Ranks 1..=count are split at the edges 1 + (count-1)·j/bins, right-closed
/// with the lowest edge included; integer arithmetic keeps the edges exact.
/// Requires count >= bins >= 2.
fn quantile_band(rank: usize, count: usize, bins: usize) -> u32 {
    let span = count - 1;
    let band = (rank * bins).div_ceil(span);
    band.max(1) as u32
}

/// Fixed point-width steps: tier = ceil(vor / width), never below 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedWidthTiers {
    /// Points per tier
    #[serde(alias = "q")]
    pub width: f64,
}

impl FixedWidthTiers {
    pub fn new(width: f64) -> Result<Self> {
        let tiers = Self { width };
        tiers.validate()?;
        Ok(tiers)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(BoardError::config(format!(
                "fixed tier width must be positive, got {}",
                self.width
            )));
        }
        Ok(())
    }
}

impl TierPolicy for FixedWidthTiers {
    fn assign(&self, vors: &[Option<f64>]) -> Vec<Tier> {
        vors.iter()
            .map(|vor| match vor {
                Some(v) => Tier((v / self.width).ceil().max(1.0) as u32),
                None => Tier::UNGRADED,
            })
            .collect()
    }
}

/// Configured tiering strategy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum TierMethod {
    Quantile(QuantileTiers),
    Fixed(FixedWidthTiers),
}

impl Default for TierMethod {
    fn default() -> Self {
        TierMethod::Quantile(QuantileTiers { q: DEFAULT_QUANTILE })
    }
}

impl TierMethod {
    /// Build a strategy from its name ("quantile" or "fixed") and parameter
    pub fn from_name(name: &str, param: f64) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "quantile" => Ok(TierMethod::Quantile(QuantileTiers::new(param)?)),
            "fixed" => Ok(TierMethod::Fixed(FixedWidthTiers::new(param)?)),
            other => Err(BoardError::config(format!(
                "tier_method must be 'quantile' or 'fixed', got '{other}'"
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TierMethod::Quantile(_) => "quantile",
            TierMethod::Fixed(_) => "fixed",
        }
    }

    /// The band fraction or point width
    pub fn param(&self) -> f64 {
        match self {
            TierMethod::Quantile(t) => t.q,
            TierMethod::Fixed(t) => t.width,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            TierMethod::Quantile(t) => t.validate(),
            TierMethod::Fixed(t) => t.validate(),
        }
    }
}

impl TierPolicy for TierMethod {
    fn assign(&self, vors: &[Option<f64>]) -> Vec<Tier> {
        match self {
            TierMethod::Quantile(t) => t.assign(vors),
            TierMethod::Fixed(t) => t.assign(vors),
        }
    }
}

/// Assign tiers in place, independently within each position group
pub fn assign_tiers<P: TierPolicy + ?Sized>(records: &mut [VorRecord], policy: &P) {
    let mut groups: Vec<(Position, Vec<usize>)> = Vec::new();
    let mut group_of: HashMap<Position, usize> = HashMap::new();

    for (i, record) in records.iter().enumerate() {
        let slot = *group_of.entry(record.position.clone()).or_insert_with(|| {
            groups.push((record.position.clone(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(i);
    }

    for (position, members) in groups {
        let vors: Vec<Option<f64>> = members.iter().map(|&i| records[i].vor).collect();
        let tiers = policy.assign(&vors);

        let graded = tiers.iter().filter(|t| t.is_graded()).count();
        debug!("Tiered {}: {} players, {} graded", position, members.len(), graded);

        for (i, tier) in members.into_iter().zip(tiers) {
            records[i].tier = tier;
        }
    }
}
