//! Weekly fantasy scoring and season aggregation.
//!
//! Turns raw weekly stat lines into fantasy points with a linear rule set
//! (stat column → points per unit), then rolls them up into the season
//! totals the replacement engine consumes.

use crate::error::{BoardError, Result};
use crate::models::{PlayerSeasonTotal, Position};
use crate::table::{self, Table, PLAYER_ID, POSITION};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Points per unit for each stat column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoringRules {
    weights: BTreeMap<String, f64>,
}

impl ScoringRules {
    pub fn new<I, S>(weights: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self { weights: weights.into_iter().map(|(k, v)| (k.into(), v)).collect() }
    }

    /// Half-PPR scoring over nflfastR-style column names
    pub fn half_ppr() -> Self {
        Self::new([
            ("pass_tds", 4.0),
            ("pass_yds", 0.04),
            ("pass_ints", -2.0),
            ("rush_tds", 6.0),
            ("rush_yds", 0.1),
            ("rec_rec", 0.5),
            ("rec_yds", 0.1),
            ("rec_tds", 6.0),
            ("fumbles_lost", -2.0),
        ])
    }

    pub fn weight(&self, stat: &str) -> Option<f64> {
        self.weights.get(stat).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self::half_ppr()
    }
}

/// Fantasy points for every row of a weekly stats table.
///
/// Rule columns the table lacks count as zero (reported once). Blank cells
/// count as zero. Fails if the table has none of the rule columns.
pub fn score_weekly(stats: &Table, rules: &ScoringRules) -> Result<Vec<f64>> {
    let mut usable: Vec<(usize, f64)> = Vec::new();
    let mut missing: Vec<&str> = Vec::new();

    for (stat, weight) in rules.iter() {
        match stats.column_index(stat) {
            Some(col) => usable.push((col, weight)),
            None => missing.push(stat),
        }
    }

    if !missing.is_empty() {
        warn!("Stat columns not found and treated as 0: {}", missing.join(", "));
    }
    if usable.is_empty() {
        return Err(BoardError::NoScorableColumns);
    }

    Ok(stats
        .rows()
        .map(|row| {
            usable
                .iter()
                .map(|&(col, weight)| table::numeric(&row[col]).unwrap_or(0.0) * weight)
                .sum::<f64>()
        })
        .collect())
}

/// Sum weekly points into one season total per player.
///
/// `points` is index-aligned with the rows of `weekly` (the output of
/// `score_weekly`). Players appear in first-seen order and keep their
/// first-seen position.
pub fn aggregate_season(weekly: &Table, points: &[f64]) -> Result<Vec<PlayerSeasonTotal>> {
    const NAME: &str = "weekly";

    let id_col = weekly.require_column(NAME, PLAYER_ID)?;
    let pos_col = weekly.require_column(NAME, POSITION)?;
    if points.len() != weekly.len() {
        return Err(BoardError::RowArity {
            table: NAME,
            row: weekly.len(),
            expected: weekly.len(),
            found: points.len(),
        });
    }

    let mut totals: Vec<PlayerSeasonTotal> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (i, (row, pts)) in weekly.rows().zip(points).enumerate() {
        let player_id = table::identifier(&row[id_col])
            .ok_or_else(|| BoardError::invalid_value(NAME, PLAYER_ID, i, &row[id_col]))?;

        match index.get(&player_id) {
            Some(&slot) => totals[slot].fantasy_pts_season += pts,
            None => {
                let position = match row[pos_col].as_str() {
                    Some(p) if !p.trim().is_empty() => Position::new(p),
                    _ => return Err(BoardError::invalid_value(NAME, POSITION, i, &row[pos_col])),
                };
                index.insert(player_id.clone(), totals.len());
                totals.push(PlayerSeasonTotal { player_id, position, fantasy_pts_season: *pts });
            }
        }
    }

    debug!("Aggregated {} weekly rows into {} season totals", weekly.len(), totals.len());
    Ok(totals)
}

/// Score a weekly table and aggregate it in one step
pub fn season_totals(weekly: &Table, rules: &ScoringRules) -> Result<Vec<PlayerSeasonTotal>> {
    let points = score_weekly(weekly, rules)?;
    aggregate_season(weekly, &points)
}
