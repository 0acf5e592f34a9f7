use crate::error::{BoardError, Result};
use crate::models::{PlayerSeasonTotal, Position, ReplacementBaseline, RosterSettings, Tier, VorRecord};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Check the league format before any replacement math
pub fn validate_league(roster: &RosterSettings, num_teams: u32) -> Result<()> {
    if roster.is_empty() {
        return Err(BoardError::config("roster settings must name at least one position"));
    }
    if num_teams == 0 {
        return Err(BoardError::config("num_teams must be positive"));
    }
    Ok(())
}

/// Compute the replacement-level score for every rostered position.
///
/// With `k = starters * num_teams` startable slots league-wide, replacement
/// is the (k+1)-th best score at the position: the first player who is not
/// guaranteed a starting spot. A position with k or fewer players falls back
/// to its worst score. A rostered position with no players at all gets no
/// baseline row.
pub fn compute_replacement(
    totals: &[PlayerSeasonTotal],
    roster: &RosterSettings,
    num_teams: u32,
) -> Result<Vec<ReplacementBaseline>> {
    validate_league(roster, num_teams)?;

    let mut baselines = Vec::with_capacity(roster.len());
    for (position, starters) in roster.iter() {
        let k = starters as usize * num_teams as usize;
        let pool = top_scores(totals, position, k + 1);

        let replacement_pts =
            if pool.len() > k { Some(pool[k]) } else { pool.iter().copied().reduce(f64::min) };

        match replacement_pts {
            Some(pts) => {
                debug!(
                    "Replacement for {}: {:.2} pts (k={}, pool={})",
                    position,
                    pts,
                    k,
                    pool.len()
                );
                baselines.push(ReplacementBaseline { position: position.clone(), replacement_pts });
            }
            None => debug!("No eligible players at {}, skipping baseline", position),
        }
    }

    Ok(baselines)
}

/// The `n` best scores at a position, highest first. Equal scores keep input order.
fn top_scores(totals: &[PlayerSeasonTotal], position: &Position, n: usize) -> Vec<f64> {
    let mut scores: Vec<f64> = totals
        .iter()
        .filter(|t| t.position == *position)
        .map(|t| t.fantasy_pts_season)
        .collect();
    scores.sort_by(|a, b| b.total_cmp(a));
    scores.truncate(n);
    scores
}

/// Left-join every total to its position's baseline and compute VOR.
///
/// Rows whose position has no baseline keep an undefined `replacement_pts`
/// and `vor`. Tiers start out ungraded.
pub fn attach_vor(
    totals: &[PlayerSeasonTotal],
    baselines: &[ReplacementBaseline],
) -> Vec<VorRecord> {
    let by_position: HashMap<&Position, Option<f64>> =
        baselines.iter().map(|b| (&b.position, b.replacement_pts)).collect();

    let mut unrostered: HashSet<&Position> = HashSet::new();
    let records: Vec<VorRecord> = totals
        .iter()
        .map(|total| {
            let replacement_pts = by_position.get(&total.position).copied().flatten();
            if !by_position.contains_key(&total.position) {
                unrostered.insert(&total.position);
            }
            VorRecord {
                player_id: total.player_id.clone(),
                position: total.position.clone(),
                fantasy_pts_season: total.fantasy_pts_season,
                replacement_pts,
                vor: replacement_pts.map(|rep| total.fantasy_pts_season - rep),
                tier: Tier::UNGRADED,
            }
        })
        .collect();

    for position in unrostered {
        warn!("No replacement baseline for {}, VOR left undefined", position);
    }

    records
}

/// Replacement baselines plus per-player VOR, tiers not yet assigned
pub fn compute_vor(
    totals: &[PlayerSeasonTotal],
    roster: &RosterSettings,
    num_teams: u32,
) -> Result<Vec<VorRecord>> {
    let baselines = compute_replacement(totals, roster, num_teams)?;
    Ok(attach_vor(totals, &baselines))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qb_totals() -> Vec<PlayerSeasonTotal> {
        vec![
            PlayerSeasonTotal::new("A", "QB", 400.0),
            PlayerSeasonTotal::new("B", "QB", 350.0),
            PlayerSeasonTotal::new("C", "QB", 250.0),
        ]
    }

    fn roster(slots: &[(&str, u32)]) -> RosterSettings {
        RosterSettings::new(slots.iter().copied()).unwrap()
    }

    #[test]
    fn test_replacement_is_first_non_starter() {
        let baselines = compute_replacement(&qb_totals(), &roster(&[("qb", 1)]), 1).unwrap();
        assert_eq!(baselines.len(), 1);
        assert_eq!(baselines[0].position.as_str(), "QB");
        assert_eq!(baselines[0].replacement_pts, Some(350.0));
    }

    #[test]
    fn test_replacement_ignores_input_order() {
        let mut totals = qb_totals();
        totals.reverse();
        let baselines = compute_replacement(&totals, &roster(&[("QB", 1)]), 2).unwrap();
        // k = 2, third best is C
        assert_eq!(baselines[0].replacement_pts, Some(250.0));
    }

    #[test]
    fn test_replacement_small_pool_uses_minimum() {
        // k = 1 * 12 = 12 slots but only 3 QBs exist
        let baselines = compute_replacement(&qb_totals(), &roster(&[("qb", 1)]), 12).unwrap();
        assert_eq!(baselines[0].replacement_pts, Some(250.0));
    }

    #[test]
    fn test_zero_starters_uses_top_score() {
        let baselines = compute_replacement(&qb_totals(), &roster(&[("qb", 0)]), 10).unwrap();
        assert_eq!(baselines[0].replacement_pts, Some(400.0));
    }

    #[test]
    fn test_empty_position_has_no_baseline() {
        let baselines =
            compute_replacement(&qb_totals(), &roster(&[("qb", 1), ("te", 1)]), 1).unwrap();
        assert_eq!(baselines.len(), 1);
        assert!(baselines.iter().all(|b| b.position.as_str() != "TE"));
    }

    #[test]
    fn test_invalid_league_rejected() {
        let err = compute_replacement(&qb_totals(), &RosterSettings::default(), 12).unwrap_err();
        assert!(err.is_configuration());

        let err = compute_replacement(&qb_totals(), &roster(&[("qb", 1)]), 0).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_attach_vor() {
        let records = compute_vor(&qb_totals(), &roster(&[("qb", 1)]), 1).unwrap();
        let vors: Vec<Option<f64>> = records.iter().map(|r| r.vor).collect();
        assert_eq!(vors, vec![Some(50.0), Some(0.0), Some(-100.0)]);
        assert!(records.iter().all(|r| r.replacement_pts == Some(350.0)));
        assert!(records.iter().all(|r| r.tier == Tier::UNGRADED));
    }

    #[test]
    fn test_unrostered_position_has_undefined_vor() {
        let mut totals = qb_totals();
        totals.push(PlayerSeasonTotal::new("K1", "k", 140.0));

        let records = compute_vor(&totals, &roster(&[("qb", 1)]), 1).unwrap();
        assert_eq!(records.len(), 4);

        let kicker = records.iter().find(|r| r.player_id == "K1").unwrap();
        assert_eq!(kicker.position.as_str(), "K");
        assert_eq!(kicker.replacement_pts, None);
        assert_eq!(kicker.vor, None);
    }

    #[test]
    fn test_positions_are_separate_pools() {
        let totals = vec![
            PlayerSeasonTotal::new("R1", "RB", 280.0),
            PlayerSeasonTotal::new("W1", "WR", 300.0),
            PlayerSeasonTotal::new("R2", "rb", 210.0),
            PlayerSeasonTotal::new("W2", "wr", 190.0),
            PlayerSeasonTotal::new("R3", "RB", 150.0),
        ];
        let records = compute_vor(&totals, &roster(&[("rb", 1), ("wr", 1)]), 1).unwrap();

        let vor_of = |id: &str| records.iter().find(|r| r.player_id == id).unwrap().vor;
        assert_eq!(vor_of("R1"), Some(70.0));
        assert_eq!(vor_of("R3"), Some(-60.0));
        assert_eq!(vor_of("W1"), Some(110.0));
        assert_eq!(vor_of("W2"), Some(0.0));
    }
}
