use crate::adp::{attach_adp, resolve_adp, without_adp};
use crate::config::BoardConfig;
use crate::error::Result;
use crate::models::{AdpRecord, BoardRow, PlayerSeasonTotal, ReplacementBaseline, RosterSettings, VorRecord};
use crate::replacement::{attach_vor, compute_replacement};
use crate::scoring::season_totals;
use crate::table::{totals_from_table, Table};
use crate::tiering::{assign_tiers, TierMethod};
use std::cmp::Ordering;
use tracing::{debug, info};

/// Replacement baselines, VOR and tiers in one pass
pub fn compute_vor_with_tiers(
    totals: &[PlayerSeasonTotal],
    roster: &RosterSettings,
    num_teams: u32,
    method: &TierMethod,
) -> Result<Vec<VorRecord>> {
    method.validate()?;
    let baselines = compute_replacement(totals, roster, num_teams)?;
    let mut records = attach_vor(totals, &baselines);
    assign_tiers(&mut records, method);
    Ok(records)
}

/// Draft board builder bound to one league configuration.
///
/// Every call is a pure function of its inputs; boards for different seasons
/// can be built from one engine, or from several engines on separate threads.
#[derive(Debug, Clone)]
pub struct BoardEngine {
    config: BoardConfig,
}

impl BoardEngine {
    /// Create an engine, rejecting invalid configurations up front
    pub fn new(config: BoardConfig) -> Result<Self> {
        config.validate()?;
        debug!(
            "Board engine: {} teams, {} roster positions, {} tiers ({})",
            config.league.num_teams,
            config.league.roster.len(),
            config.tiering.name(),
            config.tiering.param()
        );
        Ok(Self { config })
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Replacement baseline per rostered position
    pub fn replacement(&self, totals: &[PlayerSeasonTotal]) -> Result<Vec<ReplacementBaseline>> {
        compute_replacement(totals, &self.config.league.roster, self.config.league.num_teams)
    }

    /// VOR and tiers for every season total
    pub fn compute_vor(&self, totals: &[PlayerSeasonTotal]) -> Result<Vec<VorRecord>> {
        compute_vor_with_tiers(
            totals,
            &self.config.league.roster,
            self.config.league.num_teams,
            &self.config.tiering,
        )
    }

    /// Full board, optionally enriched with ADP
    pub fn build_board(
        &self,
        totals: &[PlayerSeasonTotal],
        adp: Option<&[AdpRecord]>,
    ) -> Result<Vec<BoardRow>> {
        let records = self.compute_vor(totals)?;
        let board = match adp {
            Some(adp) => attach_adp(records, adp),
            None => without_adp(records),
        };

        let graded = board.iter().filter(|r| r.tier().is_graded()).count();
        let with_adp = board.iter().filter(|r| r.adp.is_some()).count();
        info!(
            "Built board: {} players, {} graded, {} with ADP",
            board.len(),
            graded,
            with_adp
        );
        Ok(board)
    }

    /// Full board from ingestion tables
    pub fn build_from_tables(&self, totals: &Table, adp: Option<&Table>) -> Result<Vec<BoardRow>> {
        let totals = totals_from_table(totals)?;
        self.build_with_adp_table(&totals, adp)
    }

    /// Full board from weekly stat lines, scored with the configured rules
    pub fn build_from_weekly(&self, weekly: &Table, adp: Option<&Table>) -> Result<Vec<BoardRow>> {
        let totals = season_totals(weekly, &self.config.scoring)?;
        self.build_with_adp_table(&totals, adp)
    }

    fn build_with_adp_table(
        &self,
        totals: &[PlayerSeasonTotal],
        adp: Option<&Table>,
    ) -> Result<Vec<BoardRow>> {
        match adp {
            Some(table) => {
                let (_, records) = resolve_adp(table)?;
                self.build_board(totals, Some(&records))
            }
            None => self.build_board(totals, None),
        }
    }
}

/// Conventional presentation orders for a board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardOrder {
    /// Tier ascending, then VOR descending
    TierThenVor,
    /// Position, then tier ascending, then value vs ADP descending
    PositionTierValueVsAdp,
}

impl BoardOrder {
    /// Stable sort; undefined values go last
    pub fn sort(self, rows: &mut [BoardRow]) {
        match self {
            BoardOrder::TierThenVor => rows.sort_by(|a, b| {
                a.tier().cmp(&b.tier()).then_with(|| descending(a.vor(), b.vor()))
            }),
            BoardOrder::PositionTierValueVsAdp => rows.sort_by(|a, b| {
                a.position()
                    .cmp(b.position())
                    .then_with(|| a.tier().cmp(&b.tier()))
                    .then_with(|| descending(a.value_vs_adp, b.value_vs_adp))
            }),
        }
    }
}

fn descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tier;
    use crate::tiering::QuantileTiers;

    fn engine(roster: &[(&str, u32)], num_teams: u32, tiering: TierMethod) -> BoardEngine {
        let mut config = BoardConfig::default();
        config.league.roster = RosterSettings::new(roster.iter().copied()).unwrap();
        config.league.num_teams = num_teams;
        config.tiering = tiering;
        BoardEngine::new(config).unwrap()
    }

    fn row(id: &str, pos: &str, tier: u32, vor: Option<f64>, value: Option<f64>) -> BoardRow {
        BoardRow {
            record: VorRecord {
                player_id: id.to_string(),
                position: pos.into(),
                fantasy_pts_season: 0.0,
                replacement_pts: None,
                vor,
                tier: Tier(tier),
            },
            adp: None,
            adp_stdev: None,
            value_vs_adp: value,
        }
    }

    #[test]
    fn test_engine_rejects_invalid_config() {
        let mut config = BoardConfig::default();
        config.league.num_teams = 0;
        assert!(BoardEngine::new(config).is_err());

        let mut config = BoardConfig::default();
        config.tiering = TierMethod::Quantile(QuantileTiers { q: 2.0 });
        assert!(BoardEngine::new(config).is_err());
    }

    #[test]
    fn test_compute_vor_assigns_tiers() {
        let engine = engine(&[("qb", 1)], 1, TierMethod::from_name("quantile", 0.5).unwrap());
        let totals = vec![
            PlayerSeasonTotal::new("A", "QB", 400.0),
            PlayerSeasonTotal::new("B", "QB", 350.0),
            PlayerSeasonTotal::new("C", "QB", 250.0),
        ];

        let records = engine.compute_vor(&totals).unwrap();
        let tiers: Vec<Tier> = records.iter().map(|r| r.tier).collect();
        assert_eq!(tiers, vec![Tier::TOP, Tier::UNGRADED, Tier::UNGRADED]);
    }

    #[test]
    fn test_sort_tier_then_vor() {
        let mut rows = vec![
            row("a", "RB", 99, Some(-3.0), None),
            row("b", "WR", 2, Some(10.0), None),
            row("c", "RB", 1, Some(40.0), None),
            row("d", "QB", 2, None, None),
            row("e", "QB", 2, Some(25.0), None),
        ];
        BoardOrder::TierThenVor.sort(&mut rows);
        let ids: Vec<&str> = rows.iter().map(|r| r.player_id()).collect();
        assert_eq!(ids, vec!["c", "e", "b", "d", "a"]);
    }

    #[test]
    fn test_sort_position_tier_value() {
        let mut rows = vec![
            row("w1", "WR", 1, Some(30.0), Some(0.5)),
            row("q1", "QB", 1, Some(20.0), None),
            row("q2", "QB", 1, Some(10.0), Some(1.5)),
            row("w2", "WR", 1, Some(35.0), Some(2.0)),
        ];
        BoardOrder::PositionTierValueVsAdp.sort(&mut rows);
        let ids: Vec<&str> = rows.iter().map(|r| r.player_id()).collect();
        assert_eq!(ids, vec!["q2", "q1", "w2", "w1"]);
    }
}
