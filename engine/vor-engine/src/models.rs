use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Fantasy position code, always stored uppercase.
///
/// Upstream feeds mix "qb", "QB" and " Qb "; every position enters the
/// engine through this type so joins never miss on case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Position(String);

impl Position {
    /// Normalize a raw position label
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Position {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<&str> for Position {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<Position> for String {
    fn from(position: Position) -> Self {
        position.0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Season scoring total for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSeasonTotal {
    /// Stable upstream player id (e.g. a Sleeper id)
    pub player_id: String,

    /// Position (e.g., "QB", "RB", "WR", "TE")
    pub position: Position,

    /// Season-aggregate fantasy points
    pub fantasy_pts_season: f64,
}

impl PlayerSeasonTotal {
    pub fn new(player_id: impl Into<String>, position: &str, fantasy_pts_season: f64) -> Self {
        Self { player_id: player_id.into(), position: Position::new(position), fantasy_pts_season }
    }
}

/// Starters per team for each rostered position, in caller order.
///
/// Positions left out of the roster (kickers, defenses) are excluded from
/// VOR by omission: they get no baseline and therefore no value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, u32>", into = "BTreeMap<String, u32>")]
pub struct RosterSettings {
    slots: Vec<(Position, u32)>,
}

impl RosterSettings {
    /// Build roster settings from (position, starters) pairs.
    ///
    /// Fails if two labels normalize to the same position ("qb" and "QB").
    pub fn new<'a, I>(slots: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, u32)>,
    {
        let mut roster = Self::default();
        for (raw, starters) in slots {
            roster.insert(Position::new(raw), starters)?;
        }
        Ok(roster)
    }

    /// The usual one-QB redraft roster: 1 QB, 2 RB, 2 WR, 1 TE
    pub fn standard() -> Self {
        Self {
            slots: vec![
                (Position::new("QB"), 1),
                (Position::new("RB"), 2),
                (Position::new("WR"), 2),
                (Position::new("TE"), 1),
            ],
        }
    }

    fn insert(&mut self, position: Position, starters: u32) -> Result<()> {
        if self.slots.iter().any(|(p, _)| *p == position) {
            return Err(BoardError::config(format!("duplicate roster position {position}")));
        }
        self.slots.push((position, starters));
        Ok(())
    }

    /// Starters for a position, if it is rostered
    pub fn starters(&self, position: &Position) -> Option<u32> {
        self.slots.iter().find(|(p, _)| p == position).map(|(_, n)| *n)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Position, u32)> {
        self.slots.iter().map(|(p, n)| (p, *n))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl TryFrom<BTreeMap<String, u32>> for RosterSettings {
    type Error = BoardError;

    fn try_from(map: BTreeMap<String, u32>) -> Result<Self> {
        Self::new(map.iter().map(|(k, v)| (k.as_str(), *v)))
    }
}

impl From<RosterSettings> for BTreeMap<String, u32> {
    fn from(roster: RosterSettings) -> Self {
        roster.slots.into_iter().map(|(p, n)| (p.into(), n)).collect()
    }
}

/// Replacement-level score for one position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplacementBaseline {
    pub position: Position,

    /// Undefined when the roster names a position with no eligible players
    pub replacement_pts: Option<f64>,
}

/// Ordinal tier, 1 = best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tier(pub u32);

impl Tier {
    /// Top tier
    pub const TOP: Tier = Tier(1);

    /// Below replacement, or nobody at the position beats replacement
    pub const UNGRADED: Tier = Tier(99);

    pub fn is_graded(self) -> bool {
        self != Self::UNGRADED
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Season total with its value over replacement and tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VorRecord {
    pub player_id: String,
    pub position: Position,
    pub fantasy_pts_season: f64,

    /// Baseline for this row's position; undefined for unrostered positions
    pub replacement_pts: Option<f64>,

    /// fantasy_pts_season - replacement_pts
    pub vor: Option<f64>,

    pub tier: Tier,
}

/// Market consensus draft position for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdpRecord {
    pub player_id: String,

    /// Average pick, smaller = drafted earlier
    pub adp: Option<f64>,

    pub adp_stdev: Option<f64>,
}

/// A fully enriched draft board row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardRow {
    #[serde(flatten)]
    pub record: VorRecord,

    pub adp: Option<f64>,
    pub adp_stdev: Option<f64>,

    /// vor / adp, defined only when both exist and adp is nonzero
    pub value_vs_adp: Option<f64>,
}

impl BoardRow {
    pub fn player_id(&self) -> &str {
        &self.record.player_id
    }

    pub fn position(&self) -> &Position {
        &self.record.position
    }

    pub fn vor(&self) -> Option<f64> {
        self.record.vor
    }

    pub fn tier(&self) -> Tier {
        self.record.tier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_normalization() {
        assert_eq!(Position::new(" qb ").as_str(), "QB");
        assert_eq!(Position::from("Te"), Position::new("TE"));

        let parsed: Position = serde_json::from_str("\"wr\"").unwrap();
        assert_eq!(parsed.as_str(), "WR");
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"WR\"");
    }

    #[test]
    fn test_roster_settings_keeps_caller_order() {
        let roster = RosterSettings::new([("wr", 3), ("qb", 1)]).unwrap();
        let order: Vec<&str> = roster.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(order, vec!["WR", "QB"]);
        assert_eq!(roster.starters(&Position::new("qb")), Some(1));
        assert_eq!(roster.starters(&Position::new("K")), None);
    }

    #[test]
    fn test_roster_settings_rejects_case_duplicates() {
        let err = RosterSettings::new([("qb", 1), ("QB", 2)]).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_roster_settings_from_map() {
        let map: BTreeMap<String, u32> =
            [("rb".to_string(), 2), ("te".to_string(), 1)].into_iter().collect();
        let roster = RosterSettings::try_from(map).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.starters(&Position::new("RB")), Some(2));
    }

    #[test]
    fn test_tier_sentinel() {
        assert!(Tier::TOP.is_graded());
        assert!(!Tier::UNGRADED.is_graded());
        assert_eq!(Tier::UNGRADED.to_string(), "99");
        assert!(Tier::TOP < Tier::UNGRADED);
    }
}
