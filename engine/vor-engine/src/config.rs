use crate::error::{BoardError, Result};
use crate::models::RosterSettings;
use crate::replacement::validate_league;
use crate::scoring::ScoringRules;
use crate::tiering::TierMethod;
use crate::{DEFAULT_NUM_TEAMS, DEFAULT_QUANTILE, DEFAULT_TIER_WIDTH};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding the team count
pub const ENV_NUM_TEAMS: &str = "VOR_NUM_TEAMS";
/// Environment variable overriding the tier method ("quantile" | "fixed")
pub const ENV_TIER_METHOD: &str = "VOR_TIER_METHOD";
/// Environment variable overriding the tier fraction or width
pub const ENV_TIER_PARAM: &str = "VOR_TIER_PARAM";

/// Configuration for building draft boards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// League format
    pub league: LeagueConfig,

    /// Tiering strategy and its parameter
    pub tiering: TierMethod,

    /// Weekly scoring rules (used when building from weekly stats)
    pub scoring: ScoringRules,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueConfig {
    /// Teams in the league
    pub num_teams: u32,

    /// Starters per team by position
    pub roster: RosterSettings,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            league: LeagueConfig::default(),
            tiering: TierMethod::default(),
            scoring: ScoringRules::half_ppr(),
        }
    }
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self { num_teams: DEFAULT_NUM_TEAMS, roster: RosterSettings::standard() }
    }
}

impl BoardConfig {
    /// Default configuration with environment overrides applied
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `VOR_*` overrides looked up through `lookup`.
    ///
    /// Changing the tier method without a parameter keeps the current
    /// parameter when the method is unchanged, else uses that method's default.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(teams) = lookup(ENV_NUM_TEAMS) {
            self.league.num_teams = teams.trim().parse().map_err(|_| {
                BoardError::config(format!("{ENV_NUM_TEAMS} must be a positive integer, got '{teams}'"))
            })?;
        }

        let param = match lookup(ENV_TIER_PARAM) {
            Some(raw) => Some(raw.trim().parse::<f64>().map_err(|_| {
                BoardError::config(format!("{ENV_TIER_PARAM} must be a number, got '{raw}'"))
            })?),
            None => None,
        };

        let method = lookup(ENV_TIER_METHOD)
            .map(|m| m.trim().to_lowercase())
            .unwrap_or_else(|| self.tiering.name().to_string());

        if method != self.tiering.name() || param.is_some() {
            let param = param.unwrap_or(if method == self.tiering.name() {
                self.tiering.param()
            } else if method == "fixed" {
                DEFAULT_TIER_WIDTH
            } else {
                DEFAULT_QUANTILE
            });
            self.tiering = TierMethod::from_name(&method, param)?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Reject configurations the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        validate_league(&self.league.roster, self.league.num_teams)?;
        self.tiering.validate()
    }

    /// Parse and validate a TOML configuration
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: BoardConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
