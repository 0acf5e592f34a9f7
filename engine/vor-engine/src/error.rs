//! Error types for the VOR engine

use thiserror::Error;

/// Result type alias for board computations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors that can occur while building a draft board.
///
/// Degenerate data (an empty position pool, nobody beating replacement, an
/// ADP feed without a usable column) is not an error; those cases come back
/// as undefined values or the ungraded tier.
#[derive(Error, Debug)]
pub enum BoardError {
    /// Invalid roster settings, team count or tiering parameters
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A required column is absent from an input table
    #[error("Missing column '{column}' in {table} table")]
    MissingColumn { table: &'static str, column: String },

    /// A required cell is present but unusable
    #[error("Invalid value {value} for column '{column}' in {table} table (row {row})")]
    InvalidValue { table: &'static str, column: String, row: usize, value: String },

    /// A row does not match the width of its table header
    #[error("Row {row} in {table} table has {found} cells, expected {expected}")]
    RowArity { table: &'static str, row: usize, expected: usize, found: usize },

    /// None of the scoring rule columns exist in the stats table
    #[error("No valid stat columns found to score")]
    NoScorableColumns,

    /// Config file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for a board config
    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// Config could not be rendered as TOML
    #[error("TOML render error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

impl BoardError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a new missing column error
    pub fn missing_column(table: &'static str, column: impl Into<String>) -> Self {
        Self::MissingColumn { table, column: column.into() }
    }

    /// Create a new invalid value error
    pub fn invalid_value(
        table: &'static str,
        column: impl Into<String>,
        row: usize,
        value: impl ToString,
    ) -> Self {
        Self::InvalidValue { table, column: column.into(), row, value: value.to_string() }
    }

    /// Whether this error came from configuration rather than data
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::TomlDe(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = BoardError::config("num_teams must be positive");
        assert_eq!(err.to_string(), "Configuration error: num_teams must be positive");
        assert!(err.is_configuration());

        let err = BoardError::missing_column("totals", "fantasy_pts_season");
        assert_eq!(err.to_string(), "Missing column 'fantasy_pts_season' in totals table");
        assert!(!err.is_configuration());

        let err = BoardError::invalid_value("totals", "fantasy_pts_season", 3, "\"abc\"");
        assert_eq!(
            err.to_string(),
            "Invalid value \"abc\" for column 'fantasy_pts_season' in totals table (row 3)"
        );
    }
}
