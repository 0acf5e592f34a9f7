//! Column-named tables as handed over by ingestion.
//!
//! Providers deliver loosely typed tables whose column names drift between
//! sources. `Table` keeps the header in source order (column resolution is
//! first-match) and the cells as raw JSON values until a reader coerces them.

use crate::error::{BoardError, Result};
use crate::models::{PlayerSeasonTotal, Position};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PLAYER_ID: &str = "player_id";
pub const POSITION: &str = "position";
pub const FANTASY_PTS_SEASON: &str = "fantasy_pts_season";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTable")]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

#[derive(Deserialize)]
struct RawTable {
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<Value>>,
}

impl TryFrom<RawTable> for Table {
    type Error = BoardError;

    fn try_from(raw: RawTable) -> Result<Self> {
        Self::with_rows(raw.columns, raw.rows)
    }
}

impl Table {
    /// Create an empty table with the given header
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { columns: columns.into_iter().map(Into::into).collect(), rows: Vec::new() }
    }

    /// Create a table and load its rows, checking every row's width
    pub fn with_rows<I, S>(columns: I, rows: Vec<Vec<Value>>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(BoardError::RowArity {
                table: "input",
                row: self.rows.len(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Value]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Index of the column with exactly this name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Like `column_index`, but a missing column is an error
    pub fn require_column(&self, table: &'static str, name: &str) -> Result<usize> {
        self.column_index(name).ok_or_else(|| BoardError::missing_column(table, name))
    }
}

/// Coerce a cell to a number; null, blanks and non-numeric text are undefined.
pub fn numeric(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|v| v.is_finite())
}

/// Coerce a cell to a player id. Integer ids are rendered in decimal.
pub fn identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
        _ => None,
    }
}

/// Read season totals out of an ingestion table.
///
/// Requires `player_id`, `position` and `fantasy_pts_season`. Positions are
/// normalized here and nowhere else.
pub fn totals_from_table(table: &Table) -> Result<Vec<PlayerSeasonTotal>> {
    const NAME: &str = "totals";

    let id_col = table.require_column(NAME, PLAYER_ID)?;
    let pos_col = table.require_column(NAME, POSITION)?;
    let pts_col = table.require_column(NAME, FANTASY_PTS_SEASON)?;

    table
        .rows()
        .enumerate()
        .map(|(i, row)| {
            let player_id = identifier(&row[id_col])
                .ok_or_else(|| BoardError::invalid_value(NAME, PLAYER_ID, i, &row[id_col]))?;
            let position = match &row[pos_col] {
                Value::String(s) if !s.trim().is_empty() => Position::new(s),
                other => return Err(BoardError::invalid_value(NAME, POSITION, i, other)),
            };
            let fantasy_pts_season = numeric(&row[pts_col]).ok_or_else(|| {
                BoardError::invalid_value(NAME, FANTASY_PTS_SEASON, i, &row[pts_col])
            })?;

            Ok(PlayerSeasonTotal { player_id, position, fantasy_pts_season })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn totals_table() -> Table {
        Table::with_rows(
            ["player_id", "full_name", "position", "fantasy_pts_season"],
            vec![
                vec![json!("4046"), json!("Patrick Mahomes"), json!("qb"), json!(352.4)],
                vec![json!(6794), json!("Justin Jefferson"), json!(" WR"), json!("301.5")],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_row_arity_checked() {
        let mut table = Table::new(["a", "b"]);
        table.push_row(vec![json!(1), json!(2)]).unwrap();
        let err = table.push_row(vec![json!(1)]).unwrap_err();
        assert!(matches!(err, BoardError::RowArity { row: 1, expected: 2, found: 1, .. }));
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(numeric(&json!(12.5)), Some(12.5));
        assert_eq!(numeric(&json!(" 7 ")), Some(7.0));
        assert_eq!(numeric(&json!("n/a")), None);
        assert_eq!(numeric(&json!(null)), None);
        assert_eq!(numeric(&json!(true)), None);
    }

    #[test]
    fn test_identifier_coercion() {
        assert_eq!(identifier(&json!("4046")), Some("4046".to_string()));
        assert_eq!(identifier(&json!(6794)), Some("6794".to_string()));
        assert_eq!(identifier(&json!("  ")), None);
        assert_eq!(identifier(&json!(1.5)), None);
    }

    #[test]
    fn test_totals_from_table() {
        let totals = totals_from_table(&totals_table()).unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0], PlayerSeasonTotal::new("4046", "QB", 352.4));
        assert_eq!(totals[1].player_id, "6794");
        assert_eq!(totals[1].position.as_str(), "WR");
        assert_eq!(totals[1].fantasy_pts_season, 301.5);
    }

    #[test]
    fn test_totals_missing_column() {
        let table = Table::new(["player_id", "position", "fantasy_pts"]);
        let err = totals_from_table(&table).unwrap_err();
        match err {
            BoardError::MissingColumn { table, column } => {
                assert_eq!(table, "totals");
                assert_eq!(column, "fantasy_pts_season");
            }
            other => panic!("Expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_totals_invalid_points() {
        let table = Table::with_rows(
            ["player_id", "position", "fantasy_pts_season"],
            vec![vec![json!("1"), json!("RB"), json!(null)]],
        )
        .unwrap();
        let err = totals_from_table(&table).unwrap_err();
        assert!(matches!(err, BoardError::InvalidValue { row: 0, .. }));
    }

    #[test]
    fn test_table_deserialize_checks_arity() {
        let ok: Table =
            serde_json::from_value(json!({"columns": ["player_id", "adp"], "rows": [["1", 3.2]]}))
                .unwrap();
        assert_eq!(ok.len(), 1);

        let bad = serde_json::from_value::<Table>(json!({"columns": ["player_id"], "rows": [[]]}));
        assert!(bad.is_err());
    }
}
