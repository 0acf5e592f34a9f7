//! ADP (average draft position) enrichment.
//!
//! ADP feeds name their columns however they like ("ADP", "avg_adp",
//! "AverageDraftPosition", "stdev"...). Resolution picks one ADP column and
//! one spread column by name; a feed without either still joins, it just
//! contributes nothing.

use crate::error::Result;
use crate::models::{AdpRecord, BoardRow, VorRecord};
use crate::table::{self, Table, PLAYER_ID};
use std::collections::HashMap;
use tracing::{debug, warn};

pub const ADP: &str = "adp";
pub const ADP_STDEV: &str = "adp_stdev";

const STDEV_MARKERS: [&str; 3] = ["stdev", "std", "dev"];

/// Which source columns were picked for `adp` and `adp_stdev`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdpColumns {
    pub adp: Option<String>,
    pub adp_stdev: Option<String>,
}

/// Resolve the ADP and spread columns of an ADP table header.
///
/// ADP: a column literally named `adp`, else the first whose lowercased name
/// contains "adp" and is not `adp_stdev`. Spread: a column literally named
/// `adp_stdev`, else the first whose lowercased name contains "stdev", "std"
/// or "dev". The player id column and the chosen ADP column never count as
/// the spread column.
pub fn resolve_columns(columns: &[String]) -> AdpColumns {
    let adp = columns.iter().find(|c| c.as_str() == ADP).or_else(|| {
        columns.iter().find(|c| {
            let lower = c.to_lowercase();
            lower.contains(ADP) && lower != ADP_STDEV && c.as_str() != PLAYER_ID
        })
    });

    let adp_stdev = columns.iter().find(|c| c.as_str() == ADP_STDEV).or_else(|| {
        columns.iter().find(|c| {
            let lower = c.to_lowercase();
            Some(*c) != adp
                && c.as_str() != PLAYER_ID
                && STDEV_MARKERS.iter().any(|m| lower.contains(m))
        })
    });

    AdpColumns { adp: adp.cloned(), adp_stdev: adp_stdev.cloned() }
}

/// Project an ADP table down to (player_id, adp, adp_stdev) records.
///
/// `player_id` is required. Missing ADP or spread columns leave the values
/// undefined. Rows without a usable player id are dropped; they could never
/// match a board row.
pub fn resolve_adp(adp_table: &Table) -> Result<(AdpColumns, Vec<AdpRecord>)> {
    let id_col = adp_table.require_column("adp", PLAYER_ID)?;
    let columns = resolve_columns(adp_table.columns());

    match &columns.adp {
        Some(name) if name != ADP => debug!("Using '{}' as adp column", name),
        Some(_) => {}
        None => warn!("ADP table has no adp-like column, values left undefined"),
    }

    let adp_col = columns.adp.as_deref().and_then(|c| adp_table.column_index(c));
    let stdev_col = columns.adp_stdev.as_deref().and_then(|c| adp_table.column_index(c));

    let records = adp_table
        .rows()
        .filter_map(|row| {
            let player_id = table::identifier(&row[id_col])?;
            Some(AdpRecord {
                player_id,
                adp: adp_col.and_then(|c| table::numeric(&row[c])),
                adp_stdev: stdev_col.and_then(|c| table::numeric(&row[c])),
            })
        })
        .collect();

    Ok((columns, records))
}

/// Left-join ADP onto VOR rows by player id and compute value vs ADP.
///
/// Never adds or drops rows. If a player id repeats in the ADP records the
/// first occurrence is used.
pub fn attach_adp(records: Vec<VorRecord>, adp: &[AdpRecord]) -> Vec<BoardRow> {
    let mut by_player: HashMap<&str, &AdpRecord> = HashMap::with_capacity(adp.len());
    let mut duplicates = 0usize;
    for entry in adp {
        if by_player.contains_key(entry.player_id.as_str()) {
            duplicates += 1;
        } else {
            by_player.insert(entry.player_id.as_str(), entry);
        }
    }
    if duplicates > 0 {
        warn!("Ignored {} duplicate player ids in ADP data", duplicates);
    }

    records
        .into_iter()
        .map(|record| {
            let found = by_player.get(record.player_id.as_str());
            let adp = found.and_then(|a| a.adp);
            let adp_stdev = found.and_then(|a| a.adp_stdev);
            let value_vs_adp = value_vs_adp(record.vor, adp);
            BoardRow { record, adp, adp_stdev, value_vs_adp }
        })
        .collect()
}

/// Rows with no ADP data at all
pub fn without_adp(records: Vec<VorRecord>) -> Vec<BoardRow> {
    records
        .into_iter()
        .map(|record| BoardRow { record, adp: None, adp_stdev: None, value_vs_adp: None })
        .collect()
}

/// vor / adp, undefined unless both exist and adp is nonzero
pub fn value_vs_adp(vor: Option<f64>, adp: Option<f64>) -> Option<f64> {
    match (vor, adp) {
        (Some(v), Some(a)) if a != 0.0 => Some(v / a),
        _ => None,
    }
}

/// Resolve an ADP table and join it onto VOR rows
pub fn merge_adp_table(records: Vec<VorRecord>, adp_table: &Table) -> Result<Vec<BoardRow>> {
    let (_, adp) = resolve_adp(adp_table)?;
    Ok(attach_adp(records, &adp))
}
