//! Built-in table jobs for the legacy pawn ledger.

use chrono::NaiveDate;
use mirror_engine::TableSpec;

/// Columns kept when inserting new billing rows.
///
/// `refer` carries the phone number in the legacy schema.
pub const BILLING_WHITELIST: [&str; 17] = [
    "serial", "nos", "date", "code", "name", "fhtitle", "fhname", "add1", "add2", "area", "loan",
    "items", "status", "redate", "des", "refer", "intrate",
];

/// Keep only rows whose date column is on or after a floor date.
#[derive(Debug, Clone)]
pub struct DateFloor {
    /// Column holding the row date
    pub column: String,
    /// Earliest date synced, inclusive
    pub floor: NaiveDate,
}

/// One table's sync job: the engine spec plus runner-side row filtering.
#[derive(Debug, Clone)]
pub struct TableJob {
    pub spec: TableSpec,
    pub date_floor: Option<DateFloor>,
}

/// The fixed job sequence for one run.
///
/// `billing` detects changes on `status` and `redate` (both gate the update
/// and ride in its payload) and skips rows older than the floor.
/// `customermaster` is insert-only: no status columns, no whitelist.
pub fn default_jobs(since: NaiveDate) -> Vec<TableJob> {
    vec![
        TableJob {
            spec: TableSpec::new("billing", ["serial", "nos"])
                .with_status_columns(["status", "redate"])
                .with_whitelist(BILLING_WHITELIST),
            date_floor: Some(DateFloor {
                column: "date".to_string(),
                floor: since,
            }),
        },
        TableJob {
            spec: TableSpec::new("customermaster", ["code"]),
            date_floor: None,
        },
    ]
}
