//! Shared primitive types used across the desk.

use serde::{Deserialize, Serialize};

/// A marketer's name. Exact, case-sensitive; it is both the login key
/// and the owner tag on every customer record.
pub type MarketerName = String;

/// Date format used for the `Next Meeting` column.
pub const MEETING_DATE_FORMAT: &str = "%Y-%m-%d";

/// Content type attached to every export.
pub const EXPORT_MIME_TYPE: &str = "application/vnd.ms-excel";

/// Which backend holds the customer ledger.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LedgerBackend {
    #[default]
    Tabular,
    Sqlite,
}
