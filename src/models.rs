use pdf_to_tables::{CellValue, ExtractWarning, NormalizedTable, TableSet};
use serde::{Deserialize, Serialize};

pub const TABLES_CACHE_KEY_PREFIX: &str = "tables:v1:";
pub const TABLES_CACHE_TTL_SECONDS: u32 = 24 * 60 * 60;

#[must_use]
pub fn tables_cache_key(digest: &str) -> String {
    format!("{TABLES_CACHE_KEY_PREFIX}{digest}")
}

/// One entry of the table selector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableSummary {
    pub page: u32,
    pub table_index: u32,
    pub label: String,
    pub column_count: usize,
    pub row_count: usize,
}

impl TableSummary {
    #[must_use]
    pub fn from_table(table: &NormalizedTable) -> Self {
        Self {
            page: table.page,
            table_index: table.table_index,
            label: table.label(),
            column_count: table.column_count(),
            row_count: table.row_count(),
        }
    }
}

#[must_use]
pub fn table_summaries(set: &TableSet) -> Vec<TableSummary> {
    set.tables.iter().map(TableSummary::from_table).collect()
}

/// Response to an uploaded document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadResponse {
    pub digest: String,
    pub table_count: usize,
    pub items: Vec<TableSummary>,
    pub warnings: Vec<ExtractWarning>,
    pub cached: bool,
}

/// The selected table, in its derived (possibly coerced) form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableDetailResponse {
    pub label: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    pub numeric_columns: Vec<usize>,
    pub coerced: bool,
    /// Set when visualization is unavailable for this table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_warning: Option<ExtractWarning>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}
