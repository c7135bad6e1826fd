use serde::{Deserialize, Serialize};

use crate::warning::ExtractWarning;

/// Text content of a single PDF page, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub page_number: u32,
    pub text: String,
}

/// A grid of cell strings as detected on a page, before any normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub page: u32,
    pub rows: Vec<Vec<String>>,
    pub confidence: f32,
}

/// A detected table with its header row promoted to column labels and fully
/// empty rows removed. Every data row has exactly `columns.len()` cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedTable {
    /// 1-based page number.
    pub page: u32,
    /// 1-based index within the page, in detection order.
    pub table_index: u32,
    /// Column labels from the header row. Not guaranteed unique.
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl NormalizedTable {
    /// Human-readable selector label for this table.
    #[must_use]
    pub fn label(&self) -> String {
        format!("Page {} - Table {}", self.page, self.table_index)
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Everything extracted from one document: the tables in document order and
/// any non-fatal findings collected along the way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSet {
    pub tables: Vec<NormalizedTable>,
    pub warnings: Vec<ExtractWarning>,
}

impl TableSet {
    #[must_use]
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Look up a table by its 1-based page number and within-page index.
    #[must_use]
    pub fn find(&self, page: u32, table_index: u32) -> Option<&NormalizedTable> {
        self.tables
            .iter()
            .find(|table| table.page == page && table.table_index == table_index)
    }
}
