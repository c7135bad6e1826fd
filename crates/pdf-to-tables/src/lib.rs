//! Detect tables in text PDFs and prepare them for display and charting.
//!
//! The pipeline: read page text, detect contiguous cell-split line runs as
//! raw tables, promote header rows into column labels, then derive a
//! chart-ready table with best-effort numeric coercion.

mod coerce;
mod csv_out;
mod error;
mod model;
mod normalize;
mod options;
mod pdf_reader;
mod table_detect;
mod table_parse;
mod warning;

use tracing::debug;

use crate::table_detect::LOW_CONFIDENCE_THRESHOLD;

pub use crate::coerce::{CellValue, ChartTable, chart_availability, format_number};
pub use crate::csv_out::table_to_csv;
pub use crate::error::ExtractError;
pub use crate::model::{NormalizedTable, TableSet};
pub use crate::options::ExtractOptions;
pub use crate::warning::{ExtractWarning, WarningCode};

/// Extract every table from an in-memory PDF, in document order.
///
/// Raw tables whose normalized form has no data rows are skipped. Zero
/// detected tables is a successful, empty result with a warning attached;
/// an unreadable document is an error.
pub fn extract_tables(pdf: &[u8], options: &ExtractOptions) -> Result<TableSet, ExtractError> {
    if options.min_cols < 2 {
        return Err(ExtractError::InvalidOption(
            "min_cols must be at least 2".to_string(),
        ));
    }

    let pages = pdf_reader::read_pages(pdf)?;
    let raw_tables = table_detect::detect_tables(&pages, options.min_cols);

    let mut warnings = Vec::new();
    for raw in &raw_tables {
        if raw.confidence < LOW_CONFIDENCE_THRESHOLD {
            warnings.push(
                ExtractWarning::new(
                    WarningCode::LowConfidence,
                    "table structure is irregular; cells may be misaligned",
                )
                .with_page(raw.page)
                .with_confidence(raw.confidence),
            );
        }
    }

    let tables = normalize::normalize_tables(&raw_tables, &mut warnings);
    if tables.is_empty() {
        warnings.push(ExtractWarning::new(
            WarningCode::NoTablesDetected,
            "no tables were detected in the document",
        ));
    }

    debug!(
        pages = pages.len(),
        tables = tables.len(),
        warnings = warnings.len(),
        "extraction finished"
    );

    Ok(TableSet { tables, warnings })
}
