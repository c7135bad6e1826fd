//! Best-effort conversion of formatted numeric text into numbers.
//!
//! The pipeline is two explicit phases: detect columns that are already
//! numeric as-is; only when none exist, coerce every column uniformly by
//! stripping thousands separators and dollar signs. Coercion produces a new
//! derived table, leaving the normalized table untouched.

use serde::{Deserialize, Serialize};

use crate::model::NormalizedTable;
use crate::warning::{ExtractWarning, WarningCode};

/// One cell of the derived table.
///
/// A `Text` cell counts as a missing value for numeric purposes but keeps
/// its original content for display and category labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Blank,
}

impl CellValue {
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(_) | Self::Blank => None,
        }
    }

    /// The cell as the user sees it in the grid, CSV, and chart labels.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Number(value) => format_number(*value),
            Self::Text(text) => text.clone(),
            Self::Blank => String::new(),
        }
    }
}

/// Render a number the way a cleaned-up table cell should read: integral
/// values without a trailing `.0`.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

fn parse_native(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

fn parse_stripped(cell: &str) -> Option<f64> {
    let stripped = cell
        .chars()
        .filter(|ch| !matches!(ch, ',' | '$'))
        .collect::<String>();
    parse_native(&stripped)
}

fn is_blank(cell: &str) -> bool {
    cell.trim().is_empty()
}

/// A column is natively numeric when it has at least one non-blank cell and
/// every non-blank cell parses unmodified.
fn native_numeric_columns(table: &NormalizedTable) -> Vec<usize> {
    (0..table.column_count())
        .filter(|&col| {
            let mut any = false;
            for row in &table.rows {
                let cell = &row[col];
                if is_blank(cell) {
                    continue;
                }
                if parse_native(cell).is_none() {
                    return false;
                }
                any = true;
            }
            any
        })
        .collect()
}

/// The normalized table with numeric values materialized, ready for the
/// grid, CSV export, and charting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    /// Whether the fallback coercion pass ran.
    pub coerced: bool,
}

impl ChartTable {
    #[must_use]
    pub fn from_normalized(table: &NormalizedTable) -> Self {
        let native = native_numeric_columns(table);

        if native.is_empty() {
            let rows = table
                .rows
                .iter()
                .map(|row| row.iter().map(|cell| coerce_cell(cell)).collect())
                .collect();
            return Self {
                columns: table.columns.clone(),
                rows,
                coerced: true,
            };
        }

        let rows = table
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(col, cell)| {
                        if is_blank(cell) {
                            CellValue::Blank
                        } else if native.contains(&col) {
                            // native_numeric_columns guarantees this parses
                            parse_native(cell).map_or(CellValue::Blank, CellValue::Number)
                        } else {
                            CellValue::Text(cell.trim().to_string())
                        }
                    })
                    .collect()
            })
            .collect();

        Self {
            columns: table.columns.clone(),
            rows,
            coerced: false,
        }
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Columns usable as a chart's Y axis. A column qualifies as soon as it
    /// holds one numeric cell; unparseable cells are merely missing values.
    #[must_use]
    pub fn numeric_columns(&self) -> Vec<usize> {
        (0..self.column_count())
            .filter(|&col| {
                self.rows
                    .iter()
                    .any(|row| matches!(row[col], CellValue::Number(_)))
            })
            .collect()
    }
}

fn coerce_cell(cell: &str) -> CellValue {
    if is_blank(cell) {
        return CellValue::Blank;
    }
    match parse_stripped(cell) {
        Some(value) => CellValue::Number(value),
        None => CellValue::Text(cell.trim().to_string()),
    }
}

/// Why visualization is unavailable for this table, if it is.
#[must_use]
pub fn chart_availability(table: &ChartTable) -> Option<ExtractWarning> {
    if table.column_count() < 2 {
        return Some(ExtractWarning::new(
            WarningCode::TooFewColumns,
            "table must have at least 2 columns for visualization",
        ));
    }
    if table.numeric_columns().is_empty() {
        return Some(ExtractWarning::new(
            WarningCode::NoNumericColumns,
            "no numeric data found for visualization",
        ));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{CellValue, ChartTable, chart_availability, format_number};
    use crate::model::NormalizedTable;
    use crate::warning::WarningCode;

    fn table(columns: &[&str], rows: &[&[&str]]) -> NormalizedTable {
        NormalizedTable {
            page: 1,
            table_index: 1,
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|c| (*c).to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn currency_cells_coerce_and_join_the_numeric_set() {
        let derived = ChartTable::from_normalized(&table(
            &["Item", "Cost"],
            &[&["Widget", "$1,200"], &["Gadget", "$950"], &["Sprocket", "N/A"]],
        ));

        assert!(derived.coerced);
        assert_eq!(derived.rows[0][1], CellValue::Number(1200.0));
        assert_eq!(derived.rows[1][1], CellValue::Number(950.0));
        assert_eq!(derived.rows[2][1].as_number(), None);
        assert_eq!(derived.numeric_columns(), vec![1]);
    }

    #[test]
    fn unparseable_cells_keep_their_text_for_labels() {
        let derived = ChartTable::from_normalized(&table(
            &["Item", "Cost"],
            &[&["Widget", "$1,200"], &["Gadget", "$950"]],
        ));
        assert_eq!(derived.rows[0][0], CellValue::Text("Widget".to_string()));
        assert_eq!(derived.rows[0][0].display(), "Widget");
    }

    #[test]
    fn native_numeric_columns_skip_the_coercion_pass() {
        let derived = ChartTable::from_normalized(&table(
            &["City", "Pop"],
            &[&["Paris", "2100000"], &["Oslo", "700000"]],
        ));

        assert!(!derived.coerced);
        assert_eq!(derived.rows[0][0], CellValue::Text("Paris".to_string()));
        assert_eq!(derived.numeric_columns(), vec![1]);
    }

    #[test]
    fn comma_formatted_cells_are_not_native() {
        let derived = ChartTable::from_normalized(&table(
            &["City", "Pop"],
            &[&["Paris", "2,100,000"], &["Oslo", "700,000"]],
        ));
        // No native column, so the fallback pass runs over every column.
        assert!(derived.coerced);
        assert_eq!(derived.rows[0][1], CellValue::Number(2_100_000.0));
    }

    #[test]
    fn blank_cells_stay_missing_in_native_columns() {
        let derived = ChartTable::from_normalized(&table(
            &["City", "Pop"],
            &[&["Paris", "2100000"], &["Oslo", ""]],
        ));
        assert!(!derived.coerced);
        assert_eq!(derived.rows[1][1], CellValue::Blank);
        assert_eq!(derived.numeric_columns(), vec![1]);
    }

    #[test]
    fn single_column_table_is_not_chartable() {
        let derived = ChartTable::from_normalized(&table(&["Only"], &[&["1"], &["2"]]));
        let warning = chart_availability(&derived).expect("warning expected");
        assert_eq!(warning.code, WarningCode::TooFewColumns);
    }

    #[test]
    fn all_text_table_warns_about_numeric_data() {
        let derived = ChartTable::from_normalized(&table(
            &["A", "B"],
            &[&["x", "y"], &["z", "w"]],
        ));
        let warning = chart_availability(&derived).expect("warning expected");
        assert_eq!(warning.code, WarningCode::NoNumericColumns);
    }

    #[test]
    fn chartable_table_has_no_availability_warning() {
        let derived = ChartTable::from_normalized(&table(
            &["Item", "Cost"],
            &[&["Widget", "$1,200"]],
        ));
        assert!(chart_availability(&derived).is_none());
    }

    #[test]
    fn numbers_render_without_trailing_fraction() {
        assert_eq!(format_number(1200.0), "1200");
        assert_eq!(format_number(1.5), "1.5");
    }
}
