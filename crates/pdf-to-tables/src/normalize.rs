use crate::model::{NormalizedTable, RawTable};
use crate::warning::{ExtractWarning, WarningCode};

fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

fn parses_as_number(cell: &str) -> bool {
    cell.trim().replace(',', "").parse::<f64>().is_ok()
}

fn numeric_ratio(row: &[String]) -> f32 {
    if row.is_empty() {
        return 0.0;
    }
    let numeric = row.iter().filter(|cell| parses_as_number(cell)).count();
    numeric as f32 / row.len() as f32
}

/// Promote each raw table's first row to column labels, drop rows that are
/// empty across all columns, and skip tables left with no data rows.
///
/// Table indices are 1-based within each page and count every raw table in
/// detection order, so a skipped table leaves a gap rather than renumbering
/// its successors.
pub(crate) fn normalize_tables(
    raw_tables: &[RawTable],
    warnings: &mut Vec<ExtractWarning>,
) -> Vec<NormalizedTable> {
    let mut out = Vec::new();
    let mut current_page = 0_u32;
    let mut index_on_page = 0_u32;

    for raw in raw_tables {
        if raw.page != current_page {
            current_page = raw.page;
            index_on_page = 0;
        }
        index_on_page += 1;

        let Some((header, data)) = raw.rows.split_first() else {
            continue;
        };

        let columns = header.iter().map(|cell| cell.trim().to_string()).collect::<Vec<_>>();
        let width = columns.len();

        let rows = data
            .iter()
            .filter(|row| !is_blank_row(row))
            .map(|row| {
                let mut resized = row.clone();
                resized.resize(width, String::new());
                resized
            })
            .collect::<Vec<_>>();

        if rows.is_empty() {
            continue;
        }

        if numeric_ratio(&columns) >= 0.6 {
            warnings.push(
                ExtractWarning::new(
                    WarningCode::HeaderLooksNumeric,
                    "header row is mostly numeric; column labels may be data",
                )
                .with_page(raw.page)
                .with_table_index(index_on_page),
            );
        }

        out.push(NormalizedTable {
            page: raw.page,
            table_index: index_on_page,
            columns,
            rows,
        });
    }

    out
}
