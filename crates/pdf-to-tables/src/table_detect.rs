use crate::model::{PageText, RawTable};
use crate::table_parse::{modal_width, soft_split_line_into_cells, split_line_into_cells};

pub(crate) const LOW_CONFIDENCE_THRESHOLD: f32 = 0.60;

/// Structural confidence of a candidate table: how many rows share the modal
/// width, tempered by the spread between the widest and narrowest row.
fn structure_confidence(rows: &[Vec<String>]) -> f32 {
    if rows.len() < 2 {
        return 0.0;
    }

    let modal = modal_width(rows);
    if modal == 0 {
        return 0.0;
    }

    let consistent = rows.iter().filter(|row| row.len() == modal).count() as f32 / rows.len() as f32;
    let widest = rows.iter().map(Vec::len).max().unwrap_or(modal);
    let narrowest = rows.iter().map(Vec::len).min().unwrap_or(modal);
    let spread = if widest == 0 {
        0.0
    } else {
        1.0 - ((widest - narrowest) as f32 / widest as f32)
    };

    (consistent * 0.75 + spread * 0.25).clamp(0.0, 1.0)
}

/// Interpret one line as table cells, or `None` when it reads as prose.
fn line_as_row(line: &str, min_cols: usize) -> Option<Vec<String>> {
    let cells = split_line_into_cells(line);
    if cells.len() >= min_cols {
        return Some(cells);
    }

    // Single-space layouts: accept the relaxed split unless the line looks
    // like a sentence, and only for short or number-bearing lines.
    let soft = soft_split_line_into_cells(line);
    if soft.len() < min_cols {
        return None;
    }
    let ends_like_sentence = ['.', '!', '?']
        .iter()
        .any(|punctuation| line.trim_end().ends_with(*punctuation));
    let has_digit = soft
        .iter()
        .any(|cell| cell.chars().any(|ch| ch.is_ascii_digit()));
    if !ends_like_sentence && (has_digit || soft.len() <= 6) {
        return Some(soft);
    }
    None
}

fn detect_in_page(page: &PageText, min_cols: usize) -> Vec<RawTable> {
    let mut tables = Vec::new();
    let mut run: Vec<Vec<String>> = Vec::new();

    let mut flush = |run: &mut Vec<Vec<String>>, tables: &mut Vec<RawTable>| {
        // A lone multi-cell line is not a table.
        if run.len() >= 2 {
            let confidence = structure_confidence(run);
            tables.push(RawTable {
                page: page.page_number,
                rows: std::mem::take(run),
                confidence,
            });
        } else {
            run.clear();
        }
    };

    for line in page.text.lines() {
        if let Some(cells) = line_as_row(line, min_cols) {
            run.push(cells);
        } else {
            flush(&mut run, &mut tables);
        }
    }
    flush(&mut run, &mut tables);

    tables
}

/// Detect raw tables on every page, in document order and within-page
/// top-to-bottom order. No re-sorting happens anywhere downstream.
pub(crate) fn detect_tables(pages: &[PageText], min_cols: usize) -> Vec<RawTable> {
    pages
        .iter()
        .flat_map(|page| detect_in_page(page, min_cols.max(2)))
        .collect()
}
