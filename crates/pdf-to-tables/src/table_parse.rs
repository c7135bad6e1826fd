/// Split a line into cells on hard separators: tabs, or runs of two or more
/// spaces. Single spaces stay inside a cell.
pub(crate) fn split_line_into_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    trimmed
        .split('\t')
        .flat_map(|fragment| fragment.split("  "))
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect()
}

/// Relaxed split on any whitespace, for lines whose columns are separated by
/// single spaces only.
pub(crate) fn soft_split_line_into_cells(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

/// The most common row width, ties broken toward the wider value.
pub(crate) fn modal_width(rows: &[Vec<String>]) -> usize {
    let mut freq: std::collections::HashMap<usize, usize> = std::collections::HashMap::new();
    for row in rows {
        *freq.entry(row.len()).or_insert(0) += 1;
    }

    freq.into_iter()
        .max_by_key(|(width, count)| (*count, *width))
        .map_or(0, |(width, _)| width)
}
