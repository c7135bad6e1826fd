/// Knobs for table detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Minimum cells a line must split into to count as a table row.
    pub min_cols: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self { min_cols: 2 }
    }
}
