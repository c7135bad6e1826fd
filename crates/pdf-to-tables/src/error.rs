use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to load PDF: {0}")]
    PdfLoad(#[from] lopdf::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("document contains no pages")]
    NoPages,
}
