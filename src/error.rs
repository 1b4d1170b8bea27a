use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfSplitterError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Input file not found: {path}")]
    MissingInput { path: String },

    #[error("No document codec available: {reason}")]
    CodecUnavailable { reason: String },

    #[error("Output directory error: {reason}")]
    OutputDirectory { reason: String },

    #[error("Failed to read document: {reason}")]
    CodecRead { reason: String },

    #[error("Failed to write document: {reason}")]
    CodecWrite { reason: String },

    #[error("Split configuration error: {reason}")]
    SplitConfig { reason: String },

    #[error("Output layout error: {reason}")]
    OutputLayout { reason: String },

    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PdfSplitterError>;
