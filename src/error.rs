use thiserror::Error;

use crate::exhibit::PanelKey;

pub type Result<T> = std::result::Result<T, ExhibitError>;

/// Every failure the library can surface.
///
/// Configuration and insufficient-data errors are reported immediately by the
/// call that detects them; nothing is retried and no panel or exhibit is left
/// half-updated.
#[derive(Debug, Error)]
pub enum ExhibitError {
    #[error("panel `{0}` already exists; choose a different key")]
    DuplicatePanel(PanelKey),

    #[error("panel `{0}` is not registered")]
    UnknownPanel(PanelKey),

    #[error("unrecognized frequency: {0}")]
    UnrecognizedFrequency(String),

    #[error("{axis} weights: expected {expected} entries, got {got}")]
    WeightCountMismatch {
        axis: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{axis} weights must be finite and positive")]
    InvalidWeights { axis: &'static str },

    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    #[error("invalid stack layout: {0}")]
    InvalidStack(String),

    #[error("zero-width axis range [{min}, {max}]")]
    ZeroWidthRange { min: f64, max: f64 },

    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("invalid date `{0}`: expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unsupported export format `{0}` (use svg, png, jpg, jpeg or bmp)")]
    UnsupportedFormat(String),

    #[error("font error: {0}")]
    Font(String),

    #[error("render error: {0}")]
    Render(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
