use std::time::Duration;
use thiserror::Error;

/// Main error type for session-report
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Authentication required. Please run 'session-report auth login' first.")]
    NotAuthenticated,

    #[error("Rate limited. Please wait before retrying.")]
    RateLimited,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid date format: {0}. Expected YYYY-MM-DD")]
    InvalidDateFormat(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    View(#[from] ViewError),
}

pub type Result<T> = std::result::Result<T, ReportError>;

impl ReportError {
    /// Create a configuration error from a message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid response error from a message
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Create an invalid parameter error from a message
    pub fn invalid_param(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Whether the failure happened below HTTP (connection refused, reset, timeout)
    /// and the same request may succeed if sent again.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_connect() || e.is_timeout(),
            Self::Timeout(_) => true,
            _ => false,
        }
    }
}

/// Errors surfaced to the user through the view's error flag.
///
/// The messages are the ones a renderer shows verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("No file selected")]
    NoFileSelected,

    #[error("Unsupported file type, please upload a JSON file generated by our exporter")]
    UnsupportedFileType { file_name: String },

    #[error("Error reading JSON file")]
    UnreadableFile { reason: String },

    #[error("Failed to fetch athlete data. Please try again later.")]
    FetchFailed { reason: String },

    #[error("Failed to export session. Please try again later.")]
    ExportFailed { reason: String },
}

/// Render an error as a single line for terminal output.
///
/// View errors carry a short user message plus an internal reason; the reason is
/// appended so the CLI user sees what actually went wrong.
pub fn format_user_error(err: &ReportError) -> String {
    match err {
        ReportError::View(
            ViewError::UnreadableFile { reason }
            | ViewError::FetchFailed { reason }
            | ViewError::ExportFailed { reason },
        ) => format!("{err} ({reason})"),
        _ => err.to_string(),
    }
}
