use std::path::PathBuf;
use thiserror::Error;

pub type ExtractResult<T> = Result<T, ExtractError>;

/// Whole-operation failures.
///
/// Per-cell resolution problems and numeric domain problems never surface here;
/// they are carried as [`crate::types::CellValue::Missing`] instead.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Cannot open source workbook {path}: {reason}")]
    SourceUnavailable { path: PathBuf, reason: String },

    #[error("Unsupported workbook format: {0} (expected .xls or .xlsx)")]
    UnsupportedFormat(PathBuf),

    #[error("Worksheet '{sheet}' not found in {path}")]
    SheetNotFound { sheet: String, path: PathBuf },

    #[error("Failed to save {path}: {reason}")]
    Persistence { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExtractError {
    pub(crate) fn source_unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ExtractError::SourceUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn persistence(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ExtractError::Persistence {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
