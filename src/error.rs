//! Unified error types for the application.

use std::fmt;
use std::path::PathBuf;

/// Application-specific errors.
#[derive(Debug)]
pub enum AppError {
    /// Error reading or decoding an image file
    ImageLoad(String),
    /// Error encoding or writing an exported PNG
    ImageExport { path: PathBuf, message: String },
    /// Error reading or writing the preference store
    Preferences(String),
    /// Error handing a file to the system viewer
    Launch(String),
}

impl AppError {
    /// File name shown to the user for export failures.
    pub fn export_file_name(&self) -> Option<String> {
        match self {
            AppError::ImageExport { path, .. } => Some(
                path.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string()),
            ),
            _ => None,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ImageLoad(msg) => write!(f, "Failed to load image: {}", msg),
            AppError::ImageExport { path, message } => {
                write!(f, "Could not save {}: {}", path.display(), message)
            }
            AppError::Preferences(msg) => write!(f, "Preferences error: {}", msg),
            AppError::Launch(msg) => write!(f, "Failed to open viewer: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::ImageLoad(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Preferences(err.to_string())
    }
}

/// Type alias for Results in this application.
pub type Result<T> = std::result::Result<T, AppError>;
