//! Error types shared across MedFocus crates.

use std::path::PathBuf;

/// Generic message shown to users when an external service fails.
pub const GENERIC_FAILURE_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// Top-level error type for MedFocus operations.
#[derive(Debug, thiserror::Error)]
pub enum MedfocusError {
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("External service error: {message}")]
    ExternalService { message: String },

    #[error("Invalid PDF: {message}")]
    InvalidPdf { message: String },

    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error("Session error: {message}")]
    Session { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using MedfocusError.
pub type MedfocusResult<T> = Result<T, MedfocusError>;

impl MedfocusError {
    pub fn validation(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: msg.into(),
        }
    }

    pub fn external(msg: impl Into<String>) -> Self {
        Self::ExternalService {
            message: msg.into(),
        }
    }

    pub fn invalid_pdf(msg: impl Into<String>) -> Self {
        Self::InvalidPdf {
            message: msg.into(),
        }
    }

    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }

    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session {
            message: msg.into(),
        }
    }

    /// Whether the error belongs to the input-validation class.
    ///
    /// Validation errors are reported next to the offending field and are
    /// never fatal.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Message suitable for display to an end user.
    ///
    /// Validation and permission problems keep their specific wording; every
    /// other failure collapses to a generic message so service internals
    /// never leak to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message, .. } => message.clone(),
            Self::InvalidPdf { .. } => {
                "The uploaded file does not appear to be a valid PDF.".to_string()
            }
            Self::PermissionDenied { message } | Self::Unsupported { message } => message.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}
