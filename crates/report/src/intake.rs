//! Report intake validation.

use std::fmt;
use std::str::FromStr;

use medfocus_common::error::MedfocusError;
use serde::{Deserialize, Serialize};

use crate::pdf::PDF_MIME_TYPE;

/// Longest report text accepted, in characters.
pub const MAX_REPORT_CHARS: usize = 50_000;

/// Shortest non-empty report text accepted, in characters.
pub const MIN_REPORT_CHARS: usize = 50;

/// Largest uploaded file accepted (4 MiB).
pub const MAX_FILE_BYTES: usize = 4 * 1024 * 1024;

/// Target language of the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
    Tr,
}

impl Language {
    /// ISO 639-1 code.
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
            Self::Tr => "tr",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Es => "Spanish",
            Self::Tr => "Turkish",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = MedfocusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "es" => Ok(Self::Es),
            "tr" => Ok(Self::Tr),
            other => Err(MedfocusError::validation(
                "language",
                format!("Unsupported language '{other}'. Choose en, es, or tr."),
            )),
        }
    }
}

/// A file attached to the intake form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// One rejected form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl From<FieldError> for MedfocusError {
    fn from(e: FieldError) -> Self {
        MedfocusError::validation(e.field, e.message)
    }
}

/// Contents of the report intake form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportInput {
    pub report_text: Option<String>,
    pub file: Option<UploadedFile>,
    pub language: Language,
}

impl ReportInput {
    pub fn from_text(text: impl Into<String>, language: Language) -> Self {
        Self {
            report_text: Some(text.into()),
            file: None,
            language,
        }
    }

    pub fn from_file(file: UploadedFile, language: Language) -> Self {
        Self {
            report_text: None,
            file: Some(file),
            language,
        }
    }

    /// Pasted text, if any was entered.
    pub fn text(&self) -> Option<&str> {
        self.report_text.as_deref().filter(|t| !t.is_empty())
    }

    /// Check every field. All problems are reported, each against the
    /// field it belongs to.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if let Some(text) = self.text() {
            let chars = text.chars().count();
            if chars > MAX_REPORT_CHARS {
                errors.push(FieldError {
                    field: "report_text",
                    message: "Report is too long. Please keep it under 50,000 characters.",
                });
            } else if chars < MIN_REPORT_CHARS {
                errors.push(FieldError {
                    field: "report_text",
                    message: "Please enter at least 50 characters.",
                });
            }
        }

        if let Some(file) = &self.file {
            if file.size() > MAX_FILE_BYTES {
                errors.push(FieldError {
                    field: "file",
                    message: "Max file size is 4MB.",
                });
            }
            if file.mime_type != PDF_MIME_TYPE {
                errors.push(FieldError {
                    field: "file",
                    message: "Only .pdf files are accepted.",
                });
            }
        }

        if self.text().is_none() && self.file.is_none() {
            errors.push(FieldError {
                field: "report_text",
                message: "Please provide either text or a file.",
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
