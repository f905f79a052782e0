//! MedFocus Report Simplification
//!
//! Turns a medical report into a patient-friendly summary:
//! - **Intake:** Validation of pasted text, uploaded PDFs, and target language
//! - **PDF:** Signature check and the text-extraction seam
//! - **Services:** Async seams for the hosted summarization, translation,
//!   jargon simplification, and speech models
//! - **Simplifier:** Single-attempt orchestration with user-facing error mapping
//!
//! The language models, speech synthesis, and PDF parsing are external
//! collaborators; this crate only defines how they are called.

pub mod intake;
pub mod pdf;
pub mod service;
pub mod simplifier;

pub use intake::*;
pub use pdf::{PdfTextExtractor, PDF_MIME_TYPE};
pub use service::*;
pub use simplifier::*;
