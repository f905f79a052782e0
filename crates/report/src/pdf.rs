//! PDF handling.
//!
//! Text extraction is delegated to a [`PdfTextExtractor`]. Bytes are checked
//! for the PDF signature before the extractor ever sees them.

use medfocus_common::error::{MedfocusError, MedfocusResult};

/// Only accepted upload type.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Every PDF file starts with this marker.
pub const PDF_SIGNATURE: &[u8] = b"%PDF-";

/// Extracts plain text from PDF bytes.
pub trait PdfTextExtractor: Send + Sync {
    /// Returns the document text, or an [`MedfocusError::InvalidPdf`] error
    /// when the bytes cannot be parsed as a PDF.
    fn extract_text(&self, bytes: &[u8]) -> MedfocusResult<String>;
}

/// Reject bytes that do not carry the PDF signature.
pub fn check_signature(bytes: &[u8]) -> MedfocusResult<()> {
    if bytes.starts_with(PDF_SIGNATURE) {
        Ok(())
    } else {
        Err(MedfocusError::invalid_pdf("missing %PDF- signature"))
    }
}

/// Check the signature, then run the extractor.
pub fn extract_report_text(extractor: &dyn PdfTextExtractor, bytes: &[u8]) -> MedfocusResult<String> {
    check_signature(bytes)?;
    let text = extractor.extract_text(bytes)?;
    tracing::debug!(bytes = bytes.len(), chars = text.chars().count(), "Extracted PDF text");
    Ok(text)
}
