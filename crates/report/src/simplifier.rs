//! Report simplification orchestration.

use std::sync::Arc;

use medfocus_common::error::{MedfocusError, MedfocusResult};
use serde::{Deserialize, Serialize};

use crate::intake::{Language, ReportInput, MIN_REPORT_CHARS};
use crate::pdf::{extract_report_text, PdfTextExtractor};
use crate::service::{
    JargonSimplifier, SimplifiedText, SpeechAudio, SpeechSynthesizer, Summarizer,
    TranslatedSummary, Translator,
};

/// Outcome of a successful simplification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifiedReport {
    pub summary: String,
    pub language: Language,
    /// Present when speech was requested and synthesis succeeded.
    #[serde(skip)]
    pub audio: Option<SpeechAudio>,
}

/// Validates a report, extracts its text, and asks the hosted models for a
/// summary and optional speech. Translation and jargon simplification are
/// separate entry points backed by their own optional services.
pub struct ReportSimplifier {
    summarizer: Arc<dyn Summarizer>,
    speech: Option<Arc<dyn SpeechSynthesizer>>,
    translator: Option<Arc<dyn Translator>>,
    jargon: Option<Arc<dyn JargonSimplifier>>,
    pdf: Option<Arc<dyn PdfTextExtractor>>,
}

impl ReportSimplifier {
    pub fn new(summarizer: Arc<dyn Summarizer>) -> Self {
        Self {
            summarizer,
            speech: None,
            translator: None,
            jargon: None,
            pdf: None,
        }
    }

    pub fn with_speech(mut self, speech: Arc<dyn SpeechSynthesizer>) -> Self {
        self.speech = Some(speech);
        self
    }

    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    pub fn with_jargon_simplifier(mut self, jargon: Arc<dyn JargonSimplifier>) -> Self {
        self.jargon = Some(jargon);
        self
    }

    pub fn with_pdf_extractor(mut self, pdf: Arc<dyn PdfTextExtractor>) -> Self {
        self.pdf = Some(pdf);
        self
    }

    /// Resolve the text to summarize. An uploaded non-empty file takes
    /// precedence over pasted text.
    pub fn report_text(&self, input: &ReportInput) -> MedfocusResult<String> {
        let text = match input.file.as_ref().filter(|f| f.size() > 0) {
            Some(file) => {
                let extractor = self
                    .pdf
                    .as_deref()
                    .ok_or_else(|| MedfocusError::unsupported("PDF extraction is not available."))?;
                extract_report_text(extractor, &file.bytes).map_err(|e| {
                    tracing::error!(file = %file.name, error = %e, "PDF extraction failed");
                    e
                })?
            }
            None => input.report_text.clone().unwrap_or_default(),
        };

        if text.chars().count() < MIN_REPORT_CHARS {
            return Err(MedfocusError::validation(
                "report_text",
                "Report text must be at least 50 characters.",
            ));
        }
        Ok(text)
    }

    /// Run the whole flow once. Service failures are logged and returned;
    /// [`MedfocusError::user_message`] turns them into the generic message.
    pub async fn simplify(
        &self,
        input: &ReportInput,
        with_speech: bool,
    ) -> MedfocusResult<SimplifiedReport> {
        let text = self.checked_text(input)?;

        tracing::info!(
            service = %self.summarizer.name(),
            language = %input.language,
            chars = text.chars().count(),
            "Requesting report summary"
        );
        let summary = self
            .summarizer
            .summarize(&text, input.language)
            .await
            .map_err(|e| service_error(self.summarizer.name(), "Summarization failed", e))?;

        let audio = if with_speech {
            self.synthesize(&summary.text).await
        } else {
            None
        };

        Ok(SimplifiedReport {
            summary: summary.text,
            language: input.language,
            audio,
        })
    }

    /// Translate and simplify the report in one call to the translator.
    pub async fn translate(&self, input: &ReportInput) -> MedfocusResult<TranslatedSummary> {
        let translator = self
            .translator
            .as_deref()
            .ok_or_else(|| MedfocusError::unsupported("Translation is not available."))?;
        let text = self.checked_text(input)?;

        tracing::info!(
            service = %translator.name(),
            language = %input.language,
            chars = text.chars().count(),
            "Requesting report translation"
        );
        translator
            .translate(&text, input.language)
            .await
            .map_err(|e| service_error(translator.name(), "Translation failed", e))
    }

    /// Rewrite medical jargon in `text` as plain language.
    pub async fn simplify_jargon(&self, text: &str) -> MedfocusResult<SimplifiedText> {
        let jargon = self
            .jargon
            .as_deref()
            .ok_or_else(|| MedfocusError::unsupported("Jargon simplification is not available."))?;
        if text.trim().is_empty() {
            return Err(MedfocusError::validation("text", "Text to simplify is empty."));
        }

        tracing::info!(service = %jargon.name(), chars = text.chars().count(), "Requesting jargon simplification");
        jargon
            .simplify_jargon(text)
            .await
            .map_err(|e| service_error(jargon.name(), "Jargon simplification failed", e))
    }

    /// Validate the form, then resolve the report text.
    fn checked_text(&self, input: &ReportInput) -> MedfocusResult<String> {
        if let Err(errors) = input.validate() {
            for e in &errors {
                tracing::debug!(field = e.field, message = e.message, "Report input rejected");
            }
            // validate() never returns an empty list
            return Err(errors
                .into_iter()
                .next()
                .map(MedfocusError::from)
                .unwrap_or_else(|| MedfocusError::validation("report_text", "Invalid input.")));
        }
        self.report_text(input)
    }

    async fn synthesize(&self, text: &str) -> Option<SpeechAudio> {
        let Some(speech) = self.speech.as_ref() else {
            tracing::warn!("Speech requested but no synthesizer is configured");
            return None;
        };
        match speech.synthesize(text).await {
            Ok(audio) => Some(audio),
            Err(e) => {
                tracing::warn!(service = %speech.name(), error = %e, "Speech synthesis failed, returning text only");
                None
            }
        }
    }
}

/// Log a hosted-model failure and fold it into the external-service class.
fn service_error(service: &str, what: &str, e: MedfocusError) -> MedfocusError {
    tracing::error!(service, error = %e, "{what}");
    if matches!(e, MedfocusError::ExternalService { .. }) {
        e
    } else {
        MedfocusError::external(e.to_string())
    }
}
