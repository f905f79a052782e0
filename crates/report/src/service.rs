//! Seams for the hosted generative models.

use async_trait::async_trait;
use medfocus_common::error::MedfocusResult;
use serde::{Deserialize, Serialize};

use crate::intake::Language;

/// Patient-friendly summary returned by the language model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub text: String,
}

/// Report translated into the target language and simplified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedSummary {
    pub text: String,
    pub language: Language,
}

/// Medical text with the jargon replaced by plain language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifiedText {
    pub text: String,
}

/// Synthesized speech for a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechAudio {
    /// e.g. `audio/wav`
    pub mime_type: String,
    #[serde(skip)]
    pub data: Vec<u8>,
}

impl SpeechAudio {
    /// File extension matching the MIME type, for saving to disk.
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "audio/wav" | "audio/x-wav" | "audio/wave" => "wav",
            "audio/mpeg" | "audio/mp3" => "mp3",
            "audio/ogg" => "ogg",
            _ => "bin",
        }
    }
}

/// Hosted summarization model.
///
/// Implementations translate first when `language` is not English, then
/// simplify. They are called once per request; there is no retry.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, report_text: &str, language: Language) -> MedfocusResult<Summary>;

    /// Service name for logging.
    fn name(&self) -> &str;
}

/// Hosted translation model. Translates the whole report and simplifies
/// it in one call.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        report_text: &str,
        language: Language,
    ) -> MedfocusResult<TranslatedSummary>;

    fn name(&self) -> &str;
}

/// Hosted jargon simplifier. Keeps every detail of the text and only
/// rewrites medical terms in plain language.
#[async_trait]
pub trait JargonSimplifier: Send + Sync {
    async fn simplify_jargon(&self, text: &str) -> MedfocusResult<SimplifiedText>;

    fn name(&self) -> &str;
}

/// Hosted text-to-speech model.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> MedfocusResult<SpeechAudio>;

    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_extension_follows_mime_type() {
        let audio = SpeechAudio {
            mime_type: "audio/wav".into(),
            data: vec![0; 4],
        };
        assert_eq!(audio.extension(), "wav");

        let unknown = SpeechAudio {
            mime_type: "application/octet-stream".into(),
            data: Vec::new(),
        };
        assert_eq!(unknown.extension(), "bin");
    }
}
