/*!
 * Remote collaborators consumed by the engine.
 *
 * Each collaborator is a small async trait so the services can be driven by
 * the HTTP backend in production and by [`mock::MockBackend`] in tests:
 * - `SubtitleSource`: raw cue lists for a video and language pair
 * - `CueTranslationSource`: batched translation of cue texts
 * - `DictionarySource`: single-term dictionary entries
 *
 * The wire types below mirror the JSON the backend speaks. Every field has a
 * serde default so a partially-formed response degrades field by field
 * instead of failing as a whole.
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::ProviderError;

pub mod http;
pub mod mock;

pub use http::HttpBackend;
pub use mock::{MockBackend, MockBehavior};

/// Token as it appears on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RawToken {
    #[serde(default, alias = "text")]
    pub t: String,
    #[serde(default, alias = "normalizedForm")]
    pub norm: String,
}

/// Cue record as returned by the subtitle source, before normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawCue {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub start_ms: u64,
    #[serde(default)]
    pub end_ms: u64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub translation: Option<String>,
    #[serde(default)]
    pub tokens: Option<Vec<RawToken>>,
    #[serde(default)]
    pub lang: Option<String>,
}

/// Subtitle list response body
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SubtitlesResponse {
    #[serde(default)]
    pub video_id: Option<String>,
    #[serde(default)]
    pub cues: Vec<RawCue>,
}

/// Parameters of a subtitle request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleQuery {
    pub video_id: String,
    pub source_lang: String,
    pub target_lang: String,
    pub format: String,
}

impl SubtitleQuery {
    pub fn new(
        video_id: impl Into<String>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) -> Self {
        Self {
            video_id: video_id.into(),
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
            format: "json".to_string(),
        }
    }
}

/// One cue in an outgoing translation batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CueText {
    pub id: i64,
    pub text: String,
}

/// Batched translation request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CueTranslationRequest {
    pub source_lang: String,
    pub target_lang: String,
    pub cues: Vec<CueText>,
}

/// One translated cue in a batch response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslatedItem {
    pub id: i64,
    #[serde(default)]
    pub translation: String,
}

/// Batched translation response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CueTranslationResponse {
    #[serde(default)]
    pub items: Vec<TranslatedItem>,
}

/// Parameters of a dictionary request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryQuery {
    pub term: String,
    pub source_lang: String,
    pub target_lang: String,
}

/// Part-of-speech entry on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RawPartOfSpeech {
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub meaning: String,
}

/// Example sentence pair on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RawExample {
    #[serde(default, alias = "source")]
    pub en: String,
    #[serde(default, alias = "target")]
    pub zh: String,
}

/// Dictionary response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DictPayload {
    #[serde(default)]
    pub term: Option<String>,
    #[serde(default)]
    pub phonetic: Option<String>,
    #[serde(default)]
    pub pos: Option<Vec<RawPartOfSpeech>>,
    #[serde(default)]
    pub examples: Option<Vec<RawExample>>,
}

/// Source of raw subtitle cues
#[async_trait]
pub trait SubtitleSource: Send + Sync + Debug {
    /// Fetch the raw cue list for a video, in response order
    async fn fetch_cues(&self, query: &SubtitleQuery) -> Result<Vec<RawCue>, ProviderError>;
}

/// Source of batched cue translations
#[async_trait]
pub trait CueTranslationSource: Send + Sync + Debug {
    /// Translate a batch of cue texts
    async fn translate_cues(
        &self,
        request: &CueTranslationRequest,
    ) -> Result<CueTranslationResponse, ProviderError>;
}

/// Source of dictionary entries
#[async_trait]
pub trait DictionarySource: Send + Sync + Debug {
    /// Look up a single term
    async fn lookup(&self, query: &DictionaryQuery) -> Result<DictPayload, ProviderError>;
}
