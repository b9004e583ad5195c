/*!
 * Dictionary lookups for clicked words.
 *
 * Unlike translation backfill, failures are cached here: an unknown term is
 * looked up again and again by curious users, and "no definition" is a
 * perfectly good answer to keep.
 */

use log::warn;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::cache::keys::{or_default, DEFAULT_SOURCE_LANGUAGE, DEFAULT_TARGET_LANGUAGE};
use crate::cache::{dictionary_key, LookupCache};
use crate::remote::{DictPayload, DictionaryQuery, DictionarySource};

use super::outcome::Resolved;

/// Marker carried by the fallback entry
pub const DEFINITION_UNAVAILABLE: &str = "definition unavailable";

/// Part of speech with its meaning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartOfSpeech {
    pub kind: String,
    pub meaning: String,
}

/// Example sentence with its translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub source: String,
    pub target: String,
}

/// Dictionary entry of a term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictResult {
    pub term: String,
    pub phonetic: String,
    pub parts_of_speech: Vec<PartOfSpeech>,
    pub examples: Vec<Example>,

    /// Human-readable note, set on fallback entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DictResult {
    /// Build an entry from a payload, substituting missing fields
    pub fn from_payload(payload: DictPayload, requested_term: &str) -> Self {
        Self {
            term: payload
                .term
                .filter(|term| !term.is_empty())
                .unwrap_or_else(|| requested_term.to_string()),
            phonetic: payload.phonetic.unwrap_or_default(),
            parts_of_speech: payload
                .pos
                .unwrap_or_default()
                .into_iter()
                .map(|pos| PartOfSpeech {
                    kind: pos.kind,
                    meaning: pos.meaning,
                })
                .collect(),
            examples: payload
                .examples
                .unwrap_or_default()
                .into_iter()
                .map(|example| Example {
                    source: example.en,
                    target: example.zh,
                })
                .collect(),
            message: None,
        }
    }

    /// Entry returned when the dictionary cannot be reached
    pub fn unavailable(term: &str) -> Self {
        Self {
            term: term.to_string(),
            phonetic: String::new(),
            parts_of_speech: Vec::new(),
            examples: Vec::new(),
            message: Some(DEFINITION_UNAVAILABLE.to_string()),
        }
    }

    /// First meaning, if any
    pub fn primary_meaning(&self) -> Option<&str> {
        self.parts_of_speech.first().map(|pos| pos.meaning.as_str())
    }
}

/// Cache of dictionary entries, keyed by [`dictionary_key`]
pub type DictionaryCache = LookupCache<Resolved<Arc<DictResult>>>;

/// Service looking up single terms
#[derive(Debug, Clone)]
pub struct DictionaryLookupService {
    source: Arc<dyn DictionarySource>,
    cache: DictionaryCache,
}

impl DictionaryLookupService {
    pub fn new(source: Arc<dyn DictionarySource>, cache: DictionaryCache) -> Self {
        Self { source, cache }
    }

    pub fn cache(&self) -> &DictionaryCache {
        &self.cache
    }

    /// Look up `term`.
    ///
    /// Returns `None` only for an empty or blank term, without any request.
    /// Otherwise always returns an entry; a failed lookup yields the cached
    /// "definition unavailable" entry and is not retried.
    pub async fn lookup(
        &self,
        term: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Option<Resolved<Arc<DictResult>>> {
        let term = term.trim();
        if term.is_empty() {
            return None;
        }

        let key = dictionary_key(term, Some(source_lang), Some(target_lang));
        if let Some(cached) = self.cache.get(&key) {
            return Some(cached.from_cache());
        }

        let _guard = self.cache.lock_key(&key).await;
        if let Some(cached) = self.cache.get(&key) {
            return Some(cached.from_cache());
        }

        let query = DictionaryQuery {
            term: term.to_string(),
            source_lang: or_default(Some(source_lang), DEFAULT_SOURCE_LANGUAGE).to_string(),
            target_lang: or_default(Some(target_lang), DEFAULT_TARGET_LANGUAGE).to_string(),
        };

        let resolved = match self.source.lookup(&query).await {
            Ok(payload) => Resolved::remote(Arc::new(DictResult::from_payload(payload, term))),
            Err(e) => {
                warn!("Dictionary lookup for '{}' failed: {}", term, e);
                Resolved::fallback(Arc::new(DictResult::unavailable(term)))
            }
        };

        self.cache.set(key, resolved.clone());
        Some(resolved)
    }
}
