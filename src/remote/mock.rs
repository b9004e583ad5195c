/*!
 * In-memory backend for tests and offline runs.
 *
 * `MockBackend` implements every remote trait and can simulate different
 * behaviors:
 * - `MockBackend::working()` - answers from its configured data
 * - `MockBackend::failing()` - every call fails
 * - `MockBackend::intermittent(n)` - every n-th call fails
 * - `MockBackend::slow(ms)` - answers after a delay
 *
 * Clones share their call counters and behavior, so a test can keep a handle
 * while the services own another.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;

use super::{
    CueTranslationRequest, CueTranslationResponse, CueTranslationSource, DictPayload,
    DictionaryQuery, DictionarySource, RawCue, RawExample, RawPartOfSpeech, RawToken,
    SubtitleQuery, SubtitleSource, TranslatedItem,
};

/// Behavior mode for the mock backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always answers from the configured data
    Working,
    /// Fails every Nth call, counted across all surfaces
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Answers after a delay
    Slow { delay_ms: u64 },
}

/// Calls received per surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CallCounts {
    pub subtitles: usize,
    pub translations: usize,
    pub dictionary: usize,
}

/// Mock backend for subtitles, translations and dictionary entries
#[derive(Debug, Clone)]
pub struct MockBackend {
    behavior: Arc<Mutex<MockBehavior>>,
    cues: Vec<RawCue>,
    translation_items: Option<Vec<TranslatedItem>>,
    dictionary: HashMap<String, DictPayload>,
    total_calls: Arc<AtomicUsize>,
    subtitle_calls: Arc<AtomicUsize>,
    translation_calls: Arc<AtomicUsize>,
    dictionary_calls: Arc<AtomicUsize>,
    last_translation_request: Arc<Mutex<Option<CueTranslationRequest>>>,
}

impl MockBackend {
    /// Create a new mock backend with the specified behavior and no data
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior: Arc::new(Mutex::new(behavior)),
            cues: Vec::new(),
            translation_items: None,
            dictionary: HashMap::new(),
            total_calls: Arc::new(AtomicUsize::new(0)),
            subtitle_calls: Arc::new(AtomicUsize::new(0)),
            translation_calls: Arc::new(AtomicUsize::new(0)),
            dictionary_calls: Arc::new(AtomicUsize::new(0)),
            last_translation_request: Arc::new(Mutex::new(None)),
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Working backend preloaded with a short demo video
    pub fn demo() -> Self {
        let cues = vec![
            RawCue {
                id: 1,
                start_ms: 0,
                end_ms: 2000,
                text: "Good morning, Oslo!".to_string(),
                translation: Some("早上好，奥斯陆！".to_string()),
                tokens: Some(vec![
                    RawToken { t: "Good".into(), norm: "good".into() },
                    RawToken { t: " ".into(), norm: String::new() },
                    RawToken { t: "morning".into(), norm: "morning".into() },
                    RawToken { t: ", ".into(), norm: String::new() },
                    RawToken { t: "Oslo".into(), norm: "oslo".into() },
                    RawToken { t: "!".into(), norm: String::new() },
                ]),
                lang: Some("en".to_string()),
            },
            RawCue {
                id: 2,
                start_ms: 2000,
                end_ms: 4200,
                text: "The harbour is quiet today.".to_string(),
                ..Default::default()
            },
            RawCue {
                id: 3,
                start_ms: 4200,
                end_ms: 7000,
                text: "Let's grab a coffee first.".to_string(),
                ..Default::default()
            },
        ];

        Self::working()
            .with_cues(cues)
            .with_dictionary_entry(
                "oslo",
                DictPayload {
                    term: Some("Oslo".to_string()),
                    phonetic: Some("/ˈɒzləʊ/".to_string()),
                    pos: Some(vec![RawPartOfSpeech {
                        kind: "n.".to_string(),
                        meaning: "奥斯陆（挪威首都）".to_string(),
                    }]),
                    examples: Some(vec![RawExample {
                        en: "Good morning, Oslo!".to_string(),
                        zh: "早上好，奥斯陆！".to_string(),
                    }]),
                },
            )
            .with_dictionary_entry(
                "morning",
                DictPayload {
                    term: Some("morning".to_string()),
                    phonetic: Some("/ˈmɔːnɪŋ/".to_string()),
                    pos: Some(vec![RawPartOfSpeech {
                        kind: "n.".to_string(),
                        meaning: "早晨；上午".to_string(),
                    }]),
                    examples: None,
                },
            )
    }

    /// Cues returned by subtitle requests, in this order
    pub fn with_cues(mut self, cues: Vec<RawCue>) -> Self {
        self.cues = cues;
        self
    }

    /// Fixed items returned by translation requests.
    ///
    /// Without this, every requested cue is echoed back tagged with the
    /// target language.
    pub fn with_translation_items(mut self, items: Vec<TranslatedItem>) -> Self {
        self.translation_items = Some(items);
        self
    }

    /// Known dictionary entry; unknown terms answer 404
    pub fn with_dictionary_entry(mut self, term: &str, payload: DictPayload) -> Self {
        self.dictionary.insert(term.to_lowercase(), payload);
        self
    }

    /// Switch behavior for every clone
    pub fn set_behavior(&self, behavior: MockBehavior) {
        *self.behavior.lock() = behavior;
    }

    pub fn calls(&self) -> CallCounts {
        CallCounts {
            subtitles: self.subtitle_calls.load(Ordering::SeqCst),
            translations: self.translation_calls.load(Ordering::SeqCst),
            dictionary: self.dictionary_calls.load(Ordering::SeqCst),
        }
    }

    /// Last batch sent to the translation surface
    pub fn last_translation_request(&self) -> Option<CueTranslationRequest> {
        self.last_translation_request.lock().clone()
    }

    // Applies the configured behavior to one call
    async fn simulate(&self, surface: &str) -> Result<(), ProviderError> {
        let count = self.total_calls.fetch_add(1, Ordering::SeqCst);
        let behavior = *self.behavior.lock();

        match behavior {
            MockBehavior::Working => Ok(()),
            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        status_code: 503,
                        message: format!("Simulated intermittent {} failure (call #{})", surface, count + 1),
                    })
                } else {
                    Ok(())
                }
            }
            MockBehavior::Failing => Err(ProviderError::ConnectionError(format!(
                "Simulated {} failure",
                surface
            ))),
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl SubtitleSource for MockBackend {
    async fn fetch_cues(&self, _query: &SubtitleQuery) -> Result<Vec<RawCue>, ProviderError> {
        self.subtitle_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate("subtitle").await?;
        Ok(self.cues.clone())
    }
}

#[async_trait]
impl CueTranslationSource for MockBackend {
    async fn translate_cues(
        &self,
        request: &CueTranslationRequest,
    ) -> Result<CueTranslationResponse, ProviderError> {
        self.translation_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_translation_request.lock() = Some(request.clone());
        self.simulate("translation").await?;

        let items = match &self.translation_items {
            Some(items) => items.clone(),
            None => request
                .cues
                .iter()
                .map(|cue| TranslatedItem {
                    id: cue.id,
                    translation: format!("[{}] {}", request.target_lang, cue.text),
                })
                .collect(),
        };

        Ok(CueTranslationResponse { items })
    }
}

#[async_trait]
impl DictionarySource for MockBackend {
    async fn lookup(&self, query: &DictionaryQuery) -> Result<DictPayload, ProviderError> {
        self.dictionary_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate("dictionary").await?;

        self.dictionary
            .get(&query.term.to_lowercase())
            .cloned()
            .ok_or_else(|| ProviderError::ApiError {
                status_code: 404,
                message: format!("No entry for '{}'", query.term),
            })
    }
}
