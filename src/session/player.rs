/*!
 * Session state of one player instance.
 *
 * This module handles:
 * - Loading the cue set of a video and installing it for playback
 * - Backfilling missing translations into the installed set
 * - Dictionary lookups in the session's language pair
 * - Dropping responses that arrive after a newer request started
 */

use log::{debug, info};
use parking_lot::RwLock;
use std::sync::Arc;

use crate::app_config::Config;
use crate::cache::LookupCache;
use crate::cue::CueSet;
use crate::errors::ProviderError;
use crate::playback::{ActiveCueChange, ActiveCueTracker};
use crate::remote::{CueTranslationSource, DictionarySource, HttpBackend, SubtitleSource};
use crate::services::{
    DictResult, DictionaryLookupService, Origin, Resolved, SubtitleFetchService,
    TranslationMergeService,
};

use super::generation::{GenerationTicket, RequestGenerations};

/// Result of a load or backfill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The resolved cue set was installed
    Installed { cues: usize, origin: Origin },
    /// A newer request started first; the response was dropped
    Stale,
    /// Nothing is loaded, so there is nothing to backfill
    Empty,
}

#[derive(Debug, Default)]
struct SessionState {
    video_id: String,
    source_lang: String,
    target_lang: String,
    cues: CueSet,
    origin: Option<Origin>,
    tracker: ActiveCueTracker,
    loaded_by: Option<GenerationTicket>,
}

/// One player's view of a video: its cues, the active line and lookups
#[derive(Debug)]
pub struct PlayerSession {
    subtitles: SubtitleFetchService,
    translations: TranslationMergeService,
    dictionary: DictionaryLookupService,
    generations: RequestGenerations,
    default_source_lang: String,
    default_target_lang: String,
    state: RwLock<SessionState>,
}

impl PlayerSession {
    /// Create a session over one backend implementing every remote surface
    pub fn new<B>(backend: Arc<B>, config: &Config) -> Self
    where
        B: SubtitleSource + CueTranslationSource + DictionarySource + 'static,
    {
        Self::from_sources(backend.clone(), backend.clone(), backend, config)
    }

    /// Create a session over separate remote sources
    pub fn from_sources(
        subtitles: Arc<dyn SubtitleSource>,
        translations: Arc<dyn CueTranslationSource>,
        dictionary: Arc<dyn DictionarySource>,
        config: &Config,
    ) -> Self {
        let enabled = config.cache.enabled;
        Self {
            subtitles: SubtitleFetchService::new(subtitles, LookupCache::with_enabled("subtitles", enabled))
                .with_auto_tokenize(config.subtitles.auto_tokenize),
            translations: TranslationMergeService::new(
                translations,
                LookupCache::with_enabled("translations", enabled),
            ),
            dictionary: DictionaryLookupService::new(dictionary, LookupCache::with_enabled("dictionary", enabled)),
            generations: RequestGenerations::new(),
            default_source_lang: config.source_language.clone(),
            default_target_lang: config.target_language.clone(),
            state: RwLock::new(SessionState::default()),
        }
    }

    /// Create a session talking HTTP to the configured backend
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let backend = HttpBackend::from_config(&config.api)?;
        Ok(Self::new(Arc::new(backend), config))
    }

    /// Fetch and install the cue set of a video.
    ///
    /// Blank languages fall back to the configured pair. The fetch itself
    /// never fails; the result is dropped if another load or a reset started
    /// while it was in flight.
    pub async fn load(&self, video_id: &str, source_lang: &str, target_lang: &str) -> LoadOutcome {
        let source_lang = self.language_or_default(source_lang, &self.default_source_lang);
        let target_lang = self.language_or_default(target_lang, &self.default_target_lang);
        let ticket = self.generations.begin();

        let resolved = self
            .subtitles
            .fetch_subtitles(video_id, &source_lang, &target_lang)
            .await;

        let mut state = self.state.write();
        if !ticket.is_current() {
            debug!(
                "Dropping subtitles of '{}' from generation {}",
                video_id,
                ticket.generation()
            );
            return LoadOutcome::Stale;
        }

        let count = resolved.len();
        let origin = resolved.origin;
        info!("Loaded {} cues for '{}' ({:?})", count, video_id, origin);

        state.video_id = video_id.to_string();
        state.source_lang = source_lang;
        state.target_lang = target_lang;
        state.tracker.replace_index(resolved.value.clone());
        state.cues = resolved.into_inner();
        state.origin = Some(origin);
        state.loaded_by = Some(ticket);

        LoadOutcome::Installed { cues: count, origin }
    }

    /// Fill in missing translations of the installed cue set
    pub async fn backfill(&self) -> LoadOutcome {
        let (ticket, video_id, cues, source_lang, target_lang) = {
            let state = self.state.read();
            match &state.loaded_by {
                Some(ticket) => (
                    ticket.clone(),
                    state.video_id.clone(),
                    state.cues.clone(),
                    state.source_lang.clone(),
                    state.target_lang.clone(),
                ),
                None => return LoadOutcome::Empty,
            }
        };

        let merged = self
            .translations
            .merge_translations(&video_id, &cues, &source_lang, &target_lang)
            .await;

        let mut state = self.state.write();
        let same_load = state
            .loaded_by
            .as_ref()
            .is_some_and(|loaded| loaded.generation() == ticket.generation());
        if !ticket.is_current() || !same_load {
            debug!("Dropping translations of '{}' from generation {}", video_id, ticket.generation());
            return LoadOutcome::Stale;
        }

        let origin = merged.origin;
        if !CueSet::ptr_eq(&state.cues, &merged) {
            state.tracker.replace_cues(merged.value.clone());
            state.cues = merged.into_inner();
        }

        LoadOutcome::Installed {
            cues: state.cues.len(),
            origin,
        }
    }

    /// Look up a term in the session's language pair
    pub async fn lookup(&self, term: &str) -> Option<Resolved<Arc<DictResult>>> {
        let (source_lang, target_lang) = {
            let state = self.state.read();
            (
                self.language_or_default(&state.source_lang, &self.default_source_lang),
                self.language_or_default(&state.target_lang, &self.default_target_lang),
            )
        };

        self.dictionary.lookup(term, &source_lang, &target_lang).await
    }

    /// Report the playback time in seconds
    pub fn tick(&self, current_time: f64) -> Option<ActiveCueChange> {
        self.state.write().tracker.on_tick(current_time)
    }

    /// Start time of the cue at `index`, for click-to-seek
    pub fn seek_target(&self, index: usize) -> Option<f64> {
        self.state.read().tracker.seek_target(index)
    }

    /// Installed cue set
    pub fn cues(&self) -> CueSet {
        self.state.read().cues.clone()
    }

    /// Origin of the installed cue set, if any
    pub fn origin(&self) -> Option<Origin> {
        self.state.read().origin
    }

    pub fn active_index(&self) -> Option<usize> {
        self.state.read().tracker.active_index()
    }

    /// Drop responses of every request still in flight
    pub fn cancel_pending(&self) {
        self.generations.invalidate();
    }

    /// Clear every cache and installed state, dropping in-flight responses
    pub fn reset(&self) {
        self.generations.invalidate();
        self.subtitles.cache().clear();
        self.translations.cache().clear();
        self.dictionary.cache().clear();
        *self.state.write() = SessionState::default();
        info!("Session reset");
    }

    pub fn subtitle_service(&self) -> &SubtitleFetchService {
        &self.subtitles
    }

    pub fn translation_service(&self) -> &TranslationMergeService {
        &self.translations
    }

    pub fn dictionary_service(&self) -> &DictionaryLookupService {
        &self.dictionary
    }

    fn language_or_default(&self, language: &str, default: &str) -> String {
        let language = language.trim();
        if language.is_empty() {
            default.to_string()
        } else {
            language.to_string()
        }
    }
}
