/*!
 * Translation backfill.
 *
 * Only cues without a translation are sent out, in one batch. The returned
 * id to translation map is cached per video and language pair and re-applied
 * on later calls. A failed batch is not cached: the input comes back
 * untouched and the next backfill attempt may try again.
 */

use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::keys::{or_default, DEFAULT_SOURCE_LANGUAGE, DEFAULT_TARGET_LANGUAGE};
use crate::cache::{translation_key, LookupCache};
use crate::cue::CueSet;
use crate::remote::{CueText, CueTranslationRequest, CueTranslationSource};

use super::outcome::{Origin, Resolved};

/// Cue id to translated text
pub type TranslationMap = HashMap<i64, String>;

/// Cache of translation maps, keyed by [`translation_key`]
pub type TranslationCache = LookupCache<Arc<TranslationMap>>;

/// Service backfilling missing cue translations
#[derive(Debug, Clone)]
pub struct TranslationMergeService {
    source: Arc<dyn CueTranslationSource>,
    cache: TranslationCache,
}

impl TranslationMergeService {
    pub fn new(source: Arc<dyn CueTranslationSource>, cache: TranslationCache) -> Self {
        Self { source, cache }
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    /// Fill in missing translations of `cues`.
    ///
    /// The result has the same cues in the same order; only `translation`
    /// fields may differ. Either the whole map is applied or nothing is.
    pub async fn merge_translations(
        &self,
        video_id: &str,
        cues: &CueSet,
        source_lang: &str,
        target_lang: &str,
    ) -> Resolved<CueSet> {
        let key = translation_key(Some(video_id), Some(source_lang), Some(target_lang));
        if let Some(map) = self.cache.get(&key) {
            return Resolved::new(apply_translations(cues, &map), Origin::Cache);
        }

        if cues.missing_translations().next().is_none() {
            debug!("No missing translations for '{}'", key);
            return Resolved::unchanged(cues.clone());
        }

        let _guard = self.cache.lock_key(&key).await;
        if let Some(map) = self.cache.get(&key) {
            return Resolved::new(apply_translations(cues, &map), Origin::Cache);
        }

        let request = CueTranslationRequest {
            source_lang: or_default(Some(source_lang), DEFAULT_SOURCE_LANGUAGE).to_string(),
            target_lang: or_default(Some(target_lang), DEFAULT_TARGET_LANGUAGE).to_string(),
            cues: cues
                .missing_translations()
                .map(|cue| CueText {
                    id: cue.id,
                    text: cue.source_text.clone(),
                })
                .collect(),
        };

        match self.source.translate_cues(&request).await {
            Ok(response) => {
                let map: TranslationMap = response
                    .items
                    .into_iter()
                    .map(|item| (item.id, item.translation))
                    .collect();
                info!(
                    "Backfilled {} of {} missing translations for '{}'",
                    map.len(),
                    request.cues.len(),
                    key
                );
                let merged = apply_translations(cues, &map);
                self.cache.set(key, Arc::new(map));
                Resolved::remote(merged)
            }
            Err(e) => {
                warn!("Translation backfill for '{}' failed, keeping cues as-is: {}", key, e);
                Resolved::fallback(cues.clone())
            }
        }
    }
}

/// Apply a translation map: a non-empty mapped value replaces the cue's
/// translation, anything else keeps it
pub fn apply_translations(cues: &CueSet, map: &TranslationMap) -> CueSet {
    let merged = cues
        .iter()
        .map(|cue| match map.get(&cue.id) {
            Some(translation) if !translation.is_empty() => cue.with_translation(translation.clone()),
            _ => cue.clone(),
        })
        .collect();
    CueSet::new(merged)
}
