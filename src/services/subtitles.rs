/*!
 * Subtitle fetching.
 *
 * Retrieves the cue list of a video, normalizes and sorts it, and caches the
 * result per video and language pair. A failed fetch is replaced by a fixed
 * placeholder set that is cached too, so the player always has something to
 * render and a broken source is not hammered on every mount.
 */

use log::{info, warn};
use std::sync::Arc;

use crate::cache::keys::{or_default, DEFAULT_SOURCE_LANGUAGE, DEFAULT_VIDEO_ID};
use crate::cache::{subtitle_key, LookupCache};
use crate::cue::{tokenize, Cue, CueSet};
use crate::remote::{SubtitleQuery, SubtitleSource};

use super::outcome::Resolved;

/// Cache of resolved cue sets, keyed by [`subtitle_key`]
pub type SubtitleCache = LookupCache<Resolved<CueSet>>;

/// Service resolving the cue set of a video
#[derive(Debug, Clone)]
pub struct SubtitleFetchService {
    source: Arc<dyn SubtitleSource>,
    cache: SubtitleCache,
    tokenize_missing: bool,
}

impl SubtitleFetchService {
    pub fn new(source: Arc<dyn SubtitleSource>, cache: SubtitleCache) -> Self {
        Self {
            source,
            cache,
            tokenize_missing: false,
        }
    }

    /// Tokenize cues that arrive without tokens
    pub fn with_auto_tokenize(mut self, enabled: bool) -> Self {
        self.tokenize_missing = enabled;
        self
    }

    pub fn cache(&self) -> &SubtitleCache {
        &self.cache
    }

    /// Resolve the cue set for a video and language pair.
    ///
    /// Blank arguments fall back to `"default"`, `"en"` and no target. Never
    /// fails: a remote failure yields the cached placeholder set.
    pub async fn fetch_subtitles(
        &self,
        video_id: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Resolved<CueSet> {
        let key = subtitle_key(Some(video_id), Some(source_lang), Some(target_lang));
        if let Some(cached) = self.cache.get(&key) {
            return cached.from_cache();
        }

        let _guard = self.cache.lock_key(&key).await;
        if let Some(cached) = self.cache.get(&key) {
            return cached.from_cache();
        }

        let query = SubtitleQuery::new(
            or_default(Some(video_id), DEFAULT_VIDEO_ID),
            or_default(Some(source_lang), DEFAULT_SOURCE_LANGUAGE),
            or_default(Some(target_lang), ""),
        );

        let resolved = match self.source.fetch_cues(&query).await {
            Ok(raw_cues) => {
                let cues = raw_cues
                    .into_iter()
                    .map(|raw| Cue::from_raw(raw, self.tokenize_missing))
                    .collect();
                let set = CueSet::sorted(cues);
                info!("Loaded {} cues for '{}'", set.len(), key);
                Resolved::remote(set)
            }
            Err(e) => {
                warn!("Subtitle fetch for '{}' failed, using placeholder cues: {}", key, e);
                Resolved::fallback(placeholder_cues())
            }
        };

        self.cache.set(key, resolved.clone());
        resolved
    }
}

/// Deterministic bilingual cue set shown when subtitles cannot be fetched
pub fn placeholder_cues() -> CueSet {
    let lines = [
        (
            1,
            0,
            3800,
            "Welcome to Oslo, we just arrived and look at this gorgeous hotel room.",
            "欢迎来到奥斯陆，我们刚到，就看看这间华美的酒店房间。",
        ),
        (
            2,
            3900,
            7200,
            "The view outside is amazing, and we cannot wait to explore the city.",
            "窗外的景色令人惊叹，我们迫不及待地想去探索这座城市。",
        ),
        (
            3,
            7400,
            10600,
            "Stay tuned for more clips from our journey.",
            "敬请期待我们旅途中的更多片段。",
        ),
    ];

    let cues = lines
        .into_iter()
        .map(|(id, start_ms, end_ms, text, translation)| {
            Cue::new(id, start_ms, end_ms, text)
                .with_tokens(tokenize(text))
                .with_translation(translation)
        })
        .collect();

    CueSet::new(cues)
}
