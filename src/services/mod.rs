/*!
 * Services resolving remote data for the player.
 *
 * - `subtitles`: cue sets per video, with a cached placeholder on failure
 * - `translation`: backfill of missing cue translations, retried on failure
 * - `dictionary`: single-term lookups, with a cached fallback on failure
 * - `outcome`: the `Resolved` value every service returns
 *
 * Each service owns the cache it is given; nothing here is global.
 */

pub mod dictionary;
pub mod outcome;
pub mod subtitles;
pub mod translation;

pub use dictionary::{
    DictResult, DictionaryCache, DictionaryLookupService, Example, PartOfSpeech, DEFINITION_UNAVAILABLE,
};
pub use outcome::{Origin, Resolved};
pub use subtitles::{placeholder_cues, SubtitleCache, SubtitleFetchService};
pub use translation::{apply_translations, TranslationCache, TranslationMap, TranslationMergeService};
