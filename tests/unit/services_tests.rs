/*!
 * Tests for the subtitle, translation and dictionary services
 */

use std::sync::Arc;

use lingocue::cache::LookupCache;
use lingocue::remote::{DictPayload, RawPartOfSpeech, TranslatedItem};
use lingocue::services::{placeholder_cues, DEFINITION_UNAVAILABLE};
use lingocue::{
    Cue, CueSet, DictionaryLookupService, MockBackend, MockBehavior, Origin, SubtitleFetchService,
    TranslationMergeService,
};

use crate::common::{as_subtitle_source, init_logging, three_raw_cues};

fn subtitle_service(backend: MockBackend) -> (Arc<MockBackend>, SubtitleFetchService) {
    let backend = Arc::new(backend);
    let service = SubtitleFetchService::new(as_subtitle_source(&backend), LookupCache::new("subtitles"));
    (backend, service)
}

fn translation_service(backend: MockBackend) -> (Arc<MockBackend>, TranslationMergeService) {
    let backend = Arc::new(backend);
    let service = TranslationMergeService::new(backend.clone(), LookupCache::new("translations"));
    (backend, service)
}

fn dictionary_service(backend: MockBackend) -> (Arc<MockBackend>, DictionaryLookupService) {
    let backend = Arc::new(backend);
    let service = DictionaryLookupService::new(backend.clone(), LookupCache::new("dictionary"));
    (backend, service)
}

fn half_translated() -> CueSet {
    CueSet::new(vec![
        Cue::new(1, 0, 1000, "First line"),
        Cue::new(2, 1000, 2000, "Second line").with_translation("已译"),
    ])
}

#[tokio::test]
async fn test_fetchSubtitles_calledTwice_shouldHitNetworkOnce() {
    init_logging();
    let (backend, service) = subtitle_service(MockBackend::working().with_cues(three_raw_cues()));

    let first = service.fetch_subtitles("v1", "en", "zh").await;
    let second = service.fetch_subtitles("v1", "en", "zh").await;

    assert_eq!(backend.calls().subtitles, 1);
    assert_eq!(first.origin, Origin::Remote);
    assert_eq!(second.origin, Origin::Cache);
    assert_eq!(first.value, second.value);
    assert!(first.ptr_eq(&second));
}

#[tokio::test]
async fn test_fetchSubtitles_withBlankArguments_shouldShareDefaultKey() {
    let (backend, service) = subtitle_service(MockBackend::working().with_cues(three_raw_cues()));

    service.fetch_subtitles("", "", "").await;
    service.fetch_subtitles("default", "en", "  ").await;

    assert_eq!(backend.calls().subtitles, 1);
}

#[tokio::test]
async fn test_fetchSubtitles_withUnsortedResponse_shouldSortByStart() {
    let mut raw = three_raw_cues();
    raw.reverse();
    let (_, service) = subtitle_service(MockBackend::working().with_cues(raw));

    let cues = service.fetch_subtitles("v1", "en", "zh").await;
    let ids: Vec<i64> = cues.iter().map(|c| c.id).collect();

    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_fetchSubtitles_withEmptyResponse_shouldCacheEmptySet() {
    let (backend, service) = subtitle_service(MockBackend::working());

    let cues = service.fetch_subtitles("silent", "en", "").await;
    service.fetch_subtitles("silent", "en", "").await;

    assert!(cues.is_empty());
    assert_eq!(cues.origin, Origin::Remote);
    assert_eq!(backend.calls().subtitles, 1);
}

#[tokio::test]
async fn test_fetchSubtitles_withFailingSource_shouldCachePlaceholder() {
    let (backend, service) = subtitle_service(MockBackend::failing());

    let first = service.fetch_subtitles("v1", "en", "zh").await;
    let second = service.fetch_subtitles("v1", "en", "zh").await;

    assert!(first.len() >= 3);
    assert_eq!(first[0].start_ms, 0);
    assert!(first.is_degraded());
    assert!(second.is_degraded());
    assert_eq!(first.value, second.value);
    assert_eq!(first.value, placeholder_cues());
    assert_eq!(backend.calls().subtitles, 1);
}

#[tokio::test]
async fn test_fetchSubtitles_withDisabledCache_shouldFetchEveryTime() {
    let backend = Arc::new(MockBackend::working().with_cues(three_raw_cues()));
    let service = SubtitleFetchService::new(
        as_subtitle_source(&backend),
        LookupCache::with_enabled("subtitles", false),
    );

    service.fetch_subtitles("v1", "en", "zh").await;
    service.fetch_subtitles("v1", "en", "zh").await;

    assert_eq!(backend.calls().subtitles, 2);
}

#[tokio::test]
async fn test_mergeTranslations_shouldOnlyRequestMissingCues() {
    let backend = MockBackend::working().with_translation_items(vec![TranslatedItem {
        id: 1,
        translation: "X".to_string(),
    }]);
    let (backend, service) = translation_service(backend);

    let merged = service.merge_translations("v1", &half_translated(), "en", "zh").await;

    assert_eq!(merged.origin, Origin::Remote);
    assert_eq!(merged[0].translation, "X");
    assert_eq!(merged[1].translation, "已译");

    let request = backend.last_translation_request().unwrap();
    assert_eq!(request.cues.len(), 1);
    assert_eq!(request.cues[0].id, 1);
    assert_eq!(request.target_lang, "zh");
}

#[tokio::test]
async fn test_mergeTranslations_appliedTwice_shouldBeIdempotent() {
    let (backend, service) = translation_service(MockBackend::working());
    let cues = half_translated();

    let once = service.merge_translations("v1", &cues, "en", "zh").await;
    let twice = service.merge_translations("v1", &once, "en", "zh").await;
    let again = service.merge_translations("v1", &cues, "en", "zh").await;

    assert_eq!(once.value, twice.value);
    assert_eq!(once.value, again.value);
    assert_eq!(again.origin, Origin::Cache);
    assert_eq!(backend.calls().translations, 1);
}

#[tokio::test]
async fn test_mergeTranslations_withNothingMissing_shouldSkipRequest() {
    let (backend, service) = translation_service(MockBackend::working());
    let cues = CueSet::new(vec![Cue::new(1, 0, 1000, "a").with_translation("甲")]);

    let merged = service.merge_translations("v1", &cues, "en", "zh").await;

    assert_eq!(merged.origin, Origin::Unchanged);
    assert!(merged.ptr_eq(&cues));
    assert_eq!(backend.calls().translations, 0);
}

#[tokio::test]
async fn test_mergeTranslations_withFailure_shouldReturnInputAndRetryLater() {
    let (backend, service) = translation_service(MockBackend::failing());
    let cues = half_translated();

    let merged = service.merge_translations("v1", &cues, "en", "zh").await;
    assert_eq!(merged.value, cues);
    assert!(merged.is_degraded());

    backend.set_behavior(MockBehavior::Working);
    let retried = service.merge_translations("v1", &cues, "en", "zh").await;

    assert_eq!(backend.calls().translations, 2);
    assert_eq!(retried.origin, Origin::Remote);
    assert_eq!(retried[0].translation, "[zh] First line");
}

#[tokio::test]
async fn test_mergeTranslations_withEmptyItem_shouldKeepCueUntranslated() {
    let backend = MockBackend::working().with_translation_items(vec![TranslatedItem {
        id: 1,
        translation: String::new(),
    }]);
    let (_, service) = translation_service(backend);

    let merged = service.merge_translations("v1", &half_translated(), "en", "zh").await;

    assert_eq!(merged[0].translation, "");
    assert_eq!(merged[1].translation, "已译");
}

#[tokio::test]
async fn test_lookup_withBlankTerm_shouldReturnNoneWithoutRequest() {
    let (backend, service) = dictionary_service(MockBackend::demo());

    assert!(service.lookup("", "en", "zh").await.is_none());
    assert!(service.lookup("   ", "en", "zh").await.is_none());
    assert_eq!(backend.calls().dictionary, 0);
}

#[tokio::test]
async fn test_lookup_withKnownTerm_shouldReturnEntry() {
    let (backend, service) = dictionary_service(MockBackend::demo());

    let entry = service.lookup("Oslo", "en", "zh").await.unwrap();
    let again = service.lookup("  oslo ", "en", "zh").await.unwrap();

    assert_eq!(entry.origin, Origin::Remote);
    assert_eq!(entry.term, "Oslo");
    assert_eq!(entry.primary_meaning(), Some("奥斯陆（挪威首都）"));
    assert_eq!(entry.examples.len(), 1);
    assert_eq!(again.origin, Origin::Cache);
    assert_eq!(backend.calls().dictionary, 1);
}

#[tokio::test]
async fn test_lookup_withSparsePayload_shouldFillDefaults() {
    let backend = MockBackend::working().with_dictionary_entry(
        "run",
        DictPayload {
            pos: Some(vec![RawPartOfSpeech {
                kind: "v.".to_string(),
                meaning: "跑".to_string(),
            }]),
            ..Default::default()
        },
    );
    let (_, service) = dictionary_service(backend);

    let entry = service.lookup("Run", "en", "zh").await.unwrap();

    assert_eq!(entry.term, "Run");
    assert_eq!(entry.phonetic, "");
    assert!(entry.examples.is_empty());
    assert!(entry.message.is_none());
}

#[tokio::test]
async fn test_lookup_withFailure_shouldCacheUnavailableEntry() {
    let (backend, service) = dictionary_service(MockBackend::demo());

    let entry = service.lookup("zyzzyva", "en", "zh").await.unwrap();
    let again = service.lookup("zyzzyva", "en", "zh").await.unwrap();

    assert!(entry.is_degraded());
    assert_eq!(entry.message.as_deref(), Some(DEFINITION_UNAVAILABLE));
    assert_eq!(entry.term, "zyzzyva");
    assert!(again.is_degraded());
    assert_eq!(backend.calls().dictionary, 1);
}
