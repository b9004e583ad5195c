/*!
 * End-to-end player scenarios over the mock backend
 */

use lingocue::remote::TranslatedItem;
use lingocue::{ActiveCueChange, LoadOutcome, MockBackend, MockBehavior, Origin};

use crate::common::{init_logging, mock_session, raw_cue, three_raw_cues};

#[tokio::test]
async fn test_playback_withThreeCues_shouldHighlightOnChangeOnly() {
    init_logging();
    let (_, session) = mock_session(MockBackend::working().with_cues(three_raw_cues()));

    assert_eq!(
        session.load("v1", "en", "zh").await,
        LoadOutcome::Installed { cues: 3, origin: Origin::Remote }
    );

    let changes: Vec<Option<ActiveCueChange>> =
        [0.2, 1.0, 2.0, 3.0, 5.0, 100.0].iter().map(|&t| session.tick(t)).collect();

    assert_eq!(
        changes,
        vec![
            Some(ActiveCueChange { previous: None, current: Some(0) }),
            None,
            Some(ActiveCueChange { previous: Some(0), current: Some(1) }),
            None,
            Some(ActiveCueChange { previous: Some(1), current: Some(2) }),
            Some(ActiveCueChange { previous: Some(2), current: None }),
        ]
    );
}

#[tokio::test]
async fn test_clickToSeek_shouldLandOnClickedCue() {
    let (_, session) = mock_session(MockBackend::working().with_cues(three_raw_cues()));
    session.load("v1", "en", "zh").await;

    let target = session.seek_target(2).unwrap();
    let change = session.tick(target).unwrap();

    assert_eq!(target, 4.2);
    assert_eq!(change.current, Some(2));
}

#[tokio::test]
async fn test_load_withFailingBackend_shouldShowPlaceholderOnce() {
    let (backend, session) = mock_session(MockBackend::failing());

    let first = session.load("v1", "en", "zh").await;
    let second = session.load("v1", "en", "zh").await;

    assert_eq!(first, LoadOutcome::Installed { cues: 3, origin: Origin::Fallback });
    assert_eq!(second, first);
    assert_eq!(session.cues()[0].start_ms, 0);
    assert_eq!(backend.calls().subtitles, 1);
}

#[tokio::test]
async fn test_backfill_withPartialTranslations_shouldKeepExistingOnes() {
    let backend = MockBackend::working()
        .with_cues(vec![
            raw_cue(1, 0, 1000, "First"),
            lingocue::remote::RawCue {
                translation: Some("已译".to_string()),
                ..raw_cue(2, 1000, 2000, "Second")
            },
        ])
        .with_translation_items(vec![TranslatedItem {
            id: 1,
            translation: "X".to_string(),
        }]);
    let (backend, session) = mock_session(backend);

    session.load("v1", "en", "zh").await;
    let outcome = session.backfill().await;

    let cues = session.cues();
    assert_eq!(outcome, LoadOutcome::Installed { cues: 2, origin: Origin::Remote });
    assert_eq!(cues[0].translation, "X");
    assert_eq!(cues[1].translation, "已译");
    let request = backend.last_translation_request().unwrap();
    assert_eq!(request.cues.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1]);
}

#[tokio::test]
async fn test_backfill_withFailure_shouldKeepCuesAndRetry() {
    let (backend, session) = mock_session(MockBackend::working().with_cues(three_raw_cues()));
    session.load("v1", "en", "zh").await;
    let before = session.cues();

    backend.set_behavior(MockBehavior::Failing);
    let failed = session.backfill().await;
    assert_eq!(failed, LoadOutcome::Installed { cues: 3, origin: Origin::Fallback });
    assert_eq!(session.cues(), before);

    backend.set_behavior(MockBehavior::Working);
    let retried = session.backfill().await;
    assert_eq!(retried, LoadOutcome::Installed { cues: 3, origin: Origin::Remote });
    assert_eq!(session.cues()[2].translation, "[zh] See you later.");
    assert_eq!(backend.calls().translations, 2);
}

#[tokio::test]
async fn test_lookup_afterLoad_shouldUseSessionLanguages() {
    let (backend, session) = mock_session(MockBackend::demo());
    session.load("demo", "en", "zh").await;

    let clicked = session.cues()[0]
        .clickable_tokens()
        .map(|t| t.normalized_form.clone())
        .last()
        .unwrap();
    let entry = session.lookup(&clicked).await.unwrap();

    assert_eq!(clicked, "oslo");
    assert_eq!(entry.term, "Oslo");
    assert_eq!(entry.origin, Origin::Remote);
    assert!(session.lookup("").await.is_none());
    assert_eq!(backend.calls().dictionary, 1);
}
