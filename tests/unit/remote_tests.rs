/*!
 * Tests for the HTTP backend against a local one-shot server
 */

use std::time::Duration;

use lingocue::errors::ProviderError;
use lingocue::remote::{
    CueText, CueTranslationRequest, CueTranslationSource, DictionaryQuery, DictionarySource,
    SubtitleQuery, SubtitleSource,
};
use lingocue::HttpBackend;

use crate::common::serve_once;

fn backend(base_url: &str) -> HttpBackend {
    HttpBackend::new(&format!("{}/api", base_url), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_fetchCues_withCueList_shouldQueryVideoAndLanguages() {
    let (base_url, server) = serve_once(
        200,
        r#"{"videoId": "clip-1", "cues": [{"id": 1, "startMs": 0, "endMs": 900, "text": "Hi"}]}"#,
    )
    .await;

    let cues = backend(&base_url)
        .fetch_cues(&SubtitleQuery::new("clip-1", "en", "zh"))
        .await
        .unwrap();

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text, "Hi");
    assert_eq!(cues[0].end_ms, 900);

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /api/videos/clip-1/subtitles?lang=en&target=zh&format=json "));
}

#[tokio::test]
async fn test_fetchCues_withErrorStatus_shouldReturnApiError() {
    let (base_url, server) = serve_once(404, r#"{"error": "unknown video"}"#).await;

    let result = backend(&base_url)
        .fetch_cues(&SubtitleQuery::new("missing", "en", "zh"))
        .await;

    match result {
        Err(ProviderError::ApiError { status_code, message }) => {
            assert_eq!(status_code, 404);
            assert!(message.contains("unknown video"));
        }
        other => panic!("expected an API error, got {:?}", other),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn test_translateCues_shouldPostBatchAndReadItems() {
    let (base_url, server) = serve_once(200, r#"{"items": [{"id": 2, "translation": "你好吗？"}]}"#).await;
    let request = CueTranslationRequest {
        source_lang: "en".to_string(),
        target_lang: "zh".to_string(),
        cues: vec![CueText {
            id: 2,
            text: "How are you?".to_string(),
        }],
    };

    let response = backend(&base_url).translate_cues(&request).await.unwrap();

    assert_eq!(response.items.len(), 1);
    assert_eq!(response.items[0].id, 2);
    assert_eq!(response.items[0].translation, "你好吗？");

    let raw = server.await.unwrap();
    assert!(raw.starts_with("POST /api/translate/cues "));
    assert!(raw.contains(r#""sourceLang":"en""#));
    assert!(raw.contains(r#""text":"How are you?""#));
}

#[tokio::test]
async fn test_lookup_shouldSendTermAndLanguagesAsQuery() {
    let (base_url, server) = serve_once(
        200,
        r#"{"term": "harbour", "phonetic": "/ˈhɑːbə/", "pos": [{"type": "n.", "meaning": "港口"}]}"#,
    )
    .await;
    let query = DictionaryQuery {
        term: "harbour".to_string(),
        source_lang: "en".to_string(),
        target_lang: "zh".to_string(),
    };

    let payload = backend(&base_url).lookup(&query).await.unwrap();

    assert_eq!(payload.term.as_deref(), Some("harbour"));
    assert_eq!(payload.pos.map(|pos| pos.len()), Some(1));
    assert_eq!(payload.examples, None);

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /api/dict?term=harbour&sourceLang=en&targetLang=zh "));
}
