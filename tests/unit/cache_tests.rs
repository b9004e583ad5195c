/*!
 * Tests for lookup cache functionality
 */

use lingocue::cache::keys::or_default;
use lingocue::cache::{dictionary_key, subtitle_key, translation_key};
use lingocue::LookupCache;

#[test]
fn test_cache_withDisabled_shouldNeverStore() {
    let cache: LookupCache<String> = LookupCache::with_enabled("test", false);
    cache.set("hello", "bonjour".to_string());

    assert!(cache.get("hello").is_none());
    assert!(cache.is_empty());
    assert!(!cache.is_enabled());
}

#[test]
fn test_cache_set_withEnabledCache_shouldStoreValue() {
    let cache: LookupCache<String> = LookupCache::new("test");
    cache.set("hello", "bonjour".to_string());

    assert_eq!(cache.get("hello"), Some("bonjour".to_string()));
    assert!(cache.contains("hello"));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_cache_clone_shouldShareEntries() {
    let cache: LookupCache<u32> = LookupCache::new("shared");
    let clone = cache.clone();
    clone.set("k", 7);

    assert_eq!(cache.get("k"), Some(7));
    assert_eq!(cache.name(), "shared");
}

#[test]
fn test_cache_stats_shouldCountHitsAndMisses() {
    let cache: LookupCache<u32> = LookupCache::new("stats");
    cache.get("missing");
    cache.set("k", 1);
    cache.get("k");
    cache.get("k");

    let stats = cache.stats();
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.entries, 1);
    assert!((stats.hit_rate() - 2.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_cache_clear_shouldDropEntries() {
    let cache: LookupCache<u32> = LookupCache::new("clear");
    cache.set("a", 1);
    cache.set("b", 2);
    cache.clear();

    assert!(cache.is_empty());
    assert!(cache.get("a").is_none());
}

#[tokio::test]
async fn test_lockKey_withSameKey_shouldSerializeHolders() {
    let cache: LookupCache<u32> = LookupCache::new("locks");
    let guard = cache.lock_key("k").await;

    let other = cache.clone();
    let waiter = tokio::spawn(async move {
        let _guard = other.lock_key("k").await;
        other.get("k")
    });

    cache.set("k", 42);
    drop(guard);

    assert_eq!(waiter.await.unwrap(), Some(42));
}

#[test]
fn test_keys_withBlankFields_shouldUseDefaults() {
    assert_eq!(subtitle_key(Some("v1"), Some(""), None), "v1:en:");
    assert_eq!(translation_key(None, None, None), "default:en:zh");
    assert_eq!(translation_key(Some(" v1 "), Some("fr"), Some(" ")), "v1:fr:zh");
}

#[test]
fn test_dictionaryKey_withDifferentCase_shouldCollide() {
    assert_eq!(
        dictionary_key("  Oslo ", Some("en"), Some("zh")),
        dictionary_key("oslo", None, None)
    );
    assert_ne!(dictionary_key("oslo", Some("en"), Some("ja")), dictionary_key("oslo", None, None));
}

#[test]
fn test_orDefault_shouldTrimValues() {
    assert_eq!(or_default(Some(" zh "), "en"), "zh");
    assert_eq!(or_default(Some("   "), "en"), "en");
    assert_eq!(or_default(None, "en"), "en");
}
