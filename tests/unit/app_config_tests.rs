/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use std::str::FromStr;
use tempfile::TempDir;

use lingocue::app_config::{Config, LogLevel, ProviderConfig, TranslationProvider};
use lingocue::errors::ConfigError;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "zh");
    assert_eq!(config.api.base_url, "http://localhost:8080/api");
    assert_eq!(config.api.timeout_secs, 30);
    assert_eq!(config.translation.provider, TranslationProvider::Completion);
    assert!(config.cache.enabled);
    assert!(!config.subtitles.auto_tokenize);
    assert_eq!(config.log_level, LogLevel::Info);

    let completion = config
        .translation
        .get_provider_config(&TranslationProvider::Completion)
        .expect("Completion provider config should exist");
    assert_eq!(completion.endpoint, "http://localhost:1234/v1/completions");
    assert_eq!(completion.timeout_secs, 30);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.source_language = "e1".to_string();
    assert!(config.validate().is_err());
    config.source_language = "en".to_string();

    config.target_language = "".to_string();
    assert!(config.validate().is_err());
    config.target_language = "zho".to_string();
    assert!(config.validate().is_ok());

    config.api.base_url = "not a url".to_string();
    let err = config.validate().unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::InvalidBaseUrl { .. })
    ));
}

#[test]
fn test_config_validation_withGoogleAndNoKey_shouldRequireApiKey() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Google;

    assert!(config.validate().is_ok());
    let err = config.validate_provider().unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::MissingApiKey(_))
    ));

    for provider in config.translation.available_providers.iter_mut() {
        if provider.provider_type == "google" {
            provider.api_key = "key-1".to_string();
        }
    }
    assert!(config.validate_provider().is_ok());
}

#[test]
fn test_config_sameLanguagePair_withEquivalentCodes_shouldMatch() {
    let mut config = Config::default();
    assert!(!config.same_language_pair());

    config.source_language = "zho".to_string();
    assert!(config.same_language_pair());
    assert!(config.validate().is_ok());
}

#[test]
fn test_activeProviderConfig_withMissingEntry_shouldUseDefaults() {
    let mut config = Config::default();
    config.translation.available_providers.clear();
    config.translation.provider = TranslationProvider::Google;

    assert_eq!(
        config.translation.active_provider_config(),
        ProviderConfig::new(TranslationProvider::Google)
    );
    assert_eq!(config.translation.get_api_key(), "");
}

#[test]
fn test_translationProvider_fromStr_shouldParseKnownNames() {
    assert_eq!(TranslationProvider::from_str("Google").unwrap(), TranslationProvider::Google);
    assert_eq!(TranslationProvider::from_str(" completion ").unwrap(), TranslationProvider::Completion);
    assert!(TranslationProvider::from_str("babelfish").is_err());
    assert_eq!(TranslationProvider::Google.to_string(), "google");
}

#[test]
fn test_config_saveAndLoad_shouldRoundTripThroughFile() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("conf.json");

    let mut config = Config::default();
    config.target_language = "ja".to_string();
    config.subtitles.auto_tokenize = true;
    config.log_level = LogLevel::Debug;
    config.save(&path)?;

    let loaded = Config::load(&path)?;
    assert_eq!(loaded.target_language, "ja");
    assert!(loaded.subtitles.auto_tokenize);
    assert_eq!(loaded.log_level, LogLevel::Debug);
    assert_eq!(loaded.translation.available_providers.len(), 2);
    Ok(())
}

#[test]
fn test_config_load_withPartialFile_shouldFillDefaults() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("conf.json");
    std::fs::write(
        &path,
        r#"{"target_language": "fr", "translation": {"provider": "google", "available_providers": [{"type": "google", "api_key": "k"}]}}"#,
    )?;

    let config = Config::load(&path)?;
    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "fr");
    assert_eq!(config.api.timeout_secs, 30);
    assert_eq!(config.translation.provider, TranslationProvider::Google);
    assert_eq!(config.translation.get_api_key(), "k");
    assert!(config.validate().is_ok());
    Ok(())
}

#[test]
fn test_config_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("nested.json");

    let created = Config::load_or_create(&path)?;
    assert!(path.exists());
    assert_eq!(created.target_language, "zh");

    let loaded = Config::load_or_create(&path)?;
    assert_eq!(loaded.api, created.api);
    Ok(())
}

#[test]
fn test_config_load_withMalformedFile_shouldFail() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("conf.json");
    std::fs::write(&path, "{ not json")?;

    let err = Config::load(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
    Ok(())
}

#[test]
fn test_logLevel_toLevelFilter_shouldMapEveryLevel() {
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
