/*!
 * Single-string translation through a configured provider.
 *
 * Results are never cached, and failures never surface: the caller gets the
 * original text back, annotated as untranslated.
 */

use log::{debug, error, warn};
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::TranslationConfig;
use crate::errors::ProviderError;
use crate::services::Resolved;

use super::{from_config, Provider};

/// Suffix appended to text that could not be translated
pub const UNTRANSLATED_SUFFIX: &str = " (untranslated)";

/// Original text annotated as not translated
pub fn untranslated(text: &str) -> String {
    format!("{}{}", text, UNTRANSLATED_SUFFIX)
}

/// Translates one string at a time through a provider
#[derive(Debug, Clone)]
pub struct TextTranslator {
    /// HTTP client for API requests
    client: Client,
    /// Provider shaping requests and reading responses
    provider: Arc<dyn Provider>,
}

impl TextTranslator {
    pub fn new(provider: Arc<dyn Provider>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            provider,
        }
    }

    /// Build the translator for the active provider of a translation config
    pub fn from_config(config: &TranslationConfig) -> Self {
        let provider_config = config.active_provider_config();
        Self::new(
            from_config(&config.provider, &provider_config),
            Duration::from_secs(provider_config.timeout_secs),
        )
    }

    pub fn provider(&self) -> &dyn Provider {
        self.provider.as_ref()
    }

    /// Translate `text`.
    ///
    /// Blank text resolves to an empty string without a request. Transport
    /// errors, error statuses and responses without a translation all resolve
    /// to the annotated original.
    pub async fn translate(&self, text: &str, source_language: &str, target_language: &str) -> Resolved<String> {
        if text.trim().is_empty() {
            return Resolved::unchanged(String::new());
        }

        match self.request(text, source_language, target_language).await {
            Ok(translated) => Resolved::remote(translated),
            Err(e) => {
                warn!("{} translation failed, keeping original text: {}", self.provider.name(), e);
                Resolved::fallback(untranslated(text))
            }
        }
    }

    async fn request(&self, text: &str, source_language: &str, target_language: &str) -> Result<String, ProviderError> {
        let request = self.provider.build_request(text, source_language, target_language);
        debug!("POST {} via {}", self.provider.endpoint(), self.provider.name());

        let mut builder = self.client.post(self.provider.endpoint());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.json(&request.body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("{} API error ({}): {}", self.provider.name(), status, message);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let body: Value = response.json().await?;
        self.provider
            .parse_response(&body)
            .ok_or_else(|| ProviderError::ParseError("Response carries no translation".to_string()))
    }
}
