use serde_json::{json, Value};

use super::{Provider, ProviderRequest};

const DEFAULT_ENDPOINT: &str = "https://translation.googleapis.com/language/translate/v2";

/// Google Cloud Translation (v2 REST) provider
#[derive(Debug, Clone)]
pub struct GoogleTranslate {
    /// API key sent as `x-goog-api-key`
    api_key: String,
    /// API endpoint URL
    endpoint: String,
}

impl GoogleTranslate {
    /// Create a new provider; an empty endpoint selects the public API
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        Self {
            api_key: api_key.into(),
            endpoint: if endpoint.is_empty() {
                DEFAULT_ENDPOINT.to_string()
            } else {
                endpoint
            },
        }
    }
}

impl Provider for GoogleTranslate {
    fn name(&self) -> &str {
        "google"
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_request(&self, text: &str, source_language: &str, target_language: &str) -> ProviderRequest {
        let target = if target_language.is_empty() { "en" } else { target_language };
        let mut body = json!({
            "q": text,
            "target": target,
            "format": "text",
        });

        // Omitting the source lets the API detect it
        if !source_language.is_empty() && source_language != "auto" {
            body["source"] = Value::String(source_language.to_string());
        }

        ProviderRequest {
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("x-goog-api-key".to_string(), self.api_key.clone()),
            ],
            body,
        }
    }

    fn parse_response(&self, body: &Value) -> Option<String> {
        body.pointer("/data/translations/0/translatedText")
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    }
}
