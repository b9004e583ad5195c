use serde_json::{json, Value};

use super::{Provider, ProviderRequest};

const DEFAULT_ENDPOINT: &str = "http://localhost:1234/v1/completions";

/// Generic prompt-completion provider (OpenAI-compatible or custom LLM servers)
#[derive(Debug, Clone)]
pub struct PromptCompletion {
    /// Bearer token; no `Authorization` header when empty
    api_key: String,
    /// API endpoint URL
    endpoint: String,
    /// Model name
    model: String,
}

impl PromptCompletion {
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        Self {
            api_key: api_key.into(),
            endpoint: if endpoint.is_empty() {
                DEFAULT_ENDPOINT.to_string()
            } else {
                endpoint
            },
            model: model.into(),
        }
    }

    /// Prompt sent for one text
    pub fn prompt(text: &str, target_language: &str) -> String {
        let target = if target_language.is_empty() { "en" } else { target_language };
        format!("Translate to {}: {}", target, text)
    }
}

impl Provider for PromptCompletion {
    fn name(&self) -> &str {
        "completion"
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_request(&self, text: &str, _source_language: &str, target_language: &str) -> ProviderRequest {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if !self.api_key.is_empty() {
            headers.push(("Authorization".to_string(), format!("Bearer {}", self.api_key)));
        }

        ProviderRequest {
            headers,
            body: json!({
                "prompt": Self::prompt(text, target_language),
                "model": self.model,
                "stream": false,
            }),
        }
    }

    fn parse_response(&self, body: &Value) -> Option<String> {
        [
            "/choices/0/message/content",
            "/choices/0/text",
            "/translation",
            "/translated_text",
        ]
        .iter()
        .filter_map(|pointer| body.pointer(pointer).and_then(Value::as_str))
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
    }
}
