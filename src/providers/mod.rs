/*!
 * Provider implementations for single-string machine translation.
 *
 * Each provider knows how to shape a request for its API and how to read the
 * translated text back out of the response; sending it is left to
 * [`translator::TextTranslator`]:
 * - `google`: structured translation REST API
 * - `completion`: generic prompt-completion API (LLM servers)
 */

use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;

use crate::app_config::{ProviderConfig, TranslationProvider};

pub mod completion;
pub mod google;
pub mod translator;

pub use completion::PromptCompletion;
pub use google::GoogleTranslate;
pub use translator::TextTranslator;

/// Request shaped for a provider's API
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    /// Extra headers, in order
    pub headers: Vec<(String, String)>,
    /// JSON body
    pub body: Value,
}

/// Common trait for all translation providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably by the text translator.
pub trait Provider: Send + Sync + Debug {
    /// Lowercase provider identifier
    fn name(&self) -> &str;

    /// URL the request is posted to
    fn endpoint(&self) -> &str;

    /// Shape a translation request
    fn build_request(&self, text: &str, source_language: &str, target_language: &str) -> ProviderRequest;

    /// Extract the translated text from a response body
    ///
    /// # Returns
    /// * `Option<String>` - The translation, or `None` when the body has none
    fn parse_response(&self, body: &Value) -> Option<String>;
}

/// Build the provider selected by a provider configuration
pub fn from_config(provider: &TranslationProvider, config: &ProviderConfig) -> Arc<dyn Provider> {
    match provider {
        TranslationProvider::Google => Arc::new(GoogleTranslate::new(&config.api_key, &config.endpoint)),
        TranslationProvider::Completion => Arc::new(PromptCompletion::new(
            &config.api_key,
            &config.endpoint,
            &config.model,
        )),
    }
}
