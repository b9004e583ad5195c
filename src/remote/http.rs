use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::app_config::ApiConfig;
use crate::errors::ProviderError;

use super::{
    CueTranslationRequest, CueTranslationResponse, CueTranslationSource, DictPayload,
    DictionaryQuery, DictionarySource, RawCue, SubtitleQuery, SubtitleSource, SubtitlesResponse,
};

/// HTTP client for the player backend API
#[derive(Debug, Clone)]
pub struct HttpBackend {
    /// HTTP client for API requests
    client: Client,
    /// Base URL, e.g. `http://localhost:8080/api`
    base_url: Url,
}

impl HttpBackend {
    /// Create a backend for `base_url` with a request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ProviderError> {
        // A trailing slash keeps `join` from dropping the last path segment
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid base URL '{}': {}", base_url, e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ProviderError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of the subtitle list of a video
    pub fn subtitles_url(&self, video_id: &str) -> Result<Url, ProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::RequestFailed(format!("Base URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["videos", video_id, "subtitles"]);
        Ok(url)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ProviderError> {
        self.base_url
            .join(path)
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid endpoint '{}': {}", path, e)))
    }

    // Turn a non-success status into an error, logging the body
    async fn check_status(response: Response) -> Result<Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to get error response text".to_string());
        error!("Backend API error ({}): {}", status, message);
        Err(ProviderError::ApiError {
            status_code: status.as_u16(),
            message,
        })
    }
}

/// Extract the cue array of a subtitle response body
pub fn parse_subtitles_body(body: Value) -> Result<Vec<RawCue>, ProviderError> {
    let object = match body {
        Value::Object(object) => object,
        other => {
            return Err(ProviderError::ParseError(format!("Expected a JSON object, got {}", other)));
        }
    };

    match object.get("cues") {
        Some(Value::Array(_)) => {}
        Some(other) => {
            return Err(ProviderError::ParseError(format!(
                "Expected 'cues' to be an array, got {}",
                other
            )));
        }
        None => return Err(ProviderError::ParseError("Response has no 'cues' field".to_string())),
    }

    let response: SubtitlesResponse = serde_json::from_value(Value::Object(object))?;
    Ok(response.cues)
}

#[async_trait]
impl SubtitleSource for HttpBackend {
    async fn fetch_cues(&self, query: &SubtitleQuery) -> Result<Vec<RawCue>, ProviderError> {
        let url = self.subtitles_url(&query.video_id)?;
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .query(&[
                ("lang", query.source_lang.as_str()),
                ("target", query.target_lang.as_str()),
                ("format", query.format.as_str()),
            ])
            .send()
            .await?;

        let body: Value = Self::check_status(response).await?.json().await?;
        parse_subtitles_body(body)
    }
}

#[async_trait]
impl CueTranslationSource for HttpBackend {
    async fn translate_cues(
        &self,
        request: &CueTranslationRequest,
    ) -> Result<CueTranslationResponse, ProviderError> {
        let url = self.endpoint("translate/cues")?;
        debug!("POST {} ({} cues)", url, request.cues.len());

        let response = self.client.post(url).json(request).send().await?;
        let body = Self::check_status(response).await?.json::<CueTranslationResponse>().await?;
        Ok(body)
    }
}

#[async_trait]
impl DictionarySource for HttpBackend {
    async fn lookup(&self, query: &DictionaryQuery) -> Result<DictPayload, ProviderError> {
        let url = self.endpoint("dict")?;
        debug!("GET {} term='{}'", url, query.term);

        let response = self.client.get(url).query(query).send().await?;
        let body = Self::check_status(response).await?.json::<DictPayload>().await?;
        Ok(body)
    }
}
