use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::errors::BackendError;
use crate::providers::{map_status_error, map_transport_error, Translator};

/// Client for the public Google translation endpoint
#[derive(Debug)]
pub struct GoogleTranslate {
    /// HTTP client for making requests
    client: Client,
    /// Endpoint URL
    endpoint: Url,
}

impl GoogleTranslate {
    /// Create a new client
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, BackendError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| BackendError::RequestFailed(format!("Invalid endpoint {}: {}", endpoint, e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::RequestFailed(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, endpoint })
    }

    /// Request URL with every parameter except the text itself
    pub fn request_url(&self, source_language: &str, target_language: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("client", "gtx")
            .append_pair("sl", source_language)
            .append_pair("tl", target_language)
            .append_pair("dt", "t");
        url
    }

    /// Join the translated sentence segments of a response body.
    ///
    /// The body is a nested JSON array whose first element lists
    /// `[translated, original, ...]` segments.
    pub fn parse_response(body: &str) -> Result<String, BackendError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| BackendError::ParseError(format!("Invalid JSON: {}", e)))?;

        let segments = value
            .get(0)
            .and_then(Value::as_array)
            .ok_or_else(|| BackendError::ParseError("Missing translation segments".to_string()))?;

        Ok(segments
            .iter()
            .filter_map(|segment| segment.get(0).and_then(Value::as_str))
            .collect())
    }
}

#[async_trait]
impl Translator for GoogleTranslate {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, BackendError> {
        let url = self.request_url(source_language, target_language);
        debug!("Google request: {} chars to {}", text.chars().count(), target_language);

        let response = self
            .client
            .post(url)
            .form(&[("q", text)])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;

        if !status.is_success() {
            return Err(map_status_error(status, body));
        }

        Self::parse_response(&body)
    }

    async fn test_connection(&self) -> Result<(), BackendError> {
        self.translate("Hello", "auto", "en").await.map(|_| ())
    }

    fn name(&self) -> &str {
        "Google"
    }
}
