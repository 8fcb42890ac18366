use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::BackendError;
use crate::language_utils;
use crate::providers::{map_status_error, map_transport_error, Translator};

/// Ollama client for translating through a local model
#[derive(Debug)]
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: Url,
    /// Model name to use for generation
    model: String,
    /// Sampling temperature
    temperature: f32,
    /// HTTP client for making requests
    client: Client,
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// System message to guide the model
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    stream: bool,
}

/// Generation options for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Generation response from the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Model name
    #[serde(default)]
    pub model: String,
    /// Generated text
    pub response: String,
    /// Whether the generation is complete
    #[serde(default)]
    pub done: bool,
}

impl GenerationRequest {
    /// Create a new non-streaming generation request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            options: None,
            stream: false,
        }
    }

    /// Set the system prompt
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options = Some(GenerationOptions {
            temperature: Some(temperature),
        });
        self
    }
}

impl Ollama {
    /// Create a new Ollama client for the given base URL
    pub fn new(
        endpoint: &str,
        model: &str,
        temperature: f32,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let base_url = Url::parse(endpoint)
            .map_err(|e| BackendError::RequestFailed(format!("Invalid endpoint {}: {}", endpoint, e)))?;

        let client = Client::builder()
            .timeout(timeout)
            // Ollama speaks HTTP/1.1
            .http1_only()
            .build()
            .map_err(|e| BackendError::RequestFailed(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            model: model.to_string(),
            temperature,
            client,
        })
    }

    /// System prompt telling the model to keep the block layout intact
    pub fn system_prompt(source_language: &str, target_language: &str) -> String {
        let source = if source_language.eq_ignore_ascii_case("auto") {
            "the source language".to_string()
        } else {
            language_utils::get_language_name(source_language)
                .unwrap_or_else(|_| source_language.to_string())
        };
        let target = language_utils::get_language_name(target_language)
            .unwrap_or_else(|_| target_language.to_string());

        format!(
            "You are a translator. Translate the user's text from {} to {}. \
             The text consists of segments separated by blank lines. \
             Keep every blank line separator and the number of segments unchanged. \
             Reply with the translation only.",
            source, target
        )
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base_url
            .join(path)
            .map_err(|e| BackendError::RequestFailed(format!("Invalid request URL: {}", e)))
    }

    /// Send a generation request and return the generated text
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, BackendError> {
        let url = self.endpoint("api/generate")?;

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;

        if !status.is_success() {
            error!("Ollama API error ({}): {}", status, body);
            return Err(map_status_error(status, body));
        }

        Self::parse_response(&body)
    }

    /// Parse a generate response, tolerating a streamed JSON-lines body
    pub fn parse_response(body: &str) -> Result<GenerationResponse, BackendError> {
        if let Ok(response) = serde_json::from_str::<GenerationResponse>(body) {
            return Ok(response);
        }

        let mut text = String::new();
        let mut model = String::new();
        let mut parsed_any = false;
        for line in body.lines().filter(|line| !line.trim().is_empty()) {
            let chunk: GenerationResponse = serde_json::from_str(line).map_err(|e| {
                BackendError::ParseError(format!("Invalid Ollama response line: {}", e))
            })?;
            text.push_str(&chunk.response);
            model = chunk.model;
            parsed_any = true;
        }

        if !parsed_any {
            return Err(BackendError::ParseError("Empty Ollama response".to_string()));
        }

        Ok(GenerationResponse {
            model,
            response: text,
            done: true,
        })
    }
}

#[async_trait]
impl Translator for Ollama {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, BackendError> {
        debug!("Ollama request to model {}: {} chars", self.model, text.chars().count());

        let request = GenerationRequest::new(&self.model, text)
            .system(Self::system_prompt(source_language, target_language))
            .temperature(self.temperature);

        let response = self.generate(&request).await?;
        Ok(response.response)
    }

    async fn test_connection(&self) -> Result<(), BackendError> {
        let url = self.endpoint("api/tags")?;
        let response = self.client.get(url).send().await.map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(map_status_error(status, body))
        }
    }

    fn name(&self) -> &str {
        "Ollama"
    }
}
