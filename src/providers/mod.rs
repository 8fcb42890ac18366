/*!
 * Translation backends.
 *
 * This module contains client implementations for the external services
 * that perform the actual translation:
 * - Google: public web translation endpoint (default)
 * - Ollama: local LLM server
 * - Mock: deterministic backend for tests
 */

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::BackendError;

/// Common trait for all translation backends
///
/// A backend receives one blob of text and returns its translation. It must
/// not retry on its own; retrying is decided by the batch translator.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Translate a text blob
    ///
    /// # Arguments
    /// * `text` - The text to translate
    /// * `source_language` - Source language code, or `auto` for detection
    /// * `target_language` - Target language code
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, BackendError>;

    /// Test the connection to the backend
    async fn test_connection(&self) -> Result<(), BackendError>;

    /// Display name of the backend
    fn name(&self) -> &str;
}

/// Build the backend selected in the configuration
pub fn create_translator(config: &TranslationConfig) -> Result<Arc<dyn Translator>> {
    let translator: Arc<dyn Translator> = match config.provider {
        TranslationProvider::Google => Arc::new(google::GoogleTranslate::new(
            &config.google.endpoint,
            Duration::from_secs(config.google.timeout_secs),
        )?),
        TranslationProvider::Ollama => Arc::new(ollama::Ollama::new(
            &config.ollama.endpoint,
            &config.ollama.model,
            config.ollama.temperature,
            Duration::from_secs(config.ollama.timeout_secs),
        )?),
    };
    Ok(translator)
}

/// Map a transport error from reqwest onto the backend taxonomy
pub(crate) fn map_transport_error(error: reqwest::Error) -> BackendError {
    if error.is_timeout() {
        BackendError::Timeout(error.to_string())
    } else if error.is_body() || error.is_decode() {
        BackendError::Interrupted(error.to_string())
    } else {
        BackendError::ConnectionError(error.to_string())
    }
}

/// Map a non-success HTTP status onto the backend taxonomy
pub(crate) fn map_status_error(status: reqwest::StatusCode, body: String) -> BackendError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        BackendError::RateLimitExceeded(body)
    } else {
        BackendError::ApiError {
            status_code: status.as_u16(),
            message: body,
        }
    }
}

pub mod google;
pub mod mock;
pub mod ollama;
