use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::language_utils;

/// Application configuration module
/// This module handles loading and validating configuration settings.
/// Nothing is ever written back: without `--config` the defaults apply.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Source language code, or `auto`
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO 639, optionally with a region)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Backend selection and settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Block grouping and retry settings
    #[serde(default)]
    pub batch: BatchConfig,

    /// Input discovery and output naming
    #[serde(default)]
    pub files: FilesConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation backend type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Public Google endpoint
    #[default]
    Google,
    // @provider: Ollama
    Ollama,
}

impl TranslationProvider {
    // @returns: Capitalized backend name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Google => "Google",
            Self::Ollama => "Ollama",
        }
    }

    // @returns: Lowercase backend identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Google => "google".to_string(),
            Self::Ollama => "ollama".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "ollama" => Ok(Self::Ollama),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Translation backend configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct TranslationConfig {
    /// Active backend
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Google endpoint settings
    #[serde(default)]
    pub google: GoogleConfig,

    /// Ollama settings
    #[serde(default)]
    pub ollama: OllamaConfig,
}

/// Google endpoint configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GoogleConfig {
    /// Service endpoint URL
    #[serde(default = "default_google_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            endpoint: default_google_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Ollama service configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OllamaConfig {
    /// Service endpoint URL
    #[serde(default = "default_ollama_endpoint")]
    pub endpoint: String,

    /// Model name (e.g., "llama3", "mistral")
    #[serde(default = "default_ollama_model")]
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_ollama_timeout_secs")]
    pub timeout_secs: u64,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            endpoint: default_ollama_endpoint(),
            model: default_ollama_model(),
            timeout_secs: default_ollama_timeout_secs(),
            temperature: default_temperature(),
        }
    }
}

/// Block grouping and retry configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BatchConfig {
    /// Character budget per block, separators included
    #[serde(default = "default_max_block_chars")]
    pub max_block_chars: usize,

    /// Attempts per block, the first included; only network-related
    /// failures are retried
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Backoff unit; retry `n` waits `n` times this
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_block_chars: default_max_block_chars(),
            max_attempts: default_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Input discovery and output naming configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FilesConfig {
    /// Extensions considered, in processing order
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Marker inserted before the extension of output files
    #[serde(default = "default_output_marker")]
    pub output_marker: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            output_marker: default_output_marker(),
        }
    }
}

/// Log level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    language_utils::AUTO_DETECT.to_string()
}

fn default_target_language() -> String {
    "zh-CN".to_string()
}

fn default_google_endpoint() -> String {
    "https://translate.googleapis.com/translate_a/single".to_string()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_ollama_timeout_secs() -> u64 {
    120
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_block_chars() -> usize {
    3000
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    2000
}

fn default_extensions() -> Vec<String> {
    vec!["dat".to_string(), "txt".to_string()]
}

fn default_output_marker() -> String {
    "_translated".to_string()
}

impl Config {
    /// Load a configuration file; missing fields take their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        language_utils::validate_source_language(&self.source_language)
            .with_context(|| format!("Invalid source language: {}", self.source_language))?;
        language_utils::validate_language_code(&self.target_language)
            .with_context(|| format!("Invalid target language: {}", self.target_language))?;

        if self.batch.max_block_chars == 0 {
            return Err(anyhow!("max_block_chars must be greater than zero"));
        }

        if self.batch.max_attempts == 0 {
            return Err(anyhow!("max_attempts must be at least 1"));
        }

        if self.files.extensions.is_empty() || self.files.extensions.iter().any(|e| e.trim().is_empty()) {
            return Err(anyhow!("At least one non-empty file extension is required"));
        }

        if self.files.output_marker.is_empty() {
            return Err(anyhow!("Output marker must not be empty"));
        }

        let endpoint = match self.translation.provider {
            TranslationProvider::Google => &self.translation.google.endpoint,
            TranslationProvider::Ollama => &self.translation.ollama.endpoint,
        };
        url::Url::parse(endpoint)
            .with_context(|| format!("Invalid {} endpoint: {}", self.translation.provider, endpoint))?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            translation: TranslationConfig::default(),
            batch: BatchConfig::default(),
            files: FilesConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
