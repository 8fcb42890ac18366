/*!
 * # datxlate - batch translator for structured data files
 *
 * Finds human-readable text inside line-oriented data files and writes
 * translated copies, leaving numbers, paths and markup untouched.
 *
 * ## Features
 *
 * - Heuristic field classification for `key=value`, `key: value`,
 *   `;`-delimited records and free-text lines
 * - Encoding-tolerant reading (UTF-8, UTF-16 with BOM, Windows-1252)
 * - Block batching of item texts with bounded, linear-backoff retries
 * - Translation backends:
 *   - Google public web endpoint
 *   - Ollama (local LLM)
 * - Layout-preserving rewrite to UTF-8 output files
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration loading and validation
 * - `fields`: Line classification, extraction and rewriting:
 *   - `fields::classifier`: Numeric, path and bracket heuristics
 *   - `fields::extraction`: Per-file scan producing translatable items
 *   - `fields::rewriter`: Reinsertion of translations
 * - `translation`: Block batching and retry policy
 * - `providers`: Translation backend clients
 * - `progress`: Injectable progress and diagnostics sinks
 * - `file_utils`: File discovery, decoding and output naming
 * - `app_controller`: Batch driver over a directory
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod fields;
pub mod file_utils;
pub mod language_utils;
pub mod progress;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunOptions, RunSummary};
pub use errors::{AppError, BackendError, FileError};
pub use fields::{ItemKind, TranslatableItem, TranslationUpdate};
pub use providers::Translator;
pub use translation::BatchTranslator;
