/*!
 * Batch translation processing.
 *
 * Texts are grouped into blocks bounded by a character budget. Each block is
 * joined with a blank-line separator, sent as one request, and split back on
 * the same separator. Whatever happens to a block, the caller gets exactly
 * one string per input text: missing segments are padded with the originals
 * and a failed block keeps its originals entirely.
 */

use std::borrow::Cow;
use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;

use log::debug;

use crate::app_config::Config;
use crate::errors::BackendError;
use crate::progress::{ProgressEvent, ProgressSink};
use crate::providers::Translator;

/// Separator placed between item texts inside a block
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// Per-item overhead counted against the block budget
const SEPARATOR_OVERHEAD: usize = 2;

/// Settings for a batch translation run
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOptions {
    /// Character budget per block, separator overhead included
    pub max_block_chars: usize,
    /// Attempts per block, the first included
    pub max_attempts: u32,
    /// Backoff unit; the retry after attempt `n` waits `n` units
    pub retry_backoff: Duration,
    /// Source language code or `auto`
    pub source_language: String,
    /// Target language code
    pub target_language: String,
}

impl BatchOptions {
    /// Options taken from the application configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_block_chars: config.batch.max_block_chars,
            max_attempts: config.batch.max_attempts,
            retry_backoff: Duration::from_millis(config.batch.retry_backoff_ms),
            source_language: config.source_language.clone(),
            target_language: config.target_language.clone(),
        }
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Group texts into consecutive blocks.
///
/// Each text costs its character count plus a fixed separator overhead.
/// A block is flushed before a text that would push it past `max_chars`,
/// unless the block is still empty: an oversized text gets a block of its own.
pub fn plan_blocks<S: AsRef<str>>(texts: &[S], max_chars: usize) -> Vec<Range<usize>> {
    let mut blocks = Vec::new();
    let mut start = 0;
    let mut current_chars = 0;

    for (index, text) in texts.iter().enumerate() {
        let chars = text.as_ref().chars().count();
        if current_chars + chars > max_chars && index > start {
            blocks.push(start..index);
            start = index;
            current_chars = 0;
        }
        current_chars += chars + SEPARATOR_OVERHEAD;
    }

    if start < texts.len() {
        blocks.push(start..texts.len());
    }

    blocks
}

/// Collapse blank-line runs so a text cannot split into two segments
pub fn normalize_for_block(text: &str) -> Cow<'_, str> {
    if !text.contains(BLOCK_SEPARATOR) {
        return Cow::Borrowed(text);
    }

    let mut normalized = text.to_string();
    while normalized.contains(BLOCK_SEPARATOR) {
        normalized = normalized.replace(BLOCK_SEPARATOR, "\n");
    }
    Cow::Owned(normalized)
}

/// Split a translated block back into one string per original text.
///
/// Segments are trimmed; a blank segment falls back to its original. Missing
/// trailing segments are padded with the originals and excess ones dropped.
/// Returns the texts and the number of segments actually received.
pub fn reconcile(originals: &[String], translated: &str) -> (Vec<String>, usize) {
    let segments: Vec<&str> = translated
        .trim()
        .split(BLOCK_SEPARATOR)
        .map(str::trim)
        .collect();
    let received = segments.len();

    let texts = originals
        .iter()
        .enumerate()
        .map(|(index, original)| match segments.get(index) {
            Some(segment) if !segment.is_empty() => segment.to_string(),
            _ => original.clone(),
        })
        .collect();

    (texts, received)
}

/// Batch translator turning a list of texts into a list of translations
pub struct BatchTranslator {
    /// Backend performing the requests
    translator: Arc<dyn Translator>,
    /// Grouping and retry settings
    options: BatchOptions,
    /// Receiver of progress events
    sink: Arc<dyn ProgressSink>,
}

impl BatchTranslator {
    /// Create a new batch translator
    pub fn new(
        translator: Arc<dyn Translator>,
        options: BatchOptions,
        sink: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            translator,
            options,
            sink,
        }
    }

    /// Translate texts, returning exactly one string per input in order.
    ///
    /// Never fails: blocks that cannot be translated keep their originals.
    pub async fn translate_texts(&self, texts: &[String]) -> Vec<String> {
        if texts.is_empty() {
            return Vec::new();
        }

        let submitted: Vec<Cow<'_, str>> = texts.iter().map(|t| normalize_for_block(t)).collect();
        let blocks = plan_blocks(&submitted, self.options.max_block_chars);
        let total_blocks = blocks.len();

        self.sink.report(ProgressEvent::BlocksPlanned {
            blocks: total_blocks,
            texts: texts.len(),
        });

        let mut results = Vec::with_capacity(texts.len());
        for (index, range) in blocks.into_iter().enumerate() {
            let block = index + 1;
            let joined = submitted[range.clone()].join(BLOCK_SEPARATOR);

            self.sink.report(ProgressEvent::BlockStarted {
                block,
                items: range.len(),
                chars: joined.chars().count(),
                texts_done: range.start,
                texts_total: texts.len(),
                last: block == total_blocks,
            });

            let originals = &texts[range];
            results.extend(self.translate_block(block, originals, &joined).await);
        }

        self.sink.report(ProgressEvent::BlocksFinished { blocks: total_blocks });
        results
    }

    async fn translate_block(&self, block: usize, originals: &[String], joined: &str) -> Vec<String> {
        let translated = match self.request_with_retry(block, joined).await {
            Ok(translated) => translated,
            Err(e) => {
                self.sink.report(ProgressEvent::BlockFallback {
                    block,
                    reason: e.to_string(),
                });
                return originals.to_vec();
            }
        };

        if translated.trim().is_empty() {
            self.sink.report(ProgressEvent::BlockFallback {
                block,
                reason: "backend returned an empty translation".to_string(),
            });
            return originals.to_vec();
        }

        let (texts, received) = reconcile(originals, &translated);
        if received < originals.len() {
            self.sink.report(ProgressEvent::CountMismatch {
                expected: originals.len(),
                received,
            });
        } else if received > originals.len() {
            debug!(
                "Block {} returned {} segments for {} texts; extra segments dropped",
                block,
                received,
                originals.len()
            );
        }

        self.sink.report(ProgressEvent::BlockCompleted { block });
        texts
    }

    // Bounded loop: only network-related failures are retried, with a delay
    // growing linearly in the attempt number
    async fn request_with_retry(&self, block: usize, joined: &str) -> Result<String, BackendError> {
        let mut attempt: u32 = 1;
        loop {
            let result = self
                .translator
                .translate(joined, &self.options.source_language, &self.options.target_language)
                .await;

            match result {
                Ok(translated) => return Ok(translated),
                Err(e) if e.is_network_related() && attempt < self.options.max_attempts => {
                    let delay = self.options.retry_backoff * attempt;
                    self.sink.report(ProgressEvent::RetryScheduled {
                        block,
                        attempt,
                        delay,
                        error: e.to_string(),
                    });
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
