/*!
 * Progress and diagnostics reporting.
 *
 * The core logic never writes to a console directly. It emits
 * `ProgressEvent`s into a `ProgressSink`, which the caller chooses:
 * - `LogSink`: forwards events to the `log` macros
 * - `CollectingSink`: records events in memory, mostly for tests
 * - `ProgressBarSink`: drives an `indicatif` bar over translation blocks
 */

use std::path::PathBuf;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use parking_lot::Mutex;

/// Something worth reporting while scanning or translating
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// Texts were grouped into blocks and translation is starting
    BlocksPlanned { blocks: usize, texts: usize },
    /// A block is about to be submitted
    BlockStarted {
        block: usize,
        items: usize,
        chars: usize,
        texts_done: usize,
        texts_total: usize,
        last: bool,
    },
    /// A block came back translated
    BlockCompleted { block: usize },
    /// A transient failure will be retried after a delay
    RetryScheduled {
        block: usize,
        attempt: u32,
        delay: Duration,
        error: String,
    },
    /// A block fell back to its original texts
    BlockFallback { block: usize, reason: String },
    /// Fewer translations came back than were requested
    CountMismatch { expected: usize, received: usize },
    /// All blocks of one translation run are done
    BlocksFinished { blocks: usize },
    /// A file could not be decoded and is skipped
    FileUnreadable { path: PathBuf, reason: String },
    /// A file was scanned
    FileAnalyzed { path: PathBuf, items: usize },
    /// A file is about to be translated
    FileStarted { path: PathBuf, items: usize },
    /// A translated copy was written
    FileWritten { path: PathBuf, items: usize },
    /// Processing a file failed; the run continues
    FileFailed { path: PathBuf, error: String },
}

/// Receiver of progress events
pub trait ProgressSink: Send + Sync {
    /// Handle one event
    fn report(&self, event: ProgressEvent);
}

/// Sink that writes events through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::BlocksPlanned { blocks, texts } => {
                debug!("Grouped {} texts into {} blocks", texts, blocks)
            }
            ProgressEvent::BlockStarted { block, items, chars, texts_done, texts_total, last } => {
                if last {
                    info!("Translating block {} ({} texts, {} chars) - last block", block, items, chars);
                } else {
                    let percent = if texts_total == 0 {
                        0.0
                    } else {
                        texts_done as f64 / texts_total as f64 * 100.0
                    };
                    info!(
                        "Translating block {} ({} texts, {} chars) - progress: {:.1}%",
                        block, items, chars, percent
                    );
                }
            }
            ProgressEvent::BlockCompleted { block } => info!("Block {} translated", block),
            ProgressEvent::RetryScheduled { block, attempt, delay, error } => warn!(
                "Block {} network error, retry {} in {:?}: {}",
                block, attempt, delay, error
            ),
            ProgressEvent::BlockFallback { block, reason } => {
                error!("Block {} kept original text: {}", block, reason)
            }
            ProgressEvent::CountMismatch { expected, received } => warn!(
                "Translation count mismatch: expected {}, got {}; padding with original text",
                expected, received
            ),
            ProgressEvent::BlocksFinished { blocks } => {
                if blocks > 0 {
                    info!("All {} blocks translated", blocks);
                }
            }
            ProgressEvent::FileUnreadable { path, reason } => {
                warn!("Cannot read {:?}, skipping: {}", path, reason)
            }
            ProgressEvent::FileAnalyzed { path, items } => {
                debug!("Scanned {:?}: {} translatable items", path, items)
            }
            ProgressEvent::FileStarted { path, items } => {
                info!("Translating {:?} ({} items)", path, items)
            }
            ProgressEvent::FileWritten { path, items } => {
                info!("Wrote {:?} ({} translated items)", path, items)
            }
            ProgressEvent::FileFailed { path, error } => {
                error!("Failed to process {:?}: {}", path, error)
            }
        }
    }
}

/// Sink that keeps every event, in order
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().clone()
    }

    /// Delays of every scheduled retry
    pub fn retry_delays(&self) -> Vec<Duration> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                ProgressEvent::RetryScheduled { delay, .. } => Some(*delay),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for CollectingSink {
    fn report(&self, event: ProgressEvent) {
        self.events.lock().push(event);
    }
}

/// Sink showing a progress bar over blocks, logging everything else above it
pub struct ProgressBarSink {
    bar: Mutex<Option<ProgressBar>>,
    inner: LogSink,
}

impl ProgressBarSink {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
            inner: LogSink,
        }
    }

    fn new_bar(blocks: usize) -> ProgressBar {
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} blocks ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░");
        let bar = ProgressBar::new(blocks as u64);
        bar.set_style(style);
        bar.set_message("Translating");
        bar
    }

    /// True while a translation run is being tracked
    pub fn is_active(&self) -> bool {
        self.bar.lock().is_some()
    }
}

impl Default for ProgressBarSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for ProgressBarSink {
    fn report(&self, event: ProgressEvent) {
        match &event {
            ProgressEvent::BlocksPlanned { blocks, .. } => {
                *self.bar.lock() = Some(Self::new_bar(*blocks));
            }
            ProgressEvent::BlockCompleted { .. } | ProgressEvent::BlockFallback { .. } => {
                if let Some(bar) = self.bar.lock().as_ref() {
                    bar.inc(1);
                }
            }
            ProgressEvent::BlocksFinished { .. } => {
                if let Some(bar) = self.bar.lock().take() {
                    bar.finish_and_clear();
                }
            }
            _ => {}
        }

        // Block chatter is what the bar already shows
        if matches!(
            event,
            ProgressEvent::BlockStarted { .. } | ProgressEvent::BlockCompleted { .. }
        ) {
            debug!("{:?}", event);
            return;
        }

        let bar = self.bar.lock().clone();
        match bar {
            Some(bar) => bar.suspend(|| self.inner.report(event)),
            None => self.inner.report(event),
        }
    }
}
