use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};

use crate::app_config::Config;
use crate::errors::{AppError, FileError};
use crate::fields::{
    apply_updates, extract_translatable_content, FileExtraction, TranslatableItem,
    TranslationUpdate,
};
use crate::file_utils::{FileManager, TextEncoding};
use crate::progress::{ProgressEvent, ProgressSink};
use crate::providers::Translator;
use crate::translation::{BatchOptions, BatchTranslator};

// @module: Batch driver over a directory of data files

/// Which files to process and how
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Directory searched for input files
    pub dir: PathBuf,
    /// Substring the file stem must contain
    pub pattern: Option<String>,
    /// Cap on the number of files; `None` or 0 means no cap
    pub max_files: Option<usize>,
    /// Number of discovered files skipped from the front
    pub start_index: usize,
    /// Scan and report only, never translate or write
    pub analyze_only: bool,
}

/// Scan result for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAnalysis {
    /// Input file
    pub path: PathBuf,
    /// Number of translatable items
    pub items: usize,
    /// Encoding the file was read with, `None` when unreadable
    pub encoding: Option<TextEncoding>,
}

/// Outcome of a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Every file considered, in processing order
    pub files: Vec<FileAnalysis>,
    /// Output files written
    pub written: Vec<PathBuf>,
    /// Files whose processing failed
    pub failed: Vec<PathBuf>,
}

impl RunSummary {
    /// Files with at least one translatable item
    pub fn files_with_content(&self) -> impl Iterator<Item = &FileAnalysis> {
        self.files.iter().filter(|f| f.items > 0)
    }

    /// Files without translatable items, unreadable ones included
    pub fn files_without_content(&self) -> impl Iterator<Item = &FileAnalysis> {
        self.files.iter().filter(|f| f.items == 0)
    }

    /// Items across all files
    pub fn total_items(&self) -> usize {
        self.files.iter().map(|f| f.items).sum()
    }

    /// Log the report shown at the end of a run
    pub fn log_report(&self, analyze_only: bool) {
        let with_content: Vec<_> = self.files_with_content().collect();
        let without_content: Vec<_> = self.files_without_content().collect();

        info!("Files with translatable content: {}", with_content.len());
        for file in &with_content {
            info!("  {:?}: {} items", file.path, file.items);
        }

        if !without_content.is_empty() {
            info!("Files without translatable content: {}", without_content.len());
            for file in &without_content {
                info!("  {:?}", file.path);
            }
        }

        info!("Total translatable items: {}", self.total_items());

        if !analyze_only {
            info!(
                "Translated {} file(s), {} failed",
                self.written.len(),
                self.failed.len()
            );
        }
    }
}

/// Main application controller for batch file translation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Block translator wrapping the backend
    batch: BatchTranslator,
    // @field: Progress receiver
    sink: Arc<dyn ProgressSink>,
}

impl Controller {
    // @method: Create a new controller with the given configuration and backend
    pub fn new(config: Config, translator: Arc<dyn Translator>, sink: Arc<dyn ProgressSink>) -> Self {
        let batch = BatchTranslator::new(translator, BatchOptions::from_config(&config), Arc::clone(&sink));
        Self { config, batch, sink }
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Discover input files and apply the start index and file cap
    pub fn discover_files(&self, options: &RunOptions) -> Result<Vec<PathBuf>, AppError> {
        if !FileManager::dir_exists(&options.dir) {
            return Err(AppError::NoInputFiles(options.dir.clone()));
        }

        let files = FileManager::find_input_files(
            &options.dir,
            &self.config.files.extensions,
            options.pattern.as_deref(),
            &self.config.files.output_marker,
        )?;
        debug!("Discovered {} candidate file(s) in {:?}", files.len(), options.dir);

        let cap = options.max_files.filter(|&n| n > 0).unwrap_or(usize::MAX);
        let selected: Vec<PathBuf> = files.into_iter().skip(options.start_index).take(cap).collect();

        if selected.is_empty() {
            return Err(AppError::NoInputFiles(options.dir.clone()));
        }

        Ok(selected)
    }

    /// Scan files without translating anything
    pub fn analyze(&self, options: &RunOptions) -> Result<RunSummary, AppError> {
        let files = self.discover_files(options)?;
        let mut summary = RunSummary::default();

        for path in files {
            let (analysis, _) = self.scan_file(&path);
            summary.files.push(analysis);
        }

        Ok(summary)
    }

    /// Process every selected file: scan, translate, and write outputs.
    ///
    /// With `analyze_only` set this is the same as [`Controller::analyze`].
    /// A failing file is reported and skipped; only an empty selection fails
    /// the whole run.
    pub async fn run(&self, options: &RunOptions) -> Result<RunSummary, AppError> {
        if options.analyze_only {
            return self.analyze(options);
        }

        let files = self.discover_files(options)?;
        let mut summary = RunSummary::default();

        for path in files {
            let (analysis, extraction) = self.scan_file(&path);
            summary.files.push(analysis);

            let Some(extraction) = extraction.filter(|e| !e.items.is_empty()) else {
                continue;
            };

            match self.process_file(&extraction).await {
                Ok(output) => summary.written.push(output),
                Err(e) => {
                    self.sink.report(ProgressEvent::FileFailed {
                        path: path.clone(),
                        error: e.to_string(),
                    });
                    summary.failed.push(path);
                }
            }
        }

        Ok(summary)
    }

    // Unreadable files count as having no items
    fn scan_file(&self, path: &Path) -> (FileAnalysis, Option<FileExtraction>) {
        match extract_translatable_content(path, self.sink.as_ref()) {
            Ok(extraction) => {
                self.sink.report(ProgressEvent::FileAnalyzed {
                    path: path.to_path_buf(),
                    items: extraction.items.len(),
                });
                log_kind_counts(path, &extraction.items);
                let analysis = FileAnalysis {
                    path: path.to_path_buf(),
                    items: extraction.items.len(),
                    encoding: Some(extraction.file.encoding),
                };
                (analysis, Some(extraction))
            }
            Err(_) => {
                let analysis = FileAnalysis {
                    path: path.to_path_buf(),
                    items: 0,
                    encoding: None,
                };
                (analysis, None)
            }
        }
    }

    /// Translate one scanned file and write its output, returning the output path
    pub async fn process_file(&self, extraction: &FileExtraction) -> Result<PathBuf, FileError> {
        let path = &extraction.file.path;
        let items = &extraction.items;

        self.sink.report(ProgressEvent::FileStarted {
            path: path.clone(),
            items: items.len(),
        });

        let values: Vec<String> = items.iter().map(|item| item.value.clone()).collect();
        let mut translated = self.batch.translate_texts(&values).await;

        let received = translated.len();
        if received != values.len() {
            self.sink.report(ProgressEvent::CountMismatch {
                expected: values.len(),
                received,
            });
            translated.truncate(values.len());
            let kept = translated.len();
            translated.extend(values[kept..].iter().cloned());
        }

        let updates: Vec<TranslationUpdate> = items
            .iter()
            .zip(translated)
            .map(|(item, value)| TranslationUpdate::from_item(item, value))
            .collect();

        let lines = apply_updates(&extraction.file.lines, &updates)?;
        let output = FileManager::generate_output_path(path, &self.config.files.output_marker);
        FileManager::write_lines(&output, &lines)?;

        self.sink.report(ProgressEvent::FileWritten {
            path: output.clone(),
            items: items.len(),
        });

        Ok(output)
    }
}

fn log_kind_counts(path: &Path, items: &[TranslatableItem]) {
    if items.is_empty() || !log::log_enabled!(log::Level::Debug) {
        return;
    }

    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for item in items {
        *counts.entry(item.kind.label()).or_default() += 1;
    }

    let breakdown: Vec<String> = counts
        .iter()
        .map(|(label, count)| format!("{}={}", label, count))
        .collect();
    debug!("{:?} item kinds: {}", path, breakdown.join(", "));
}
