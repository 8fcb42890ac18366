// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use datxlate::app_config::{self, Config, TranslationProvider};
use datxlate::app_controller::{Controller, RunOptions};
use datxlate::progress::{LogSink, ProgressBarSink, ProgressSink};
use datxlate::providers::create_translator;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Google,
    Ollama,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Google => TranslationProvider::Google,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for datxlate
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// datxlate - batch translator for structured data files
///
/// Finds translatable text in line-oriented .dat/.txt files and writes a
/// translated copy of each file next to it.
#[derive(Parser, Debug)]
#[command(name = "datxlate")]
#[command(version)]
#[command(about = "Batch translator for line-oriented data files")]
#[command(long_about = "datxlate scans .dat and .txt files for human-readable text (key=value values, \
colon values, semicolon-delimited cells and free-text lines), translates it in blocks and writes \
<name>_translated.<ext> copies. Numbers, paths, bracketed tokens and comment lines are left untouched.

EXAMPLES:
    datxlate                                  # Translate every .dat/.txt file in the current directory
    datxlate -p units                         # Only files whose name contains 'units'
    datxlate -s 10 -m 5                       # Skip the first 10 files, process the next 5
    datxlate -a                               # Report translatable items without translating
    datxlate -t fr --provider ollama          # Translate to French with a local Ollama model
    datxlate --check                          # Check that the backend is reachable
    datxlate completions bash > datxlate.bash # Generate bash completions

CONFIGURATION:
    Defaults apply unless --config points to a JSON file. Nothing is ever written back.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Only process files whose name contains this text
    #[arg(short, long)]
    pattern: Option<String>,

    /// Maximum number of files to process (0 means no limit)
    #[arg(short, long)]
    max_files: Option<usize>,

    /// Number of discovered files to skip
    #[arg(short, long, default_value_t = 0)]
    start_index: usize,

    /// Only analyze files, do not translate
    #[arg(short, long)]
    analyze_only: bool,

    /// Directory containing the input files
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Target language code (e.g., 'zh-CN', 'fr', 'de')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Translation backend to use
    #[arg(long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Character budget per translation request
    #[arg(long)]
    max_block_chars: Option<usize>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Check that the translation backend is reachable, then exit
    #[arg(long)]
    check: bool,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // The filter itself is adjusted later through log::set_max_level
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Marker and ANSI color for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌", "1;31"),
            Level::Warn => ("🚧", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("🔍", "1;36"),
            Level::Trace => ("📋", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (marker, color) = Self::style_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", color, now, marker, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "datxlate", &mut std::io::stdout());
        return Ok(());
    }

    run(cli).await
}

fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    if let Some(provider) = &cli.provider {
        config.translation.provider = provider.clone().into();
    }
    if let Some(target_language) = &cli.target_language {
        config.target_language = target_language.clone();
    }
    if let Some(max_block_chars) = cli.max_block_chars {
        config.batch.max_block_chars = max_block_chars;
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

async fn run(cli: CommandLineOptions) -> Result<()> {
    let config = load_config(&cli)?;
    log::set_max_level(config.log_level.into());

    let translator = create_translator(&config.translation)?;

    if cli.check {
        info!("Checking {} backend...", translator.name());
        translator
            .test_connection()
            .await
            .with_context(|| format!("{} backend is not reachable", translator.name()))?;
        info!("{} backend is reachable", translator.name());
        return Ok(());
    }

    let sink: Arc<dyn ProgressSink> = if !cli.analyze_only && std::io::stderr().is_terminal() {
        Arc::new(ProgressBarSink::new())
    } else {
        Arc::new(LogSink)
    };

    let options = RunOptions {
        dir: cli.dir,
        pattern: cli.pattern,
        max_files: cli.max_files,
        start_index: cli.start_index,
        analyze_only: cli.analyze_only,
    };

    let controller = Controller::new(config, translator, sink);

    if !options.analyze_only {
        let config = controller.config();
        info!(
            "Translating {} -> {} with {}",
            config.source_language,
            config.target_language,
            config.translation.provider.display_name()
        );
    }

    let summary = controller.run(&options).await?;
    summary.log_report(options.analyze_only);

    Ok(())
}
