// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use aegichanges::app_config::{self, Config, OutputFormat};
use aegichanges::app_controller::Controller;

/// CLI Wrapper for OutputFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliOutputFormat {
    Text,
    Diff,
    Html,
    Ansi,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(cli_format: CliOutputFormat) -> Self {
        match cli_format {
            CliOutputFormat::Text => OutputFormat::Text,
            CliOutputFormat::Diff => OutputFormat::Diff,
            CliOutputFormat::Html => OutputFormat::Html,
            CliOutputFormat::Ansi => OutputFormat::Ansi,
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
    /// Compare the events of two subtitle scripts (default command)
    Compare(CompareArgs),

    /// Generate shell completions for aegichanges
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct CompareArgs {
    /// Old (reference) .ass script
    #[arg(value_name = "OLD_FILE")]
    old_file: PathBuf,

    /// New (revised) .ass script
    #[arg(value_name = "NEW_FILE")]
    new_file: PathBuf,

    /// Write the report to this file or directory instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'F', long, value_enum)]
    format: Option<CliOutputFormat>,

    /// Force overwrite of an existing report
    #[arg(short, long)]
    force_overwrite: bool,

    /// Exit with status 1 when the scripts differ
    #[arg(long)]
    exit_code: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// AegiChanges - line-level changes between two subtitle scripts
///
/// Extracts the [Events] section of two Advanced SubStation Alpha scripts and
/// shows which dialogue and comment lines were removed, added or edited.
#[derive(Parser, Debug)]
#[command(name = "aegichanges")]
#[command(version)]
#[command(about = "Show changes between the events of two .ass subtitle scripts")]
#[command(long_about = "AegiChanges compares the [Events] sections of two .ass subtitle scripts.

Only the event type, start and end times and text are compared; style, actor,
margins and effect are ignored. Rows styled 'TLmode' are skipped.

EXAMPLES:
    aegichanges old.ass new.ass                      # Coloured diff on the terminal
    aegichanges -F html -o report.html old.ass new.ass
    aegichanges -F diff -o reports/ old.ass new.ass  # Writes reports/old.vs.new.diff
    aegichanges --exit-code old.ass new.ass          # Exit status 1 when they differ
    aegichanges completions bash > aegichanges.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Old (reference) .ass script
    #[arg(value_name = "OLD_FILE")]
    old_file: Option<PathBuf>,

    /// New (revised) .ass script
    #[arg(value_name = "NEW_FILE")]
    new_file: Option<PathBuf>,

    /// Write the report to this file or directory instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'F', long, value_enum)]
    format: Option<CliOutputFormat>,

    /// Force overwrite of an existing report
    #[arg(short, long)]
    force_overwrite: bool,

    /// Exit with status 1 when the scripts differ
    #[arg(long)]
    exit_code: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
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
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour code and tag for log level
    fn get_style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
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
            let (color, tag) = Self::get_style_for_level(record.level());

            // Logs go to stderr so reports on stdout stay clean
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, tag, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; the max level is lowered once the
    // config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    let differs = match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "aegichanges", &mut std::io::stdout());
            return Ok(());
        }
        Some(Commands::Compare(args)) => run_compare(args).await?,
        None => {
            // Default behavior - use top-level args
            let (old_file, new_file) = match (cli.old_file, cli.new_file) {
                (Some(old_file), Some(new_file)) => (old_file, new_file),
                _ => {
                    return Err(anyhow!(
                        "OLD_FILE and NEW_FILE are required when no subcommand is specified"
                    ))
                }
            };

            let compare_args = CompareArgs {
                old_file,
                new_file,
                output: cli.output,
                format: cli.format,
                force_overwrite: cli.force_overwrite,
                exit_code: cli.exit_code,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_compare(compare_args).await?
        }
    };

    if differs {
        std::process::exit(1);
    }

    Ok(())
}

// @returns: Whether the caller asked for --exit-code and the scripts differ
async fn run_compare(options: CompareArgs) -> Result<bool> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    let mut config = load_or_create_config(&options.config_path)?;

    // Update log level in config if specified via command line
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    let format: OutputFormat = options
        .format
        .clone()
        .map(Into::into)
        .unwrap_or(config.output.format);

    // Colours written to a file were asked for explicitly
    if format == OutputFormat::Ansi && options.output.is_some() {
        colored::control::set_override(true);
    }

    let controller = Controller::with_config(config)?;
    let summary = controller
        .run(
            options.old_file,
            options.new_file,
            options.output,
            format,
            options.force_overwrite,
        )
        .await?;

    Ok(options.exit_code && summary.is_some_and(|s| s.has_changes()))
}

// @loads: Config from JSON, writing the default config when the file is missing
fn load_or_create_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        Ok(config)
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();

        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        Ok(config)
    }
}
