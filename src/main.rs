// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand, Args};
use clap_complete::{generate, Shell};

use dualsub::app_config::{self, Config, TranslationProvider};
use dualsub::app_controller::Controller;
use dualsub::translation::DispatchMode;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Deepseek,
    Google,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Deepseek => TranslationProvider::DeepSeek,
            CliTranslationProvider::Google => TranslationProvider::Google,
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
    /// Convert SRT subtitles into bilingual ASS subtitles (default command)
    Translate(TranslateArgs),

    /// Generate shell completions for dualsub
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct TranslateArgs {
    /// Input SRT file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    #[command(flatten)]
    options: TranslateOptions,
}

#[derive(Args, Debug)]
struct TranslateOptions {
    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Output file (single file input only; defaults to the input with an .ass extension)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Translation backend to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// API key for the selected backend
    #[arg(long, env = "DUALSUB_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Number of captions sent per request
    #[arg(short, long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    batch_size: Option<usize>,

    /// Send one batch at a time
    #[arg(long)]
    sequential: bool,

    /// Source language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'zh', 'es', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// dualsub - bilingual subtitles from SRT files
///
/// Translates every caption of an SRT file and writes an ASS file that shows
/// the translation above the original line.
#[derive(Parser, Debug)]
#[command(name = "dualsub")]
#[command(version)]
#[command(about = "Bilingual subtitle generator")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "dualsub translates SRT subtitles and writes bilingual ASS subtitles.

EXAMPLES:
    dualsub movie.srt                            # Translate using default config
    dualsub -f movie.srt                         # Force overwrite existing output
    dualsub -p google -t ja movie.srt            # Use Google Translate, English to Japanese
    dualsub --batch-size 30 --sequential ep.srt  # Smaller batches, one request at a time
    dualsub -o out/movie.ass movie.srt           # Choose the output file
    dualsub --log-level debug /shows/            # Process an entire directory
    dualsub completions bash > dualsub.bash      # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

SUPPORTED BACKENDS:
    deepseek - DeepSeek chat completions API (requires an API key, DUALSUB_API_KEY)
    google   - Google Translate public endpoint (no key)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input SRT file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    #[command(flatten)]
    options: TranslateOptions,
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
        // The logger accepts everything; the max level does the filtering
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and tag for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
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
            let (colour, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", colour, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "dualsub", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => {
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            run_translate(TranslateArgs { input_path, options: cli.options }).await
        }
    }
}

/// Load the configuration file, writing a default one when it is missing
fn load_or_create_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .with_context(|| format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", config_path))
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", config_path))?;

        Ok(config)
    }
}

/// Override config values with command line options
fn apply_cli_overrides(config: &mut Config, options: &TranslateOptions) {
    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }

    if let Some(source_lang) = &options.source_language {
        config.source_language = source_lang.clone();
    }

    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    let provider_config = config.translation.active_provider_config_mut();

    if let Some(api_key) = &options.api_key {
        provider_config.api_key = api_key.clone();
    }

    if let Some(model) = &options.model {
        provider_config.model = model.clone();
    }

    if let Some(batch_size) = options.batch_size {
        provider_config.batch_size = Some(batch_size);
    }

    if options.sequential {
        provider_config.dispatch_mode = Some(DispatchMode::Sequential);
    }
}

async fn run_translate(args: TranslateArgs) -> Result<()> {
    let options = &args.options;

    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(LevelFilter::from(&level));
    }

    let mut config = load_or_create_config(&options.config_path)?;
    apply_cli_overrides(&mut config, options);

    // Log level from config, unless given on the command line
    log::set_max_level(LevelFilter::from(&config.log_level));

    let controller = Controller::with_config(config)?;

    info!(
        "dualsub: {} ({} -> {})",
        controller.config().translation.provider.display_name(),
        controller.config().source_language,
        controller.config().target_language
    );

    // First Ctrl-C cancels the translation, a second one exits
    let cancellation = controller.cancellation_token();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if cancellation.is_cancelled() {
                warn!("Interrupted again, exiting");
                std::process::exit(130);
            }
            warn!("Interrupted, cancelling translation (press Ctrl-C again to exit)");
            cancellation.cancel();
        }
    });

    controller.run_path(args.input_path, options.output.clone(), options.force_overwrite).await
}
