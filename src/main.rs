// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use futures::future::join_all;
use log::{info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use lingocue::app_config::{self, Config, TranslationProvider};
use lingocue::{get_language_name, Cue, LoadOutcome, MockBackend, Origin, PlayerSession, TextTranslator};

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Google,
    Completion,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Google => TranslationProvider::Google,
            CliTranslationProvider::Completion => TranslationProvider::Completion,
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
    /// Print the cues of a video
    Cues {
        /// Video identifier
        video_id: String,

        /// Also fetch translations for cues lacking one
        #[arg(short, long)]
        backfill: bool,
    },

    /// Print the active cue at each playback time (seconds)
    Active {
        /// Video identifier
        video_id: String,

        /// Playback times in seconds
        #[arg(required = true, num_args = 1..)]
        times: Vec<f64>,
    },

    /// Look up a word in the dictionary
    Lookup {
        /// Word to look up
        term: String,
    },

    /// Translate text through the configured provider
    Translate {
        /// Texts to translate
        #[arg(required = true, num_args = 1..)]
        texts: Vec<String>,

        /// Translation provider to use
        #[arg(short, long, value_enum)]
        provider: Option<CliTranslationProvider>,
    },

    /// Generate shell completions for lingocue
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// LingoCue - bilingual subtitles for language learners
///
/// Fetches timed subtitle cues, backfills their translations and looks up
/// clicked words, the way the interactive player does.
#[derive(Parser, Debug)]
#[command(name = "lingocue")]
#[command(version)]
#[command(about = "Bilingual subtitle and dictionary tool for language learners")]
#[command(long_about = "LingoCue fetches timed subtitle cues, backfills missing translations and looks up words.

EXAMPLES:
    lingocue cues intro-01                      # Print the cues of a video
    lingocue cues -b intro-01                   # Fill in missing translations first
    lingocue active intro-01 0.5 2.0 4.3        # Active cue at each time
    lingocue lookup morning                     # Dictionary entry of a word
    lingocue translate -p google \"Hello\"        # Translate one string
    lingocue --offline cues demo                # Use built-in demo data
    lingocue completions bash > lingocue.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    /// Source language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long, global = true)]
    source_language: Option<String>,

    /// Target language code (e.g., 'zh', 'es', 'fr')
    #[arg(short, long, global = true)]
    target_language: Option<String>,

    /// Serve data from the built-in demo backend instead of the network
    #[arg(long, global = true)]
    offline: bool,
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

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
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
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::get_color_for_level(record.level()),
                now,
                Self::get_emoji_for_level(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts every level; the effective level is set once the config is loaded
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "lingocue", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;
    log::set_max_level(config.log_level.to_level_filter());

    match cli.command {
        Commands::Cues { video_id, backfill } => run_cues(&config, cli.offline, &video_id, backfill).await,
        Commands::Active { video_id, times } => run_active(&config, cli.offline, &video_id, &times).await,
        Commands::Lookup { term } => run_lookup(&config, cli.offline, &term).await,
        Commands::Translate { texts, provider } => run_translate(config, texts, provider).await,
        Commands::Completions { .. } => Ok(()),
    }
}

// Load or create the configuration and apply command line overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_create(&cli.config)?;

    if let Some(source_lang) = &cli.source_language {
        config.source_language = source_lang.clone();
    }

    if let Some(target_lang) = &cli.target_language {
        config.target_language = target_lang.clone();
    }

    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    Ok(config)
}

fn build_session(config: &Config, offline: bool) -> Result<PlayerSession> {
    if offline {
        info!("Offline mode: serving built-in demo data");
        return Ok(PlayerSession::new(Arc::new(MockBackend::demo()), config));
    }

    PlayerSession::from_config(config).context("Failed to create HTTP backend")
}

// English name of a language code, or the code itself when unknown
fn language_label(code: &str) -> String {
    get_language_name(code).unwrap_or_else(|_| code.to_string())
}

async fn load_video(session: &PlayerSession, config: &Config, video_id: &str) -> Result<()> {
    config.validate().context("Configuration validation failed")?;
    info!(
        "Loading '{}' ({} to {})",
        video_id,
        language_label(&config.source_language),
        language_label(&config.target_language)
    );

    match session
        .load(video_id, &config.source_language, &config.target_language)
        .await
    {
        LoadOutcome::Installed { origin: Origin::Fallback, .. } => {
            log::warn!("Subtitles of '{}' are unavailable, showing placeholder cues", video_id);
        }
        LoadOutcome::Installed { cues, .. } => info!("Loaded {} cues", cues),
        LoadOutcome::Stale | LoadOutcome::Empty => {}
    }

    Ok(())
}

fn print_cue(position: usize, cue: &Cue) {
    println!(
        "#{:<3} [{:>8.3} - {:>8.3}] {}",
        position,
        cue.start_seconds(),
        cue.end_seconds(),
        cue.source_text
    );
    if cue.has_translation() {
        println!("{:>29}{}", "", cue.translation);
    }
}

async fn run_cues(config: &Config, offline: bool, video_id: &str, backfill: bool) -> Result<()> {
    let session = build_session(config, offline)?;
    load_video(&session, config, video_id).await?;

    if backfill {
        session.backfill().await;
    }

    for (position, cue) in session.cues().iter().enumerate() {
        print_cue(position, cue);
    }

    Ok(())
}

async fn run_active(config: &Config, offline: bool, video_id: &str, times: &[f64]) -> Result<()> {
    let session = build_session(config, offline)?;
    load_video(&session, config, video_id).await?;

    let cues = session.cues();
    for &time in times {
        session.tick(time);
        match session.active_index().and_then(|index| cues.get(index).map(|cue| (index, cue))) {
            Some((index, cue)) => {
                print!("{:>8.3}s  ", time);
                print_cue(index, cue);
            }
            None => println!("{:>8.3}s  (no active cue)", time),
        }
    }

    Ok(())
}

async fn run_lookup(config: &Config, offline: bool, term: &str) -> Result<()> {
    let session = build_session(config, offline)?;

    let Some(entry) = session.lookup(term).await else {
        anyhow::bail!("Nothing to look up: the term is empty");
    };

    println!("{} {}", entry.term, entry.phonetic);
    for pos in &entry.parts_of_speech {
        println!("  {} {}", pos.kind, pos.meaning);
    }
    for example in &entry.examples {
        println!("  > {}", example.source);
        println!("    {}", example.target);
    }
    if let Some(message) = &entry.message {
        println!("  ({})", message);
    }

    Ok(())
}

async fn run_translate(mut config: Config, texts: Vec<String>, provider: Option<CliTranslationProvider>) -> Result<()> {
    if let Some(provider) = provider {
        config.translation.provider = provider.into();
    }
    config.validate().context("Configuration validation failed")?;
    config
        .validate_provider()
        .context("Translation provider is not usable")?;

    let translator = TextTranslator::from_config(&config.translation);
    info!(
        "Translating {} to {} with {}",
        language_label(&config.source_language),
        language_label(&config.target_language),
        config.translation.provider.display_name()
    );

    let results = join_all(
        texts
            .iter()
            .map(|text| translator.translate(text, &config.source_language, &config.target_language)),
    )
    .await;

    for result in results {
        println!("{}", result.value);
    }

    Ok(())
}
