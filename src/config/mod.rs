//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::num::{NonZeroU32, NonZeroU64, NonZeroUsize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "vetrina";
const ENV_PREFIX: &str = "VETRINA";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 8;
const DEFAULT_REVIEWS_BASE_URL: &str = "http://localhost:8084";
const DEFAULT_REVIEWS_TIMEOUT_MS: u64 = 2000;
const DEFAULT_REVIEWS_CACHE_LIMIT: usize = 200;
const DEFAULT_CACHE_PRODUCT_LIMIT: usize = 500;
const DEFAULT_CACHE_PAGE_LIMIT: usize = 50;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("configuration could not be loaded: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid log level `{0}` (expected trace|debug|info|warn|error)")]
    InvalidLogLevel(String),
    #[error("invalid setting: {0}")]
    InvalidValue(String),
}

/// Command-line arguments for the Vetrina binary.
#[derive(Debug, Parser)]
#[command(name = "vetrina", version, about = "Vetrina catalog server")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "VETRINA_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the Vetrina HTTP service.
    Serve(Box<ServeArgs>),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the database connection URL.
    #[arg(long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,

    /// Override the database pool size.
    #[arg(long = "database-max-connections", value_name = "COUNT")]
    pub database_max_connections: Option<u32>,

    /// Override the review service base URL.
    #[arg(long = "reviews-base-url", value_name = "URL")]
    pub reviews_base_url: Option<String>,

    /// Override the review service request timeout.
    #[arg(long = "reviews-timeout-ms", value_name = "MILLIS")]
    pub reviews_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = SettingsError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(SettingsError::InvalidLogLevel(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerSettings {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: NonZeroU32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: NonZeroU32::new(DEFAULT_DB_MAX_CONNECTIONS)
                .unwrap_or(NonZeroU32::MIN),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: LogLevel,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
        }
    }
}

impl LoggingSettings {
    pub fn level_filter(&self) -> LevelFilter {
        self.level.into()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReviewsSettings {
    /// Base URL of the review service.
    pub base_url: String,
    /// Total request timeout for one review lookup.
    pub timeout_ms: NonZeroU64,
    /// Maximum product ids in the review client's cache region.
    pub cache_limit: usize,
}

impl Default for ReviewsSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REVIEWS_BASE_URL.to_string(),
            timeout_ms: NonZeroU64::new(DEFAULT_REVIEWS_TIMEOUT_MS).unwrap_or(NonZeroU64::MIN),
            cache_limit: DEFAULT_REVIEWS_CACHE_LIMIT,
        }
    }
}

impl ReviewsSettings {
    pub fn cache_limit_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.cache_limit).unwrap_or(NonZeroUsize::MIN)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    pub product_limit: usize,
    pub page_limit: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            product_limit: DEFAULT_CACHE_PRODUCT_LIMIT,
            page_limit: DEFAULT_CACHE_PAGE_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
    pub reviews: ReviewsSettings,
    pub cache: CacheSettings,
}

/// Parse CLI arguments, load layered settings and apply CLI overrides.
pub fn load_with_cli() -> Result<(CliArgs, Settings), SettingsError> {
    let cli = CliArgs::parse();
    let settings = load(cli.config_file.as_deref())?;
    let settings = apply_cli_overrides(settings, &cli)?;
    Ok((cli, settings))
}

/// Load settings with file → environment precedence.
pub fn load(config_file: Option<&Path>) -> Result<Settings, SettingsError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = config_file {
        builder = builder.add_source(File::from(path));
    }

    let raw = builder
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    Ok(raw.try_deserialize()?)
}

fn apply_cli_overrides(mut settings: Settings, cli: &CliArgs) -> Result<Settings, SettingsError> {
    let Some(Command::Serve(args)) = &cli.command else {
        return Ok(settings);
    };
    let overrides = &args.overrides;

    if let Some(host) = &overrides.server_host {
        settings.server.host = host.clone();
    }
    if let Some(port) = overrides.server_port {
        settings.server.port = port;
    }
    if let Some(level) = &overrides.log_level {
        settings.logging.level = level.parse()?;
    }
    if let Some(json) = overrides.log_json {
        settings.logging.format = if json {
            LogFormat::Json
        } else {
            LogFormat::Compact
        };
    }
    if let Some(url) = &overrides.database_url {
        settings.database.url = Some(url.clone());
    }
    if let Some(count) = overrides.database_max_connections {
        settings.database.max_connections = NonZeroU32::new(count).ok_or_else(|| {
            SettingsError::InvalidValue("database max connections must be non-zero".to_string())
        })?;
    }
    if let Some(base_url) = &overrides.reviews_base_url {
        settings.reviews.base_url = base_url.clone();
    }
    if let Some(timeout_ms) = overrides.reviews_timeout_ms {
        settings.reviews.timeout_ms = NonZeroU64::new(timeout_ms).ok_or_else(|| {
            SettingsError::InvalidValue("reviews timeout must be non-zero".to_string())
        })?;
    }

    Ok(settings)
}
