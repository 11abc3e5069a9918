//! Configuration management

use clap::Parser;
use config::{Config as ConfigBuilder, ConfigBuilder as Builder, ConfigError as BuilderError, Environment, File};
use config::builder::DefaultState;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable prefix, e.g. `FLIGHT_ADMIN_SERVER__PORT=8080`
pub const ENV_PREFIX: &str = "FLIGHT_ADMIN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid server configuration: {0}")]
    InvalidServer(String),

    #[error("Invalid database configuration: {0}")]
    InvalidDatabase(String),

    #[error("Invalid logging configuration: {0}")]
    InvalidLogging(String),

    #[error("Invalid security configuration: {0}")]
    InvalidSecurity(String),

    #[error("Invalid client configuration: {0}")]
    InvalidClient(String),

    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),
}

impl From<BuilderError> for ConfigError {
    fn from(err: BuilderError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    pub client: ClientConfig,
}

impl Config {
    /// Load configuration with precedence: CLI args > Environment variables > Config file > Defaults
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(CliArgs::parse())
    }

    /// Same as [`Config::load`] with already parsed arguments
    pub fn load_from(cli_args: CliArgs) -> Result<Self, ConfigError> {
        // 1. Defaults (lowest priority)
        let mut builder = with_defaults(ConfigBuilder::builder())?;

        // 2. Config file if specified
        if let Some(config_path) = &cli_args.config {
            if !config_path.exists() {
                return Err(ConfigError::FileNotFound(config_path.display().to_string()));
            }
            builder = builder.add_source(File::from(config_path.as_path()));
        }

        // 3. Environment variables
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        // 4. CLI arguments (highest priority)
        if let Some(host) = &cli_args.host {
            builder = builder.set_override("server.host", host.clone())?;
        }
        if let Some(port) = cli_args.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(db_path) = &cli_args.database {
            builder = builder.set_override("database.path", db_path.display().to_string())?;
        }
        if let Some(log_level) = &cli_args.log_level {
            builder = builder.set_override("logging.level", log_level.clone())?;
        }

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Built-in defaults only, no file, environment or CLI input
    pub fn defaults() -> Result<Self, ConfigError> {
        let config: Config = with_defaults(ConfigBuilder::builder())?
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Load configuration from a specific file path, defaults filling the gaps
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let config: Config = with_defaults(ConfigBuilder::builder())?
            .add_source(File::from(path))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.logging.validate()?;
        self.security.validate()?;
        self.client.validate()?;
        Ok(())
    }
}

fn with_defaults(builder: Builder<DefaultState>) -> Result<Builder<DefaultState>, ConfigError> {
    Ok(builder
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 4000)?
        .set_default("server.request_timeout", 30)?
        .set_default("database.path", "./data/flight-admin.db")?
        .set_default("database.connection_pool_size", 10)?
        .set_default("database.busy_timeout", 5000)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "json")?
        .set_default("logging.output", "stdout")?
        .set_default("logging.max_file_size", 10485760)? // 10 MB
        .set_default("logging.max_backups", 5)?
        .set_default("security.allowed_origins", vec!["*"])?
        .set_default("security.bcrypt_cost", 10)?
        .set_default("client.base_url", "http://127.0.0.1:4000")?)
}

/// Command-line arguments for configuration override
#[derive(Debug, Default, Parser)]
#[command(name = "flight-admin")]
#[command(about = "Flight administration backend", long_about = None)]
pub struct CliArgs {
    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Server host address
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Database file path
    #[arg(short, long, value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout: u64, // seconds
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::InvalidServer("host cannot be empty".to_string()));
        }

        if self.port == 0 {
            return Err(ConfigError::InvalidServer("port must be greater than 0".to_string()));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::InvalidServer("request_timeout must be greater than 0".to_string()));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub connection_pool_size: usize,
    pub busy_timeout: u64, // milliseconds
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidDatabase("path cannot be empty".to_string()));
        }

        if self.connection_pool_size == 0 {
            return Err(ConfigError::InvalidDatabase("connection_pool_size must be greater than 0".to_string()));
        }

        if self.busy_timeout == 0 {
            return Err(ConfigError::InvalidDatabase("busy_timeout must be greater than 0".to_string()));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub output: String,
    pub log_file: Option<PathBuf>,
    pub max_file_size: usize, // bytes
    pub max_backups: usize,
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.as_str()) {
            return Err(ConfigError::InvalidLogging(
                format!("level must be one of: {:?}", valid_levels)
            ));
        }

        let valid_formats = ["json", "text"];
        if !valid_formats.contains(&self.format.as_str()) {
            return Err(ConfigError::InvalidLogging(
                format!("format must be one of: {:?}", valid_formats)
            ));
        }

        let valid_outputs = ["stdout", "file"];
        if !valid_outputs.contains(&self.output.as_str()) {
            return Err(ConfigError::InvalidLogging(
                format!("output must be one of: {:?}", valid_outputs)
            ));
        }

        if self.output == "file" && self.log_file.is_none() {
            return Err(ConfigError::InvalidLogging(
                "log_file must be specified when output is 'file'".to_string()
            ));
        }

        if self.max_file_size == 0 {
            return Err(ConfigError::InvalidLogging("max_file_size must be greater than 0".to_string()));
        }

        if self.max_backups == 0 {
            return Err(ConfigError::InvalidLogging("max_backups must be greater than 0".to_string()));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
    pub bcrypt_cost: u32,
}

impl SecurityConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.allowed_origins.is_empty() {
            return Err(ConfigError::InvalidSecurity("allowed_origins cannot be empty".to_string()));
        }

        // bcrypt accepts costs 4..=31
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidSecurity("bcrypt_cost must be between 4 and 31".to_string()));
        }

        Ok(())
    }
}

/// Settings for the admin client talking to a running backend
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
}

impl ClientConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.base_url)
            .map_err(|e| ConfigError::InvalidClient(format!("base_url is not a valid URL: {}", e)))?;
        Ok(())
    }
}
