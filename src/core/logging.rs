//! Structured logging
//!
//! Sets up the global `tracing` subscriber:
//! - JSON or text output
//! - level from configuration, overridable with `RUST_LOG`
//! - stdout or a size-rotated log file behind a non-blocking writer

use crate::core::config::LoggingConfig;
use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Keeps the background log writer alive; drop it last.
pub struct Logger {
    _guard: WorkerGuard,
}

impl Logger {
    /// Install the global subscriber described by `config`
    pub fn init(config: &LoggingConfig) -> Result<Self> {
        let level = parse_log_level(&config.level)?;

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level.as_str()));

        let (writer, guard) = match config.output.as_str() {
            "stdout" => tracing_appender::non_blocking(io::stdout()),
            "file" => {
                let log_file = config.log_file.as_ref()
                    .context("log_file must be specified when output is 'file'")?;

                if let Some(parent) = log_file.parent() {
                    fs::create_dir_all(parent).context("Failed to create log directory")?;
                }

                let appender = RollingFileAppender::for_path(
                    log_file,
                    config.max_file_size,
                    config.max_backups,
                )?;
                tracing_appender::non_blocking(appender)
            }
            other => anyhow::bail!("Invalid output configuration: {}", other),
        };

        let fmt_layer = match config.format.as_str() {
            "json" => fmt::layer()
                .json()
                .with_writer(writer)
                .with_span_events(FmtSpan::CLOSE)
                .with_current_span(true)
                .with_target(true)
                .boxed(),
            "text" => fmt::layer()
                .with_writer(writer)
                .with_span_events(FmtSpan::CLOSE)
                .with_target(true)
                .boxed(),
            other => anyhow::bail!("Invalid format configuration: {}", other),
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .context("Failed to initialize tracing subscriber")?;

        tracing::info!(
            level = %config.level,
            format = %config.format,
            output = %config.output,
            "Logging system initialized"
        );

        Ok(Logger { _guard: guard })
    }
}

fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!("Invalid log level: {}", level),
    }
}

/// File writer that rotates `name` -> `name.1` -> ... once `max_file_size` is reached
pub struct RollingFileAppender {
    directory: PathBuf,
    filename: String,
    max_file_size: usize,
    max_backups: usize,
    file: Option<File>,
    size: usize,
}

impl RollingFileAppender {
    pub fn new(directory: PathBuf, filename: String, max_file_size: usize, max_backups: usize) -> Self {
        Self {
            directory,
            filename,
            max_file_size,
            max_backups,
            file: None,
            size: 0,
        }
    }

    fn for_path(log_file: &Path, max_file_size: usize, max_backups: usize) -> Result<Self> {
        let directory = log_file.parent()
            .context("Log file must have a parent directory")?;
        let filename = log_file.file_name()
            .context("Log file must have a filename")?
            .to_str()
            .context("Log filename must be valid UTF-8")?;

        Ok(Self::new(directory.to_path_buf(), filename.to_string(), max_file_size, max_backups))
    }

    fn current_path(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        self.directory.join(format!("{}.{}", self.filename, index))
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file = None;

        for i in (1..self.max_backups).rev() {
            let from = self.backup_path(i);
            if from.exists() {
                fs::rename(&from, self.backup_path(i + 1))?;
            }
        }

        let current = self.current_path();
        if current.exists() {
            fs::rename(&current, self.backup_path(1))?;
        }

        self.size = 0;
        Ok(())
    }

    fn open_if_needed(&mut self) -> io::Result<()> {
        if self.file.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(self.current_path())?;
            self.size = file.metadata()?.len() as usize;
            self.file = Some(file);
        }
        Ok(())
    }
}

impl Write for RollingFileAppender {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.open_if_needed()?;
        if self.size > 0 && self.size + buf.len() > self.max_file_size {
            self.rotate()?;
            self.open_if_needed()?;
        }

        let written = match self.file.as_mut() {
            Some(file) => file.write(buf)?,
            None => 0,
        };
        self.size += written;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}
