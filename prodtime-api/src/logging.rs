//! Tracing subscriber initialization shared by both binaries

use anyhow::{Context, Result};
use prodtime_common::config::LoggingConfig;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Build the filter: `RUST_LOG` wins over the configured level
pub fn env_filter(default_level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_level)
            .with_context(|| format!("Invalid log level '{}'", default_level)),
    }
}

/// Initialize the global tracing subscriber
///
/// Logs go to the configured file (appending, no ANSI colors) or to stderr.
pub fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter(&logging.level)?);

    match &logging.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_is_error() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        assert!(env_filter("info").is_ok());
        assert!(env_filter("prodtime=debug,warn").is_ok());
        assert!(env_filter("prodtime=notalevel").is_err());
    }

    #[test]
    fn test_unopenable_log_file_is_error() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let dir = tempfile::TempDir::new().unwrap();
        let logging = LoggingConfig {
            level: "info".to_string(),
            file: Some(dir.path().join("missing").join("prodtime.log")),
        };

        let err = init_tracing(&logging).unwrap_err();
        assert!(err.to_string().contains("Failed to open log file"));
    }
}
