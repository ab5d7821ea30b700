//! Runtime configuration for the export run.
//!
//! The only tunable is the concurrency ceiling, read from the `parallel`
//! environment variable. A missing variable falls back to the default;
//! a present-but-invalid value is a fatal error, surfaced before any
//! task launches.
use thiserror::Error;

/// Concurrency ceiling used when `parallel` is unset.
pub const DEFAULT_PARALLEL: usize = 10;

/// Name of the environment variable holding the concurrency ceiling.
pub const PARALLEL_ENV: &str = "parallel";

#[derive(Debug, Error)]
pub enum ConfigError {
    /// `parallel` was set but is not a positive integer.
    #[error("`{PARALLEL_ENV}` must be a positive integer, got {0:?}")]
    InvalidParallel(String),
}

/// Process-wide settings resolved at startup.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeConfig {
    /// Maximum number of conversions allowed to run simultaneously.
    pub parallel: usize,
}

impl RuntimeConfig {
    /// Resolve the configuration from the process environment.
    ///
    /// - `parallel` unset → [`DEFAULT_PARALLEL`]
    /// - `parallel` set to a positive integer → that value
    /// - anything else → [`ConfigError::InvalidParallel`]
    pub fn from_env() -> Result<Self, ConfigError> {
        let parallel = parse_parallel(std::env::var(PARALLEL_ENV).ok().as_deref())?;
        tracing::info!(parallel = parallel, "Concurrency ceiling configured");
        Ok(Self { parallel })
    }
}

fn parse_parallel(raw: Option<&str>) -> Result<usize, ConfigError> {
    match raw {
        None => Ok(DEFAULT_PARALLEL),
        Some(value) => value
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| ConfigError::InvalidParallel(value.to_string())),
    }
}
