//! Logging setup and configuration

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Setup tracing subscriber for the application
///
/// Diagnostics go to stderr so they never interleave with records echoed
/// on stdout.
pub fn setup_logging(default_level: &str) -> crate::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| crate::Error::Config(format!("Invalid log filter: {}", e)))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| crate::Error::Config(format!("Logging already initialized: {}", e)))?;

    Ok(())
}

/// Levels accepted in configuration files and on the command line
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Check that `level` is one of [`LOG_LEVELS`]
pub fn validate_log_level(level: &str) -> crate::Result<()> {
    if LOG_LEVELS.contains(&level) {
        Ok(())
    } else {
        Err(crate::Error::Config(format!(
            "Invalid log level '{}', must be one of: {}",
            level,
            LOG_LEVELS.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_log_level() {
        for level in LOG_LEVELS {
            assert!(validate_log_level(level).is_ok());
        }
        assert!(validate_log_level("verbose").is_err());
        assert!(validate_log_level("INFO").is_err());
    }
}
