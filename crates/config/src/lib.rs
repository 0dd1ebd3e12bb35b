pub mod models;


pub use models::{AppConfig, ConsoleConfig, LogConfig, LogLevel, OutputFormat};

/// Configuration error type
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration error enumeration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(String),
}
