use thiserror::Error;

/// Errors raised while loading process configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Invalid setting {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
