use thiserror::Error;

use crate::theme::ResourceLocator;

/// Failures while loading or installing a theme resource set.
#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("theme resource '{0}' was not found")]
    NotFound(ResourceLocator),

    #[error("failed to read theme resource '{locator}': {source}")]
    Io {
        locator: ResourceLocator,
        #[source]
        source: std::io::Error,
    },

    #[error("theme resource '{locator}' is malformed: {reason}")]
    Malformed {
        locator: ResourceLocator,
        reason: String,
    },
}

/// A theme name that matches no built-in theme.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("unknown theme '{0}'")]
pub struct UnknownTheme(pub String);

/// Failures reported by a theme settings provider.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration is unavailable: {0}")]
    Unavailable(String),

    #[error("configuration could not be parsed: {0}")]
    Parse(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failures crossing an OS service boundary.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("{operation} failed: {message}")]
    Call {
        operation: &'static str,
        message: String,
    },

    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),
}

impl PlatformError {
    pub fn call(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Call {
            operation,
            message: message.into(),
        }
    }
}
