//! Crate error types

use thiserror::Error;

use crate::config::ConfigError;
use crate::font::FontError;

/// Errors surfaced by the frame loop and the terminal facade
#[derive(Error, Debug)]
pub enum Error {
    /// Clean termination requested by the application
    #[error("terminated")]
    Termination,

    #[error("font error: {0}")]
    Font(#[from] FontError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// An error returned by application code
    #[error("application error: {0}")]
    App(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The frame-loop host failed
    #[error("host error: {0}")]
    Host(String),
}

impl Error {
    /// Wrap an application error
    pub fn app(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::App(err.into())
    }

    pub fn is_termination(&self) -> bool {
        matches!(self, Error::Termination)
    }
}

/// Result type for terminal operations
pub type Result<T> = std::result::Result<T, Error>;
