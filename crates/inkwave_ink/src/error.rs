//! Ink error types

use inkwave_dom::DomError;
use thiserror::Error;

/// Errors surfaced by the ink watcher and its configuration
#[derive(Error, Debug)]
pub enum InkError {
    /// `start` was called on a running watcher
    #[error("Interaction watcher is already started")]
    AlreadyStarted,

    /// `stop` was called on a watcher that is not running
    #[error("Interaction watcher is not started")]
    NotStarted,

    /// Configuration has the wrong shape
    #[error("Invalid ink configuration: {0}")]
    Config(String),

    /// Configuration is not valid TOML
    #[error("Failed to parse ink configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration file could not be read
    #[error("Failed to read ink configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Element tree operation failed
    #[error(transparent)]
    Dom(#[from] DomError),
}

/// Result type for ink operations
pub type Result<T> = std::result::Result<T, InkError>;
