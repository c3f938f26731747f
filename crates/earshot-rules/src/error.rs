//! Error types for earshot-rules

use earshot_core::{EventKind, RoleId};
use thiserror::Error;

/// Rule loading error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("Event table '{0}' has no default entry")]
    MissingDefault(EventKind),

    #[error("Duplicate definition: {0}")]
    DuplicateDefinition(String),

    #[error("Fallback event '{0}' has no rule table")]
    UnknownFallbackEvent(EventKind),

    #[error("Role inheritance cycle through '{0}'")]
    InheritanceCycle(RoleId),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
