//! Error types for earshot-output

use thiserror::Error;

/// Formatter error type
///
/// Rendering itself never fails; these come from setting a formatter up.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Tree error: {0}")]
    Core(#[from] earshot_core::Error),

    #[error("Rule error: {0}")]
    Rules(#[from] earshot_rules::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
