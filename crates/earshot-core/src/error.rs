//! Error types for earshot-core

use crate::NodeId;
use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unbalanced parenthesis in template token: {token}")]
    UnbalancedGrouping { token: String },

    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Invalid node query: {0}")]
    InvalidQuery(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
