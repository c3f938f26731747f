//! Role metadata schema

use earshot_core::{EarconId, RoleId};
use serde::{Deserialize, Serialize};

/// Metadata for one role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleInfo {
    /// Message used to announce the role name
    pub msg_id: String,
    /// Audio cue played alongside the node's name
    #[serde(default)]
    pub earcon: Option<EarconId>,
    /// Role whose rule blocks are merged underneath this role's
    #[serde(default)]
    pub inherits: Option<RoleId>,
}

impl RoleInfo {
    /// Create role metadata with only a message ID
    pub fn new(msg_id: impl Into<String>) -> Self {
        Self {
            msg_id: msg_id.into(),
            earcon: None,
            inherits: None,
        }
    }

    /// Set the earcon
    pub fn with_earcon(mut self, earcon: impl Into<EarconId>) -> Self {
        self.earcon = Some(earcon.into());
        self
    }

    /// Set the inherited role
    pub fn inheriting(mut self, role: impl Into<RoleId>) -> Self {
        self.inherits = Some(role.into());
        self
    }
}
