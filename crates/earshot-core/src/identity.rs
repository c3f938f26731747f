//! Identity types for tree nodes, roles, event kinds and earcons

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Identifier for a node in an accessibility tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Create a new node ID
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node:{}", self.0)
    }
}

/// The role of a node (e.g. `button`, `list`, `heading`)
///
/// Roles are open-ended strings so rule tables loaded from RON can name
/// roles the formatter has never heard of.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(pub String);

impl RoleId {
    /// Role of the fallback entry every event table must define
    pub const DEFAULT: &'static str = "default";

    /// Create a new role ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the role as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RoleId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RoleId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for RoleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for RoleId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for RoleId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// The kind of event that triggered an announcement (e.g. `navigate`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventKind(pub String);

impl EventKind {
    /// Name of the event kind used when no table exists for the requested one
    pub const NAVIGATE: &'static str = "navigate";

    /// Create a new event kind
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    /// The `navigate` event kind
    pub fn navigate() -> Self {
        Self::new(Self::NAVIGATE)
    }

    /// Get the event kind as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EventKind {
    fn default() -> Self {
        Self::navigate()
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for EventKind {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EventKind {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Identifier of a short audio cue
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EarconId(pub String);

impl EarconId {
    /// Create a new earcon ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EarconId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EarconId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        let id = NodeId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "node:42");
    }

    #[test]
    fn test_role_id() {
        let role = RoleId::new("listItem");
        assert_eq!(role.as_str(), "listItem");
        assert_eq!(role, "listItem");
        assert_eq!(format!("{}", role), "listItem");
    }

    #[test]
    fn test_event_kind_default_is_navigate() {
        assert_eq!(EventKind::default().as_str(), "navigate");
    }
}
