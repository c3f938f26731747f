//! Formatter Configuration - announcement policy knobs
//!
//! The ancestry differ's heuristics and the tactile output conventions are
//! data rather than constants so embedders can tune them per platform.

use crate::{Error, Result};
use earshot_core::RoleId;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for a [`Formatter`](crate::Formatter)
///
/// # Example
///
/// ```
/// use earshot_output::FormatterConfig;
///
/// let config = FormatterConfig::default();
/// assert_eq!(config.window_role.as_str(), "window");
///
/// let config = FormatterConfig::from_ron("(stop_enter_at_window: false)").unwrap();
/// assert!(!config.stop_enter_at_window);
/// assert_eq!(config.tactile_suffix, "_brl");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    /// Role that bounds enter announcements
    pub window_role: RoleId,
    /// Stop announcing entered containers after reaching a window
    ///
    /// Enter output never reaches past the nearest window ancestor.
    pub stop_enter_at_window: bool,
    /// Announce only the nearest of several nested containers sharing a role
    pub suppress_repeated_enter_roles: bool,
    /// Leaf text roles whose `$value` counts as the name of their ancestor
    pub text_leaf_roles: Vec<RoleId>,
    /// Suffix of tactile message variants
    pub tactile_suffix: String,
    /// Joins tactile fragments
    pub tactile_separator: String,
}

impl FormatterConfig {
    /// Parse a configuration from RON; missing fields take their defaults
    pub fn from_ron(content: &str) -> Result<Self> {
        let config: Self = ron::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_ron(&fs::read_to_string(path)?)
    }

    /// Check the values are usable
    pub fn validate(&self) -> Result<()> {
        if self.tactile_suffix.is_empty() {
            return Err(Error::Config("tactile_suffix must not be empty".into()));
        }
        if self.window_role.as_str().is_empty() {
            return Err(Error::Config("window_role must not be empty".into()));
        }
        Ok(())
    }

    /// Whether `$value` on a node of this role is tagged as its name
    pub fn is_text_leaf(&self, role: &RoleId) -> bool {
        self.text_leaf_roles.contains(role)
    }
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            window_role: RoleId::new("window"),
            stop_enter_at_window: true,
            suppress_repeated_enter_roles: true,
            text_leaf_roles: vec![RoleId::new("inlineTextBox")],
            tactile_suffix: "_brl".to_string(),
            tactile_separator: " ".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FormatterConfig::default();
        assert!(config.stop_enter_at_window);
        assert!(config.suppress_repeated_enter_roles);
        assert!(config.is_text_leaf(&RoleId::new("inlineTextBox")));
        assert!(!config.is_text_leaf(&RoleId::new("staticText")));
        assert_eq!(config.tactile_separator, " ");
    }

    #[test]
    fn test_partial_ron() {
        let config = FormatterConfig::from_ron(
            r#"(
                window_role: "dialog",
                text_leaf_roles: ["inlineTextBox", "staticText"],
            )"#,
        )
        .unwrap();
        assert_eq!(config.window_role, "dialog");
        assert!(config.is_text_leaf(&RoleId::new("staticText")));
        assert!(config.suppress_repeated_enter_roles);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            FormatterConfig::from_ron(r#"(tactile_suffix: "")"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            FormatterConfig::from_ron("(window_role: 3)"),
            Err(Error::Ron(_))
        ));
    }
}
