//! Rule block schema

use earshot_core::RoleId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Format templates a role uses for one event kind
///
/// - `enter`: spoken when focus moves into a node of this role
/// - `leave`: spoken when focus moves out of it
/// - `stay`: spoken while focus moves around inside it
/// - `speak`: the node's own announcement
/// - `braille`: tactile replacement for `speak` (empty means "use speak")
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleBlock {
    #[serde(default)]
    pub enter: Option<String>,
    #[serde(default)]
    pub leave: Option<String>,
    #[serde(default)]
    pub stay: Option<String>,
    #[serde(default)]
    pub speak: Option<String>,
    #[serde(default)]
    pub braille: Option<String>,
}

impl RuleBlock {
    /// Create an empty rule block
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `enter` template
    pub fn with_enter(mut self, template: impl Into<String>) -> Self {
        self.enter = Some(template.into());
        self
    }

    /// Set the `leave` template
    pub fn with_leave(mut self, template: impl Into<String>) -> Self {
        self.leave = Some(template.into());
        self
    }

    /// Set the `stay` template
    pub fn with_stay(mut self, template: impl Into<String>) -> Self {
        self.stay = Some(template.into());
        self
    }

    /// Set the `speak` template
    pub fn with_speak(mut self, template: impl Into<String>) -> Self {
        self.speak = Some(template.into());
        self
    }

    /// Set the `braille` template
    pub fn with_braille(mut self, template: impl Into<String>) -> Self {
        self.braille = Some(template.into());
        self
    }

    /// Merge this block over an inherited one; keys set here win
    pub fn merge_over(&self, inherited: &RuleBlock) -> RuleBlock {
        fn pick(own: &Option<String>, inherited: &Option<String>) -> Option<String> {
            own.clone().or_else(|| inherited.clone())
        }
        RuleBlock {
            enter: pick(&self.enter, &inherited.enter),
            leave: pick(&self.leave, &inherited.leave),
            stay: pick(&self.stay, &inherited.stay),
            speak: pick(&self.speak, &inherited.speak),
            braille: pick(&self.braille, &inherited.braille),
        }
    }

    /// Check if no template is set
    pub fn is_empty(&self) -> bool {
        self.enter.is_none()
            && self.leave.is_none()
            && self.stay.is_none()
            && self.speak.is_none()
            && self.braille.is_none()
    }
}

/// Rule blocks of one event kind, by role
pub type EventTable = IndexMap<RoleId, RuleBlock>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_block_ron() {
        let ron_str = r#"
        #![enable(implicit_some)]
        (
            enter: "$name $role",
            leave: "@exited_container($role)",
        )
        "#;

        let block: RuleBlock = ron::from_str(ron_str).unwrap();
        assert_eq!(block.enter.as_deref(), Some("$name $role"));
        assert_eq!(block.leave.as_deref(), Some("@exited_container($role)"));
        assert!(block.speak.is_none());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result: std::result::Result<RuleBlock, _> = ron::from_str(r#"(entr: Some("x"))"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_over() {
        let parent = RuleBlock::new().with_enter("X").with_stay("P");
        let child = RuleBlock::new().with_stay("Y");

        let merged = child.merge_over(&parent);
        assert_eq!(merged.enter.as_deref(), Some("X"));
        assert_eq!(merged.stay.as_deref(), Some("Y"));
        assert!(merged.leave.is_none());
    }
}
