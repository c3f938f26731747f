//! Rule tables with role metadata and inheritance resolution

use crate::error::{Error, Result};
use crate::loader::Loader;
use crate::schema::{EventTable, RoleInfo, RuleBlock, StateInfo};
use earshot_core::{EventKind, RoleId};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

const BUILTIN_RULES: &str = include_str!("../assets/rules.ron");
const BUILTIN_ROLES: &str = include_str!("../assets/roles.ron");
const BUILTIN_STATES: &str = include_str!("../assets/states.ron");

/// Process-wide, read-only formatting rules
///
/// Holds `event kind -> role -> RuleBlock` tables plus role and state
/// metadata. Inherited blocks are merged on every lookup; nothing is cached.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleSet {
    /// Rule tables by event kind
    #[serde(default)]
    pub rules: IndexMap<EventKind, EventTable>,
    /// Role metadata by role
    #[serde(default)]
    pub roles: IndexMap<RoleId, RoleInfo>,
    /// State metadata by state key
    #[serde(default)]
    pub states: IndexMap<String, StateInfo>,
    /// Event kind whose table is used when the requested one has none
    #[serde(default)]
    pub fallback_event: EventKind,
}

impl RuleSet {
    /// Create an empty rule set
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in English rule set
    pub fn builtin() -> Result<Self> {
        let mut loader = Loader::new();
        loader.load_rules_str(BUILTIN_RULES)?;
        loader.load_roles_str(BUILTIN_ROLES)?;
        loader.load_states_str(BUILTIN_STATES)?;
        Ok(loader.finish()?.rules)
    }

    /// Use a different fallback event kind
    pub fn with_fallback_event(mut self, event: impl Into<EventKind>) -> Self {
        self.fallback_event = event.into();
        self
    }

    /// The table for an event kind, falling back to the fallback event's table
    pub fn event_table(&self, event: &str) -> Option<&EventTable> {
        self.rules
            .get(event)
            .or_else(|| self.rules.get(self.fallback_event.as_str()))
    }

    /// Metadata for a role
    pub fn role_info(&self, role: &str) -> Option<&RoleInfo> {
        self.roles.get(role)
    }

    /// Metadata for a state key
    pub fn state_info(&self, key: &str) -> Option<&StateInfo> {
        self.states.get(key)
    }

    /// Roles `role` inherits from, nearest first
    ///
    /// A cycle ends the chain where it closes.
    pub fn inheritance_chain(&self, role: &str) -> Vec<&RoleId> {
        let mut chain = Vec::new();
        let mut seen: IndexSet<&str> = IndexSet::new();
        seen.insert(role);
        let mut current = self.role_info(role).and_then(|info| info.inherits.as_ref());
        while let Some(parent) = current {
            if !seen.insert(parent.as_str()) {
                tracing::warn!(role, parent = %parent, "role inheritance cycle, chain cut");
                break;
            }
            chain.push(parent);
            current = self
                .role_info(parent.as_str())
                .and_then(|info| info.inherits.as_ref());
        }
        chain
    }

    /// Resolve the rule block for a role under an event kind
    ///
    /// The role's own entry (or the table's `default` entry when it has none)
    /// is merged over the blocks of every role it inherits from, farthest
    /// first, so the most specific key wins.
    pub fn resolve_rule_block(&self, event: &str, role: &str) -> RuleBlock {
        let Some(table) = self.event_table(event) else {
            return RuleBlock::default();
        };
        let mut block = table
            .get(role)
            .or_else(|| table.get(RoleId::DEFAULT))
            .cloned()
            .unwrap_or_default();
        for parent in self.inheritance_chain(role) {
            if let Some(inherited) = table.get(parent.as_str()) {
                block = block.merge_over(inherited);
            }
        }
        block
    }

    /// The template announcing a node of `role` itself
    ///
    /// Tactile output uses a non-empty `braille` template when one is set;
    /// otherwise the block's `speak`, then the `default` entry's `speak`.
    pub fn speak_template(&self, event: &str, role: &str, tactile: bool) -> Option<String> {
        let block = self.resolve_rule_block(event, role);
        if tactile {
            if let Some(braille) = block.braille.filter(|t| !t.is_empty()) {
                return Some(braille);
            }
        }
        block.speak.or_else(|| {
            self.event_table(event)
                .and_then(|table| table.get(RoleId::DEFAULT))
                .and_then(|default| default.speak.clone())
        })
    }

    /// Check the load-time invariants
    ///
    /// Every event table defines `default`, the fallback event has a table
    /// (once any table is loaded), every inherited role is known (as role
    /// metadata or as a rule table entry) and inheritance is acyclic.
    pub fn validate(&self) -> Result<()> {
        for (event, table) in &self.rules {
            if !table.contains_key(RoleId::DEFAULT) {
                return Err(Error::MissingDefault(event.clone()));
            }
        }
        if !self.rules.is_empty() && !self.rules.contains_key(self.fallback_event.as_str()) {
            return Err(Error::UnknownFallbackEvent(self.fallback_event.clone()));
        }
        for (role, info) in &self.roles {
            let Some(parent) = &info.inherits else {
                continue;
            };
            let known = self.roles.contains_key(parent.as_str())
                || self.rules.values().any(|t| t.contains_key(parent.as_str()));
            if !known {
                return Err(Error::InvalidSchema(format!(
                    "role '{}' inherits unknown role '{}'",
                    role, parent
                )));
            }
            let mut seen: IndexSet<&str> = IndexSet::new();
            let mut current = Some(role);
            while let Some(r) = current {
                if !seen.insert(r.as_str()) {
                    return Err(Error::InheritanceCycle(role.clone()));
                }
                current = self.role_info(r.as_str()).and_then(|i| i.inherits.as_ref());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_set() -> RuleSet {
        let mut rules = RuleSet::new();
        let mut table = EventTable::new();
        table.insert(RoleId::new("default"), RuleBlock::new().with_speak("$name"));
        table.insert(RoleId::new("P"), RuleBlock::new().with_enter("X").with_leave("L"));
        table.insert(RoleId::new("R"), RuleBlock::new().with_stay("Y").with_leave("RL"));
        table.insert(
            RoleId::new("G"),
            RuleBlock::new().with_enter("GX").with_speak("G speak"),
        );
        rules.rules.insert(EventKind::navigate(), table);
        rules.roles.insert(RoleId::new("R"), RoleInfo::new("r").inheriting("P"));
        rules.roles.insert(RoleId::new("P"), RoleInfo::new("p").inheriting("G"));
        rules.roles.insert(RoleId::new("S"), RoleInfo::new("s").inheriting("P"));
        rules
    }

    #[test]
    fn test_inheritance_merge() {
        let rules = rule_set();
        let block = rules.resolve_rule_block("navigate", "R");
        assert_eq!(block.enter.as_deref(), Some("X"));
        assert_eq!(block.stay.as_deref(), Some("Y"));
        assert_eq!(block.leave.as_deref(), Some("RL"));
        // Grandparent keys come through the chain.
        assert_eq!(block.speak.as_deref(), Some("G speak"));
    }

    #[test]
    fn test_default_without_inheritance() {
        let rules = rule_set();
        let block = rules.resolve_rule_block("navigate", "button");
        assert_eq!(block, RuleBlock::new().with_speak("$name"));
    }

    #[test]
    fn test_default_merged_over_inherited() {
        // A role with metadata but no table entry takes `default` merged
        // over its parents.
        let rules = rule_set();
        let block = rules.resolve_rule_block("navigate", "S");
        assert_eq!(block.speak.as_deref(), Some("$name"));
        assert_eq!(block.enter.as_deref(), Some("X"));
    }

    #[test]
    fn test_unknown_event_falls_back_to_navigate() {
        let rules = rule_set();
        let block = rules.resolve_rule_block("focus", "P");
        assert_eq!(block.enter.as_deref(), Some("X"));
    }

    #[test]
    fn test_with_fallback_event() {
        let mut rules = rule_set();
        let mut table = EventTable::new();
        table.insert(RoleId::new("default"), RuleBlock::new().with_speak("@menu $name"));
        rules.rules.insert(EventKind::new("menuStart"), table);

        let rules = rules.with_fallback_event("menuStart");
        assert_eq!(rules.resolve_rule_block("focus", "P").speak.as_deref(), Some("@menu $name"));
        assert_eq!(rules.resolve_rule_block("navigate", "P").enter.as_deref(), Some("X"));
        assert!(rules.validate().is_ok());

        let rules = rules.with_fallback_event("hover");
        assert!(rules.event_table("focus").is_none());
        assert!(matches!(rules.validate(), Err(Error::UnknownFallbackEvent(e)) if e.as_str() == "hover"));
    }

    #[test]
    fn test_inheritance_cycle_is_cut() {
        let mut rules = rule_set();
        rules.roles.insert(RoleId::new("G"), RoleInfo::new("g").inheriting("R"));

        let chain: Vec<&str> = rules.inheritance_chain("R").iter().map(|r| r.as_str()).collect();
        assert_eq!(chain, vec!["P", "G"]);
        assert!(matches!(rules.validate(), Err(Error::InheritanceCycle(_))));
    }

    #[test]
    fn test_speak_template() {
        let mut rules = rule_set();
        let table = rules.rules.get_mut("navigate").unwrap();
        table.insert(
            RoleId::new("textField"),
            RuleBlock::new().with_speak("$name $value").with_braille(""),
        );
        table.insert(
            RoleId::new("slider"),
            RuleBlock::new().with_speak("$value").with_braille("$value $role"),
        );

        assert_eq!(rules.speak_template("navigate", "textField", true).as_deref(), Some("$name $value"));
        assert_eq!(rules.speak_template("navigate", "slider", true).as_deref(), Some("$value $role"));
        assert_eq!(rules.speak_template("navigate", "slider", false).as_deref(), Some("$value"));
        assert_eq!(rules.speak_template("navigate", "P", false).as_deref(), Some("G speak"));
        assert_eq!(rules.speak_template("navigate", "link", false).as_deref(), Some("$name"));
    }

    #[test]
    fn test_validate_missing_default() {
        let mut rules = rule_set();
        let mut table = EventTable::new();
        table.insert(RoleId::new("button"), RuleBlock::new().with_speak("$name"));
        rules.rules.insert(EventKind::new("focus"), table);
        assert!(matches!(rules.validate(), Err(Error::MissingDefault(e)) if e.as_str() == "focus"));
    }

    #[test]
    fn test_builtin_rules() {
        let rules = RuleSet::builtin().unwrap();
        assert!(rules.validate().is_ok());

        // `main` has no navigate entry of its own but inherits container rules.
        let block = rules.resolve_rule_block("navigate", "main");
        assert_eq!(block.enter.as_deref(), Some("$name $role"));
        assert_eq!(block.leave.as_deref(), Some("@exited_container($role)"));

        let button = rules.role_info("button").unwrap();
        assert_eq!(button.earcon.as_ref().map(|e| e.as_str()), Some("BUTTON"));
        assert!(rules.state_info("checked").is_some());
    }
}
