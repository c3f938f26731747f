//! State of one render pass

use crate::config::FormatterConfig;
use crate::sink::SpeechProperties;
use earshot_core::{AccessTree, Rect};
use earshot_rules::{MessageResolver, RuleSet};

/// Output channel a pass renders for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Speech,
    Tactile,
}

/// Attributes skipped when rendering a text range inside one node
pub(crate) const SUB_NODE_EXCLUDE: &[&str] = &["stay", "name", "value"];

/// Nesting limit for `$descendants` / `$nameOrDescendants` recursion
pub(crate) const MAX_DEPTH: usize = 16;

/// Shared state of one render pass over one channel
///
/// Token evaluation, ancestry diffing and range walking are all methods of
/// this type because they recurse into each other (`$descendants` walks a
/// range, walking a range evaluates templates).
pub(crate) struct RenderContext<'a> {
    pub tree: &'a dyn AccessTree,
    pub rules: &'a RuleSet,
    pub messages: &'a dyn MessageResolver,
    pub config: &'a FormatterConfig,
    pub channel: Channel,
    pub properties: SpeechProperties,
    pub locations: Vec<Rect>,
    pub depth: usize,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        tree: &'a dyn AccessTree,
        rules: &'a RuleSet,
        messages: &'a dyn MessageResolver,
        config: &'a FormatterConfig,
        channel: Channel,
    ) -> Self {
        Self {
            tree,
            rules,
            messages,
            config,
            channel,
            properties: SpeechProperties::new(),
            locations: Vec::new(),
            depth: 0,
        }
    }

    pub fn is_tactile(&self) -> bool {
        self.channel == Channel::Tactile
    }

    /// Resolve a message, preferring the tactile variant on the tactile channel
    pub fn message(&self, id: &str, args: &[String]) -> Option<String> {
        if self.is_tactile() {
            let variant = format!("{}{}", id, self.config.tactile_suffix);
            if let Some(text) = self.messages.resolve(&variant, args) {
                return Some(text);
            }
        }
        self.messages.resolve(id, args)
    }
}
