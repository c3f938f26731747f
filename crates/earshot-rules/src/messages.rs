//! Localized message lookup

use crate::error::Result;
use crate::loader::Loader;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

const BUILTIN_MESSAGES: &str = include_str!("../assets/messages.ron");

/// Resolves message IDs to localized text
///
/// `args` fill the message's positional placeholders. Returns `None` when
/// the ID is unknown, which lets callers try a variant ID first and fall
/// back silently.
pub trait MessageResolver {
    fn resolve(&self, id: &str, args: &[String]) -> Option<String>;
}

/// In-memory message catalog with `$1`..`$n` placeholders
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageCatalog {
    messages: IndexMap<String, String>,
}

impl MessageCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in English catalog
    pub fn builtin() -> Result<Self> {
        let mut loader = Loader::new();
        loader.load_messages_str(BUILTIN_MESSAGES)?;
        Ok(loader.finish()?.messages)
    }

    /// Add or replace a message
    pub fn insert(&mut self, id: impl Into<String>, text: impl Into<String>) -> &mut Self {
        self.messages.insert(id.into(), text.into());
        self
    }

    /// Check if a message is defined
    pub fn contains(&self, id: &str) -> bool {
        self.messages.contains_key(id)
    }

    /// Raw, unformatted message text
    pub fn get(&self, id: &str) -> Option<&str> {
        self.messages.get(id).map(String::as_str)
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl MessageResolver for MessageCatalog {
    fn resolve(&self, id: &str, args: &[String]) -> Option<String> {
        self.get(id).map(|text| substitute(text, args))
    }
}

/// Replace `$1`..`$n` with the matching argument
///
/// A placeholder without an argument becomes empty; a `$` not followed by
/// digits is kept.
fn substitute(text: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        let mut digits = String::new();
        while let Some(d) = chars.peek().filter(|d| d.is_ascii_digit()) {
            digits.push(*d);
            chars.next();
        }
        match digits.parse::<usize>() {
            Ok(index) if index >= 1 => {
                if let Some(arg) = args.get(index - 1) {
                    out.push_str(arg);
                }
            }
            _ => {
                out.push('$');
                out.push_str(&digits);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitution() {
        let mut catalog = MessageCatalog::new();
        catalog.insert("describe_index", "$1 of $2");
        catalog.insert("price", "costs $5 or $x");

        let args = vec!["2".to_string(), "3".to_string()];
        assert_eq!(catalog.resolve("describe_index", &args).as_deref(), Some("2 of 3"));
        assert_eq!(catalog.resolve("price", &[]).as_deref(), Some("costs  or $x"));
        assert!(catalog.resolve("missing", &[]).is_none());
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = MessageCatalog::builtin().unwrap();
        assert_eq!(catalog.resolve("tag_button", &[]).as_deref(), Some("Button"));
        assert_eq!(catalog.resolve("tag_button_brl", &[]).as_deref(), Some("btn"));
        assert_eq!(
            catalog
                .resolve("list_with_items", &["4".to_string()])
                .as_deref(),
            Some("with 4 items")
        );
    }
}
