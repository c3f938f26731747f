//! RON rule loader

use crate::error::{Error, Result};
use crate::messages::MessageCatalog;
use crate::ruleset::RuleSet;
use crate::schema::{EventTable, RoleInfo, StateInfo};
use earshot_core::{EventKind, RoleId};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Everything a formatter needs, loaded and validated
#[derive(Debug, Clone, Default)]
pub struct Definitions {
    pub rules: RuleSet,
    pub messages: MessageCatalog,
}

#[derive(Deserialize)]
struct RulesFile {
    #[serde(default)]
    fallback_event: Option<EventKind>,
    #[serde(default)]
    rules: IndexMap<EventKind, EventTable>,
}

#[derive(Deserialize)]
struct RolesFile {
    roles: IndexMap<RoleId, RoleInfo>,
}

#[derive(Deserialize)]
struct StatesFile {
    states: IndexMap<String, StateInfo>,
}

#[derive(Deserialize)]
struct MessagesFile {
    messages: IndexMap<String, String>,
}

/// Loader for RON rule documents
///
/// Documents may be split across files; a role, state or message defined
/// twice is rejected.
pub struct Loader {
    defs: Definitions,
    fallback_from: Option<EventKind>,
}

impl Loader {
    /// Create a new loader
    pub fn new() -> Self {
        Self {
            defs: Definitions::default(),
            fallback_from: None,
        }
    }

    /// Load a single RON file
    ///
    /// The document kind is taken from the file name, then from its
    /// top-level key.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        tracing::debug!(path = %path.display(), "loading rule document");

        if filename.contains("rule") || content.contains("rules:") || content.contains("fallback_event:") {
            self.load_rules_str(&content)
        } else if filename.contains("role") || content.contains("roles:") {
            self.load_roles_str(&content)
        } else if filename.contains("state") || content.contains("states:") {
            self.load_states_str(&content)
        } else if filename.contains("message") || content.contains("messages:") {
            self.load_messages_str(&content)
        } else {
            Err(Error::InvalidSchema(format!(
                "could not tell what kind of document {:?} is",
                path
            )))
        }
    }

    /// Load rule tables from a RON string
    ///
    /// A document may also name the `fallback_event`; two documents naming
    /// different ones conflict.
    pub fn load_rules_str(&mut self, content: &str) -> Result<()> {
        let file: RulesFile = ron::from_str(content)?;
        if let Some(fallback) = file.fallback_event {
            match &self.fallback_from {
                Some(previous) if *previous != fallback => {
                    return Err(Error::DuplicateDefinition("fallback_event".to_string()));
                }
                _ => {}
            }
            self.defs.rules.fallback_event = fallback.clone();
            self.fallback_from = Some(fallback);
        }
        for (event, table) in file.rules {
            let target = self.defs.rules.rules.entry(event.clone()).or_default();
            for (role, block) in table {
                if target.contains_key(&role) {
                    return Err(Error::DuplicateDefinition(format!("{}/{}", event, role)));
                }
                target.insert(role, block);
            }
        }
        Ok(())
    }

    /// Load role metadata from a RON string
    pub fn load_roles_str(&mut self, content: &str) -> Result<()> {
        let file: RolesFile = ron::from_str(content)?;
        for (role, info) in file.roles {
            if self.defs.rules.roles.contains_key(&role) {
                return Err(Error::DuplicateDefinition(role.to_string()));
            }
            self.defs.rules.roles.insert(role, info);
        }
        Ok(())
    }

    /// Load state metadata from a RON string
    pub fn load_states_str(&mut self, content: &str) -> Result<()> {
        let file: StatesFile = ron::from_str(content)?;
        for (key, info) in file.states {
            if self.defs.rules.states.contains_key(&key) {
                return Err(Error::DuplicateDefinition(key));
            }
            self.defs.rules.states.insert(key, info);
        }
        Ok(())
    }

    /// Load a message catalog from a RON string
    pub fn load_messages_str(&mut self, content: &str) -> Result<()> {
        let file: MessagesFile = ron::from_str(content)?;
        for (id, text) in file.messages {
            if self.defs.messages.contains(&id) {
                return Err(Error::DuplicateDefinition(id));
            }
            self.defs.messages.insert(id, text);
        }
        Ok(())
    }

    /// Load all RON files from a directory, recursively and in name order
    pub fn load_directory(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if !path.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Not a directory: {:?}", path),
            )));
        }

        let mut entries = fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        entries.sort();

        for file_path in entries {
            if file_path.extension().map(|e| e == "ron").unwrap_or(false) {
                self.load_file(&file_path)?;
            } else if file_path.is_dir() {
                self.load_directory(&file_path)?;
            }
        }

        Ok(())
    }

    /// Finish loading, validate and return the definitions
    pub fn finish(self) -> Result<Definitions> {
        self.defs.rules.validate()?;
        Ok(self.defs)
    }

    /// Get the current definitions (for inspection during loading)
    pub fn defs(&self) -> &Definitions {
        &self.defs
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
