//! Earshot Rules - output rule tables, metadata and message catalogs
//!
//! Loads formatter data from RON documents:
//! - Per-event, per-role rule blocks (`enter`, `leave`, `stay`, `speak`, `braille`)
//! - Role metadata with message IDs, earcons and role inheritance
//! - State metadata for tri-state flags
//! - Localized message catalogs
//!
//! A built-in English set is embedded and available through
//! [`RuleSet::builtin`] and [`MessageCatalog::builtin`].

mod error;
mod loader;
mod messages;
mod ruleset;
mod schema;

pub use error::{Error, Result};
pub use loader::{Definitions, Loader};
pub use messages::{MessageCatalog, MessageResolver};
pub use ruleset::RuleSet;
pub use schema::{EventTable, RoleInfo, RuleBlock, StateInfo, StateMessage};
