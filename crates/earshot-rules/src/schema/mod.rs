//! Schema definitions for RON rule documents

pub mod role;
pub mod rule;
pub mod state;

pub use role::RoleInfo;
pub use rule::{EventTable, RuleBlock};
pub use state::{StateInfo, StateMessage};
