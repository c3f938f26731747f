//! Earshot Core - tree model and building blocks for spoken/braille output
//!
//! This crate provides the types shared by the formatter crates:
//! - Dynamic attribute values (`Value`, `ValueMap`)
//! - Node, role, event and earcon identifiers
//! - The accessibility tree provider trait (`AccessTree`) and an in-memory tree
//! - Cursors and ranges addressing nodes or text inside a node
//! - The template token parser (`ExprTree`)
//! - Annotated output fragments and their effects

mod cursor;
mod error;
mod expr;
mod fragment;
mod identity;
mod tree;
mod value;

pub use cursor::{Cursor, Direction, Range};
pub use error::{Error, Result};
pub use expr::{split_template, Args, ExprId, ExprNode, ExprTree};
pub use fragment::{Annotation, Buffer, Effect, Fragment, SelectionSpan};
pub use identity::{EarconId, EventKind, NodeId, RoleId};
pub use tree::{AccessTree, Node, NodeQuery, NodeSpec, NodeTree, Rect, StateMap};
pub use value::{Value, ValueMap};
