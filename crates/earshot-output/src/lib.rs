//! Earshot Output - speech and tactile rendering of accessibility trees
//!
//! Given a tree, a rule set and a message catalog, the [`Formatter`] turns a
//! range (usually the focused node) into:
//! - a speech buffer of annotated fragments, queued as utterances
//! - a tactile (braille) buffer joined into one line with its selection
//! - the screen locations of the nodes that were rendered
//!
//! Rendering is pure; only [`Rendered::execute`] touches the sinks.
//!
//! # Example
//!
//! ```
//! use earshot_core::{EventKind, NodeTree, Range};
//! use earshot_output::Formatter;
//! use earshot_rules::{MessageCatalog, RuleSet};
//!
//! let mut tree = NodeTree::new();
//! let root = tree.set_root("window").set("name", "Main").id;
//! let ok = tree.add_child(root, "button").unwrap().set("name", "OK").id;
//!
//! let rules = RuleSet::builtin().unwrap();
//! let messages = MessageCatalog::builtin().unwrap();
//! let formatter = Formatter::new(&tree, &rules, &messages);
//!
//! let rendered = formatter.render(&Range::from_node(ok), None, &EventKind::navigate());
//! assert_eq!(rendered.speech_text(" "), "OK Button");
//! assert_eq!(rendered.tactile_text(), "OK btn");
//! ```

mod ancestry;
mod compose;
mod config;
mod context;
mod error;
mod eval;
mod formatter;
mod sink;
mod walker;

pub use compose::{speech_queue, tactile_output};
pub use config::FormatterConfig;
pub use context::Channel;
pub use error::{Error, Result};
pub use formatter::{Formatter, Rendered};
pub use sink::{
    EarconLog, EarconSink, HighlightSink, QueueMode, Recorder, Sinks, SpeechCallback, SpeechProperties,
    SpeechSink, TactileOutput, TactileSink, Utterance,
};
