//! Annotated output fragments
//!
//! Rendering produces a sequence of small text fragments. Each carries
//! annotations: the attribute that produced it, a selection span, or an
//! [`Effect`] to trigger when the fragment is spoken. Effects are plain
//! values; only the output composer turns them into side effects.

use crate::EarconId;
use serde::{Deserialize, Serialize};

/// A side effect attached to a fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Play an audio cue
    PlayEarcon(EarconId),
}

/// Selected sub-range of a fragment's text, in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSpan {
    pub start: usize,
    pub end: usize,
}

impl SelectionSpan {
    /// Create a span; the bounds are ordered so `start <= end`
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }
}

/// Annotation attached to a whole fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Annotation {
    /// Name of the attribute that produced the text (e.g. `name`, `state`)
    Attribute(String),
    /// Effect to run when the fragment starts playing
    Action(Effect),
    /// Text selection inside the fragment
    Selection(SelectionSpan),
}

/// One unit of rendered output
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Fragment {
    pub text: String,
    pub annotations: Vec<Annotation>,
}

impl Fragment {
    /// Create an unannotated fragment
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            annotations: Vec::new(),
        }
    }

    /// Add an annotation
    pub fn with(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Whether the fragment is tagged with the given attribute name
    pub fn has_attribute(&self, name: &str) -> bool {
        self.annotations
            .iter()
            .any(|a| matches!(a, Annotation::Attribute(n) if n == name))
    }

    /// Effects attached to this fragment
    pub fn effects(&self) -> impl Iterator<Item = &Effect> {
        self.annotations.iter().filter_map(|a| match a {
            Annotation::Action(effect) => Some(effect),
            _ => None,
        })
    }

    /// The first selection span, if any
    pub fn selection(&self) -> Option<SelectionSpan> {
        self.annotations.iter().find_map(|a| match a {
            Annotation::Selection(span) => Some(*span),
            _ => None,
        })
    }

    /// Length of the text in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.annotations.iter().filter_map(|a| match a {
            Annotation::Attribute(n) => Some(n.as_str()),
            _ => None,
        })
    }
}

/// Ordered fragments accumulated during one render pass
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Buffer {
    fragments: Vec<Fragment>,
}

impl Buffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment
    ///
    /// Fragments with neither text nor annotations are dropped. A `unique`
    /// fragment is dropped when any fragment already in the buffer carries
    /// one of its attribute annotations. Returns whether it was appended.
    pub fn append(&mut self, fragment: Fragment, unique: bool) -> bool {
        if fragment.text.is_empty() && fragment.annotations.is_empty() {
            return false;
        }
        if unique {
            let duplicate = fragment
                .attribute_names()
                .any(|name| self.fragments.iter().any(|f| f.has_attribute(name)));
            if duplicate {
                return false;
            }
        }
        self.fragments.push(fragment);
        true
    }

    /// Attach an annotation to the most recently appended fragment
    ///
    /// Returns `false` when the buffer is empty.
    pub fn annotate_last(&mut self, annotation: Annotation) -> bool {
        match self.fragments.last_mut() {
            Some(last) => {
                last.annotations.push(annotation);
                true
            }
            None => false,
        }
    }

    /// Move every fragment of `other` to the end of this buffer
    pub fn extend(&mut self, other: Buffer) {
        self.fragments.extend(other.fragments);
    }

    /// Fragments in order
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Iterate over fragments
    pub fn iter(&self) -> std::slice::Iter<'_, Fragment> {
        self.fragments.iter()
    }

    /// Consume the buffer into its fragments
    pub fn into_fragments(self) -> Vec<Fragment> {
        self.fragments
    }

    /// Number of fragments
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

impl<'a> IntoIterator for &'a Buffer {
    type Item = &'a Fragment;
    type IntoIter = std::slice::Iter<'a, Fragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.fragments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(text: &str) -> Fragment {
        Fragment::new(text).with(Annotation::Attribute("name".into()))
    }

    #[test]
    fn test_unique_fragments() {
        let mut buffer = Buffer::new();
        assert!(buffer.append(named("OK"), true));
        assert!(!buffer.append(named("Cancel"), true));
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.fragments()[0].text, "OK");

        // Non-unique appends are never suppressed.
        assert!(buffer.append(named("Cancel"), false));
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_empty_fragments() {
        let mut buffer = Buffer::new();
        assert!(!buffer.append(Fragment::new(""), false));
        assert!(buffer.append(named(""), false));
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_annotate_last() {
        let mut buffer = Buffer::new();
        let ding = Annotation::Action(Effect::PlayEarcon(EarconId::new("DING")));
        assert!(!buffer.annotate_last(ding.clone()));
        buffer.append(Fragment::new("OK"), false);
        assert!(buffer.annotate_last(ding));
        let effects: Vec<&Effect> = buffer.fragments()[0].effects().collect();
        assert_eq!(effects, vec![&Effect::PlayEarcon(EarconId::new("DING"))]);
    }

    #[test]
    fn test_selection_span_is_ordered() {
        let span = SelectionSpan::new(7, 2);
        assert_eq!((span.start, span.end), (2, 7));
        let fragment = Fragment::new("abcdefgh").with(Annotation::Selection(span));
        assert_eq!(fragment.selection(), Some(span));
    }
}
