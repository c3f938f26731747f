//! Positions in the tree: cursors and ranges

use crate::{AccessTree, NodeId};
use serde::{Deserialize, Serialize};

/// Direction of a movement between two ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// A position: a whole node, or a character offset inside a node's text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cursor {
    pub node: NodeId,
    /// Character offset; `None` addresses the whole node
    pub offset: Option<usize>,
}

impl Cursor {
    /// Cursor on a whole node
    pub fn node(node: NodeId) -> Self {
        Self { node, offset: None }
    }

    /// Cursor at a character offset within a node's text
    pub fn at(node: NodeId, offset: usize) -> Self {
        Self {
            node,
            offset: Some(offset),
        }
    }
}

/// An ordered pair of cursors delimiting what should be announced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Cursor,
    pub end: Cursor,
}

impl Range {
    /// Create a range between two cursors
    pub fn new(start: Cursor, end: Cursor) -> Self {
        Self { start, end }
    }

    /// Range covering exactly one node
    pub fn from_node(node: NodeId) -> Self {
        Self::new(Cursor::node(node), Cursor::node(node))
    }

    /// Range spanning from one node to another
    pub fn between(start: NodeId, end: NodeId) -> Self {
        Self::new(Cursor::node(start), Cursor::node(end))
    }

    /// Character range within a single node's text
    pub fn text(node: NodeId, start: usize, end: usize) -> Self {
        Self::new(Cursor::at(node, start), Cursor::at(node, end))
    }

    /// Whether this range addresses text inside one node
    pub fn is_sub_node(&self) -> bool {
        self.start.node == self.end.node && self.start.offset.is_some() && self.end.offset.is_some()
    }

    /// Direction of travel from `previous` to `self`
    ///
    /// Moving within the same node compares offsets; otherwise document
    /// order of the start nodes decides.
    pub fn direction_from(&self, previous: &Range, tree: &dyn AccessTree) -> Direction {
        let from = previous.start;
        let to = self.start;
        let backward = if from.node == to.node {
            to.offset.unwrap_or(0) < from.offset.unwrap_or(0)
        } else {
            tree.precedes(to.node, from.node)
        };
        if backward {
            Direction::Backward
        } else {
            Direction::Forward
        }
    }

    /// The node at the bound facing the direction of travel
    pub fn bound(&self, direction: Direction) -> NodeId {
        match direction {
            Direction::Forward => self.end.node,
            Direction::Backward => self.start.node,
        }
    }
}
