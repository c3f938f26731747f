//! Accessibility tree: nodes, the provider trait and an in-memory tree

use crate::{Error, NodeId, Result, RoleId, Value, ValueMap};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Boolean state flags of a node; an absent key means "undefined"
pub type StateMap = IndexMap<String, bool>;

/// Screen bounds of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// A vertex in the accessibility tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for this node
    pub id: NodeId,
    /// The node's role
    pub role: RoleId,
    /// State flags (e.g. {"checked": true, "invisible": false})
    pub state: StateMap,
    /// Named attributes (e.g. {"name": "OK", "hierarchicalLevel": 2})
    pub attributes: ValueMap,
    /// Parent node, `None` for the root
    pub parent: Option<NodeId>,
    /// Ordered children
    pub children: Vec<NodeId>,
    /// Screen location, if the node is on screen
    pub location: Option<Rect>,
}

impl Node {
    /// Create a new detached node
    pub fn new(id: NodeId, role: impl Into<RoleId>) -> Self {
        Self {
            id,
            role: role.into(),
            state: StateMap::new(),
            attributes: ValueMap::new(),
            parent: None,
            children: Vec::new(),
            location: None,
        }
    }

    /// Get an attribute value; `Null` counts as absent
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key).filter(|v| !v.is_null())
    }

    /// Set an attribute value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Get a tri-state flag: `None` when the state is undefined
    pub fn state(&self, key: &str) -> Option<bool> {
        self.state.get(key).copied()
    }

    /// Set a state flag
    pub fn set_state(&mut self, key: impl Into<String>, on: bool) -> &mut Self {
        self.state.insert(key.into(), on);
        self
    }

    /// Set the screen location
    pub fn set_location(&mut self, location: Rect) -> &mut Self {
        self.location = Some(location);
        self
    }

    /// Accessible name, falling back to the `label` attribute
    pub fn name(&self) -> Option<String> {
        self.get("name")
            .and_then(Value::to_text)
            .filter(|s| !s.is_empty())
            .or_else(|| self.get("label").and_then(Value::to_text))
    }

    /// Text used for character-granularity output
    pub fn text(&self) -> String {
        self.get("value")
            .and_then(Value::to_text)
            .filter(|s| !s.is_empty())
            .or_else(|| self.name())
            .unwrap_or_default()
    }

    /// Whether the node is marked invisible
    pub fn is_invisible(&self) -> bool {
        self.state("invisible").unwrap_or(false)
    }
}

/// Structural predicate over a node's role, state and attributes
///
/// Parsed from the JSON object embedded in `$find(...)` templates, e.g.
/// `{"state": {"selected": true, "invisible": false}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeQuery {
    #[serde(default)]
    pub role: Option<RoleId>,
    #[serde(default)]
    pub state: StateMap,
    #[serde(default)]
    pub attributes: ValueMap,
}

impl NodeQuery {
    /// Parse a query from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::InvalidQuery(format!("{}: {}", text, e)))
    }

    /// Check whether `node` satisfies every constraint of this query
    ///
    /// An undefined state compares equal to `false`.
    pub fn matches(&self, node: &Node) -> bool {
        if let Some(role) = &self.role {
            if &node.role != role {
                return false;
            }
        }
        let states_match = self
            .state
            .iter()
            .all(|(key, want)| node.state(key).unwrap_or(false) == *want);
        let attributes_match = self
            .attributes
            .iter()
            .all(|(key, want)| node.get(key) == Some(want));
        states_match && attributes_match
    }
}

/// Read-only view of an accessibility tree
///
/// Implementors only provide node lookup and the root; navigation helpers
/// are derived from the parent/children links.
pub trait AccessTree {
    /// The root node
    fn root(&self) -> Option<NodeId>;

    /// Look up a node
    fn node(&self, id: NodeId) -> Option<&Node>;

    /// Parent of a node
    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Ordered children of a node
    fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Role of a node
    fn role(&self, id: NodeId) -> Option<&RoleId> {
        self.node(id).map(|n| &n.role)
    }

    /// The node followed by its ancestors, nearest first
    fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = self.node(id).map(|n| n.id);
        while let Some(node) = current {
            chain.push(node);
            current = self.parent(node);
        }
        chain
    }

    /// Zero-based position among the parent's children
    fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// A node is a leaf when it has no visible children
    fn is_leaf(&self, id: NodeId) -> bool {
        self.children(id)
            .iter()
            .all(|&c| self.node(c).map(Node::is_invisible).unwrap_or(true))
    }

    /// First visible leaf of the subtree rooted at `id` (inclusive)
    fn first_leaf(&self, id: NodeId) -> Option<NodeId> {
        let node = self.node(id)?;
        if node.is_invisible() {
            return None;
        }
        if self.is_leaf(id) {
            return Some(id);
        }
        self.children(id).iter().find_map(|&c| self.first_leaf(c))
    }

    /// Last visible leaf of the subtree rooted at `id` (inclusive)
    fn last_leaf(&self, id: NodeId) -> Option<NodeId> {
        let node = self.node(id)?;
        if node.is_invisible() {
            return None;
        }
        if self.is_leaf(id) {
            return Some(id);
        }
        self.children(id).iter().rev().find_map(|&c| self.last_leaf(c))
    }

    /// Next node in pre-order (document order)
    fn next_in_order(&self, id: NodeId) -> Option<NodeId> {
        if let Some(&first) = self.children(id).first() {
            return Some(first);
        }
        let mut current = id;
        loop {
            let parent = self.parent(current)?;
            let siblings = self.children(parent);
            let index = siblings.iter().position(|&c| c == current)?;
            if let Some(&next) = siblings.get(index + 1) {
                return Some(next);
            }
            current = parent;
        }
    }

    /// Next visible leaf after `id` in document order
    fn next_leaf(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.next_in_order(id);
        while let Some(candidate) = current {
            let visible = self.node(candidate).map(|n| !n.is_invisible()).unwrap_or(false);
            if visible && self.is_leaf(candidate) {
                return Some(candidate);
            }
            current = self.next_in_order(candidate);
        }
        None
    }

    /// Whether `a` comes strictly before `b` in document order
    ///
    /// An ancestor precedes its descendants.
    fn precedes(&self, a: NodeId, b: NodeId) -> bool {
        if a == b {
            return false;
        }
        let mut chain_a = self.ancestors(a);
        let mut chain_b = self.ancestors(b);
        chain_a.reverse();
        chain_b.reverse();
        let shared = chain_a
            .iter()
            .zip(chain_b.iter())
            .take_while(|(x, y)| x == y)
            .count();
        match (chain_a.get(shared), chain_b.get(shared)) {
            (None, _) => true,
            (_, None) => false,
            (Some(&x), Some(&y)) => {
                let ix = self.index_in_parent(x).unwrap_or(0);
                let iy = self.index_in_parent(y).unwrap_or(0);
                ix < iy
            }
        }
    }

    /// First strict descendant of `id` (pre-order) matching `query`
    fn find(&self, id: NodeId, query: &NodeQuery) -> Option<NodeId> {
        self.children(id).iter().find_map(|&child| {
            let node = self.node(child)?;
            if query.matches(node) {
                Some(child)
            } else {
                self.find(child, query)
            }
        })
    }
}

/// Nested description of a subtree, convenient to write in RON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSpec {
    pub role: RoleId,
    #[serde(default)]
    pub attributes: ValueMap,
    #[serde(default)]
    pub state: StateMap,
    #[serde(default)]
    pub location: Option<Rect>,
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

/// In-memory accessibility tree
#[derive(Debug, Clone, Default)]
pub struct NodeTree {
    /// All nodes by ID
    nodes: IndexMap<NodeId, Node>,
    /// Next node ID to assign
    next_id: u64,
    /// Root node
    root: Option<NodeId>,
}

impl NodeTree {
    /// Create a new empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from a nested node description
    pub fn from_spec(spec: &NodeSpec) -> Self {
        let mut tree = Self::new();
        let root = tree.set_root(spec.role.clone()).id;
        tree.fill(root, spec);
        tree
    }

    fn fill(&mut self, id: NodeId, spec: &NodeSpec) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.attributes = spec.attributes.clone();
            node.state = spec.state.clone();
            node.location = spec.location;
        }
        for child in &spec.children {
            if let Ok(child_node) = self.add_child(id, child.role.clone()) {
                let child_id = child_node.id;
                self.fill(child_id, child);
            }
        }
    }

    fn allocate(&mut self) -> NodeId {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Create the root node, detaching any previous root
    pub fn set_root(&mut self, role: impl Into<RoleId>) -> &mut Node {
        let id = self.allocate();
        self.root = Some(id);
        self.nodes.entry(id).or_insert_with(|| Node::new(id, role))
    }

    /// Create a node as the last child of `parent`
    pub fn add_child(&mut self, parent: NodeId, role: impl Into<RoleId>) -> Result<&mut Node> {
        if !self.nodes.contains_key(&parent) {
            return Err(Error::NodeNotFound(parent));
        }
        let id = self.allocate();
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        let mut node = Node::new(id, role);
        node.parent = Some(parent);
        Ok(self.nodes.entry(id).or_insert(node))
    }

    /// Get a mutable reference to a node
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Find the first node (insertion order) with the given role and name
    pub fn find_named(&self, role: &str, name: &str) -> Option<NodeId> {
        self.nodes
            .values()
            .find(|n| n.role == role && n.name().as_deref() == Some(name))
            .map(|n| n.id)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl AccessTree for NodeTree {
    fn root(&self) -> Option<NodeId> {
        self.root
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // window > list > [item Alpha, item Beta], button OK
    fn sample() -> (NodeTree, NodeId, NodeId, NodeId, NodeId) {
        let mut tree = NodeTree::new();
        let window = tree.set_root("window").id;
        let list = tree.add_child(window, "list").unwrap().id;
        let alpha = tree.add_child(list, "listItem").unwrap().set("name", "Alpha").id;
        let beta = tree.add_child(list, "listItem").unwrap().set("name", "Beta").id;
        let ok = tree.add_child(window, "button").unwrap().set("name", "OK").id;
        (tree, list, alpha, beta, ok)
    }

    #[test]
    fn test_node_attributes() {
        let mut node = Node::new(NodeId::new(1), "button");
        node.set("label", "Close").set_state("focused", true);
        assert_eq!(node.name().as_deref(), Some("Close"));
        assert_eq!(node.state("focused"), Some(true));
        assert_eq!(node.state("checked"), None);
        node.set("name", "Dismiss");
        assert_eq!(node.name().as_deref(), Some("Dismiss"));
    }

    #[test]
    fn test_ancestors_and_index() {
        let (tree, list, alpha, beta, _) = sample();
        let root = tree.root().unwrap();
        assert_eq!(tree.ancestors(beta), vec![beta, list, root]);
        assert_eq!(tree.index_in_parent(alpha), Some(0));
        assert_eq!(tree.index_in_parent(beta), Some(1));
        assert_eq!(tree.index_in_parent(root), None);
    }

    #[test]
    fn test_leaves_and_order() {
        let (tree, list, alpha, beta, ok) = sample();
        let root = tree.root().unwrap();
        assert!(!tree.is_leaf(list));
        assert_eq!(tree.first_leaf(root), Some(alpha));
        assert_eq!(tree.last_leaf(root), Some(ok));
        assert_eq!(tree.next_leaf(alpha), Some(beta));
        assert_eq!(tree.next_leaf(beta), Some(ok));
        assert_eq!(tree.next_leaf(ok), None);
        assert!(tree.precedes(alpha, ok));
        assert!(tree.precedes(list, beta));
        assert!(!tree.precedes(ok, beta));
    }

    #[test]
    fn test_invisible_children_make_leaf() {
        let (mut tree, list, alpha, beta, _) = sample();
        tree.get_mut(alpha).unwrap().set_state("invisible", true);
        tree.get_mut(beta).unwrap().set_state("invisible", true);
        assert!(tree.is_leaf(list));
        assert_eq!(tree.first_leaf(list), Some(list));
    }

    #[test]
    fn test_find_with_query() {
        let (mut tree, list, _, beta, _) = sample();
        tree.get_mut(beta).unwrap().set_state("selected", true);
        let query = NodeQuery::from_json(r#"{"state": {"selected": true, "invisible": false}}"#).unwrap();
        assert_eq!(tree.find(list, &query), Some(beta));

        let query = NodeQuery::from_json(r#"{"role": "button"}"#).unwrap();
        assert_eq!(tree.find(list, &query), None);
        assert!(NodeQuery::from_json("{not json").is_err());
    }

    #[test]
    fn test_from_spec() {
        let spec: NodeSpec = ron::from_str(
            r#"(
                role: "window",
                attributes: {"name": "Main"},
                children: [
                    (role: "checkBox", attributes: {"name": "Wifi"}, state: {"checked": true}),
                ],
            )"#,
        )
        .unwrap();
        let tree = NodeTree::from_spec(&spec);
        assert_eq!(tree.len(), 2);
        let wifi = tree.find_named("checkBox", "Wifi").unwrap();
        assert_eq!(tree.node(wifi).unwrap().state("checked"), Some(true));
        assert_eq!(tree.parent(wifi), tree.root());
    }
}
