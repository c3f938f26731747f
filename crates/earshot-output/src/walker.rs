//! Range walker

use crate::context::{Channel, RenderContext, SUB_NODE_EXCLUDE};
use earshot_core::{AccessTree, Buffer, Fragment, NodeId, Range};

impl RenderContext<'_> {
    /// Render a range, diffing against the previously announced range
    pub fn render_range(&mut self, range: &Range, previous: Option<&Range>, event: &str, buff: &mut Buffer) {
        if range.is_sub_node() {
            self.render_sub_node(range, previous, event, buff);
        } else {
            self.render_node_range(range, previous, event, buff);
        }
    }

    /// Text inside one node: container transitions, then the covered characters
    fn render_sub_node(&mut self, range: &Range, previous: Option<&Range>, event: &str, buff: &mut Buffer) {
        let tree = self.tree;
        let previous = previous.copied().unwrap_or(*range);
        let direction = range.direction_from(&previous, tree);
        let prev_node = previous.bound(direction);
        let node = range.start.node;
        self.ancestry(node, prev_node, event, buff, SUB_NODE_EXCLUDE);

        let start = range.start.offset.unwrap_or(0);
        let mut end = range.end.offset.unwrap_or(start);
        if start == end {
            // A caret move still says the character under it.
            end += 1;
        }
        let (start, end) = (start.min(end), start.max(end));
        let text: String = tree
            .node(node)
            .map(|n| n.text())
            .unwrap_or_default()
            .chars()
            .skip(start)
            .take(end - start)
            .collect();
        buff.append(Fragment::new(text), false);
    }

    /// Nodes from start to end, leaf by leaf in document order
    pub fn render_node_range(&mut self, range: &Range, previous: Option<&Range>, event: &str, buff: &mut Buffer) {
        let tree = self.tree;
        let end = range.end.node;
        let mut cursor = range.start.node;
        let mut prev_node = previous
            .map(|p| p.start.node)
            .or_else(|| tree.root())
            .unwrap_or(cursor);

        while cursor != end {
            self.render_node_and_ancestry(cursor, prev_node, event, buff);
            prev_node = cursor;
            match tree.next_leaf(cursor) {
                Some(next) if next != cursor && !tree.precedes(end, next) => cursor = next,
                _ => break,
            }
        }
        self.render_node_and_ancestry(end, prev_node, event, buff);
    }

    fn render_node_and_ancestry(&mut self, node: NodeId, prev: NodeId, event: &str, buff: &mut Buffer) {
        tracing::trace!(%node, %prev, event, "rendering node");
        let mut temp = Buffer::new();
        self.ancestry(node, prev, event, &mut temp, &[]);
        self.render_node(node, event, &mut temp);
        if self.channel == Channel::Speech {
            if let Some(location) = self.tree.node(node).and_then(|n| n.location) {
                self.locations.push(location);
            }
        }
        buff.extend(temp);
    }

    /// The node's own `speak` (or `braille`) template
    fn render_node(&mut self, node: NodeId, event: &str, buff: &mut Buffer) {
        let Some(role) = self.tree.role(node) else {
            return;
        };
        if let Some(template) = self.rules.speak_template(event, role.as_str(), self.is_tactile()) {
            self.format(Some(node), &template, buff, &[]);
        }
    }
}
