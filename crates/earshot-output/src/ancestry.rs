//! Ancestry differ
//!
//! When focus moves from one node to another, announces the containers
//! being left, the containers being entered, and the context that still
//! holds (`stay`).

use crate::context::RenderContext;
use earshot_core::{AccessTree, Buffer, NodeId, RoleId};
use indexmap::IndexSet;

/// `to` and its ancestors that are not ancestors of `from` (both inclusive), nearest first
pub(crate) fn unique_ancestors(tree: &dyn AccessTree, from: NodeId, to: NodeId) -> Vec<NodeId> {
    let shared: IndexSet<NodeId> = tree.ancestors(from).into_iter().collect();
    tree.ancestors(to)
        .into_iter()
        .filter(|n| !shared.contains(n))
        .collect()
}

impl RenderContext<'_> {
    /// Render the transitions for a move from `prev` to `node`
    pub fn ancestry(&mut self, node: NodeId, prev: NodeId, event: &str, buff: &mut Buffer, exclude: &[&str]) {
        let tree = self.tree;
        let left = unique_ancestors(tree, node, prev);
        let entered = unique_ancestors(tree, prev, node);

        for &container in &left {
            let Some(role) = tree.role(container) else {
                continue;
            };
            if let Some(leave) = self.rules.resolve_rule_block(event, role.as_str()).leave {
                self.format(Some(container), &leave, buff, exclude);
            }
        }

        // Nearest first, skipping the target itself; emitted farthest first.
        let mut enter_outputs = Vec::new();
        let mut entered_roles: IndexSet<&RoleId> = IndexSet::new();
        for &container in entered.iter().skip(1) {
            let Some(role) = tree.role(container) else {
                continue;
            };
            if let Some(enter) = self.rules.resolve_rule_block(event, role.as_str()).enter {
                if self.config.suppress_repeated_enter_roles && !entered_roles.insert(role) {
                    continue;
                }
                let mut temp = Buffer::new();
                self.format(Some(container), &enter, &mut temp, exclude);
                enter_outputs.push(temp);
            }
            if self.config.stop_enter_at_window && *role == self.config.window_role {
                break;
            }
        }
        for output in enter_outputs.into_iter().rev() {
            buff.extend(output);
        }

        if exclude.contains(&"stay") {
            return;
        }
        let common = match entered.last() {
            Some(&farthest) => tree.parent(farthest),
            None if node == prev => tree.parent(node),
            None => None,
        };
        let mut current = common;
        while let Some(container) = current {
            if let Some(role) = tree.role(container) {
                if let Some(stay) = self.rules.resolve_rule_block(event, role.as_str()).stay {
                    self.format(Some(container), &stay, buff, exclude);
                }
            }
            current = tree.parent(container);
        }
    }
}
