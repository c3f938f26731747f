//! Parser for output template tokens
//!
//! A format template such as `$name $role @describe_index($indexInParent, $parentChildCount)`
//! is split into tokens, and each token is parsed into a small argument tree:
//! `(` opens the first argument of the current node, `,` starts the next
//! argument, `)` closes the list. Braces are copied literally and protect
//! commas inside embedded JSON queries.
//!
//! Trees live in an arena and refer to each other by [`ExprId`].

use crate::{Error, Result};

/// Index of a node inside an [`ExprTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprId(usize);

/// One node of a parsed token
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExprNode {
    /// Operator or literal text (e.g. `$name`, `@tag_h+$hierarchicalLevel`, `listItem`)
    pub value: String,
    /// First argument, when followed by a parenthesized list
    pub first_child: Option<ExprId>,
    /// Next argument at the same depth
    pub next_sibling: Option<ExprId>,
    /// Enclosing node
    pub parent: Option<ExprId>,
}

/// Arena holding the nodes of one parsed token; the root is always first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprTree {
    nodes: Vec<ExprNode>,
}

impl ExprTree {
    /// ID of the root node
    pub const ROOT: ExprId = ExprId(0);

    /// Parse a single template token
    pub fn parse(token: &str) -> Result<Self> {
        let mut tree = ExprTree {
            nodes: vec![ExprNode::default()],
        };
        let mut current = Self::ROOT;
        let mut braces: i32 = 0;

        for ch in token.chars() {
            match ch {
                '(' => {
                    let child = tree.push(ExprNode {
                        parent: Some(current),
                        ..ExprNode::default()
                    });
                    tree.nodes[current.0].first_child = Some(child);
                    current = child;
                }
                ')' => {
                    current = tree.nodes[current.0].parent.ok_or_else(|| Error::UnbalancedGrouping {
                        token: token.to_string(),
                    })?;
                }
                ',' if braces == 0 => {
                    let parent = tree.nodes[current.0].parent;
                    let sibling = tree.push(ExprNode {
                        parent,
                        ..ExprNode::default()
                    });
                    tree.nodes[current.0].next_sibling = Some(sibling);
                    current = sibling;
                }
                '{' => {
                    braces += 1;
                    tree.nodes[current.0].value.push(ch);
                }
                '}' => {
                    braces -= 1;
                    tree.nodes[current.0].value.push(ch);
                }
                _ => tree.nodes[current.0].value.push(ch),
            }
        }

        if current != Self::ROOT {
            return Err(Error::UnbalancedGrouping {
                token: token.to_string(),
            });
        }
        Ok(tree)
    }

    fn push(&mut self, node: ExprNode) -> ExprId {
        self.nodes.push(node);
        ExprId(self.nodes.len() - 1)
    }

    /// Get a node
    pub fn get(&self, id: ExprId) -> Option<&ExprNode> {
        self.nodes.get(id.0)
    }

    /// Text of a node (empty for unknown IDs)
    pub fn value(&self, id: ExprId) -> &str {
        self.get(id).map(|n| n.value.as_str()).unwrap_or("")
    }

    /// First argument of a node
    pub fn first_child(&self, id: ExprId) -> Option<ExprId> {
        self.get(id).and_then(|n| n.first_child)
    }

    /// Next argument after a node
    pub fn next_sibling(&self, id: ExprId) -> Option<ExprId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Arguments of a node, in order
    pub fn args(&self, id: ExprId) -> Args<'_> {
        Args {
            tree: self,
            next: self.first_child(id),
        }
    }

    /// Number of nodes in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A parsed tree always holds at least its root
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Serialize the tree back into token text
    pub fn to_template(&self) -> String {
        let mut out = String::new();
        self.write_node(Self::ROOT, &mut out);
        out
    }

    fn write_node(&self, id: ExprId, out: &mut String) {
        out.push_str(self.value(id));
        if self.first_child(id).is_some() {
            out.push('(');
            for (i, arg) in self.args(id).enumerate() {
                if i > 0 {
                    out.push(',');
                }
                self.write_node(arg, out);
            }
            out.push(')');
        }
    }
}

/// Iterator over the arguments of an expression node
pub struct Args<'a> {
    tree: &'a ExprTree,
    next: Option<ExprId>,
}

impl Iterator for Args<'_> {
    type Item = ExprId;

    fn next(&mut self) -> Option<ExprId> {
        let id = self.next?;
        self.next = self.tree.next_sibling(id);
        Some(id)
    }
}

/// Split a format template into tokens
///
/// Whitespace right after `,` or `:` is dropped so argument lists and
/// embedded JSON stay inside one token; any other whitespace ends the token.
/// An unclosed `(` therefore only spoils its own token.
pub fn split_template(template: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut after_separator = false;

    for ch in template.chars() {
        if ch.is_whitespace() {
            if !after_separator && !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            continue;
        }
        after_separator = matches!(ch, ',' | ':');
        current.push(ch);
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_token() {
        let tree = ExprTree::parse("$name=").unwrap();
        assert_eq!(tree.value(ExprTree::ROOT), "$name=");
        assert_eq!(tree.first_child(ExprTree::ROOT), None);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_parse_arguments() {
        let tree = ExprTree::parse("@describe_index($indexInParent,$parentChildCount)").unwrap();
        assert_eq!(tree.value(ExprTree::ROOT), "@describe_index");
        let args: Vec<&str> = tree.args(ExprTree::ROOT).map(|id| tree.value(id)).collect();
        assert_eq!(args, vec!["$indexInParent", "$parentChildCount"]);
    }

    #[test]
    fn test_parse_nested_arguments() {
        let tree = ExprTree::parse("$if($checked,@describe_radio_selected($name),@describe_radio_unselected($name))")
            .unwrap();
        let args: Vec<ExprId> = tree.args(ExprTree::ROOT).collect();
        assert_eq!(args.len(), 3);
        assert_eq!(tree.value(args[1]), "@describe_radio_selected");
        let inner = tree.first_child(args[1]).unwrap();
        assert_eq!(tree.value(inner), "$name");
        assert_eq!(tree.get(inner).unwrap().parent, Some(args[1]));
    }

    #[test]
    fn test_braces_protect_commas() {
        let tree =
            ExprTree::parse(r#"$find({"state":{"selected":true,"invisible":false}},@describe_index($indexInParent))"#)
                .unwrap();
        let args: Vec<ExprId> = tree.args(ExprTree::ROOT).collect();
        assert_eq!(args.len(), 2);
        assert_eq!(tree.value(args[0]), r#"{"state":{"selected":true,"invisible":false}}"#);
        assert_eq!(tree.value(args[1]), "@describe_index");
    }

    #[test]
    fn test_unbalanced_grouping() {
        assert!(matches!(
            ExprTree::parse("$if($a,b"),
            Err(Error::UnbalancedGrouping { .. })
        ));
        assert!(ExprTree::parse("$name)").is_err());
        assert!(ExprTree::parse("a,b").is_err());
    }

    #[test]
    fn test_round_trip() {
        for template in [
            "$name",
            "@list_with_items($countChildren(listItem))",
            "$if($haspopup,@describe_menu_item_with_submenu($name),@describe_menu_item($name))",
            r#"$find({"state":{"selected":true}},@describe_index($indexInParent,$parentChildCount))"#,
        ] {
            let first = ExprTree::parse(template).unwrap();
            let second = ExprTree::parse(&first.to_template()).unwrap();
            assert_eq!(first, second);
            assert_eq!(first.to_template(), template);
        }
    }

    #[test]
    fn test_split_template() {
        let tokens = split_template("$name  $role @describe_index($indexInParent, $parentChildCount)");
        assert_eq!(
            tokens,
            vec!["$name", "$role", "@describe_index($indexInParent,$parentChildCount)"]
        );

        let tokens = split_template(
            r#"$value $find({"state": {"selected": true, "invisible": false}}, @describe_index($indexInParent)) "#,
        );
        assert_eq!(tokens.len(), 2);
        assert_eq!(
            tokens[1],
            r#"$find({"state":{"selected":true,"invisible":false}},@describe_index($indexInParent))"#
        );
        assert!(split_template("   ").is_empty());

        let tokens = split_template("$if($name, @a $name");
        assert_eq!(tokens, vec!["$if($name,@a", "$name"]);
    }
}
