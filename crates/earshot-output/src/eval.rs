//! Token evaluator
//!
//! Evaluates format templates against a node, appending fragments to a
//! buffer. Tokens start with a prefix:
//! - `$attr` reads an attribute, a built-in, a state or calls a function
//! - `@message+$attr(args...)` resolves a localized message
//! - `!flag` sets a render-wide speech property
//!
//! A trailing `=` on the operator marks the output unique within the buffer.
//! Nothing here fails: malformed tokens and queries are logged and skipped.

use crate::context::{RenderContext, MAX_DEPTH};
use earshot_core::{
    split_template, AccessTree, Annotation, Buffer, Cursor, Effect, EarconId, EventKind, ExprId,
    ExprTree, Fragment, Node, NodeId, NodeQuery, Range, SelectionSpan, Value,
};

/// Attribute tokens with dedicated handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Builtin {
    Value,
    Name,
    NameOrDescendants,
    IndexInParent,
    ParentChildCount,
    State,
    Find,
    Descendants,
    Role,
    TableRowIndex,
    TableCellColumnIndex,
}

impl Builtin {
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "value" => Self::Value,
            "name" => Self::Name,
            "nameOrDescendants" => Self::NameOrDescendants,
            "indexInParent" => Self::IndexInParent,
            "parentChildCount" => Self::ParentChildCount,
            "state" => Self::State,
            "find" => Self::Find,
            "descendants" => Self::Descendants,
            "role" => Self::Role,
            "tableRowIndex" => Self::TableRowIndex,
            "tableCellColumnIndex" => Self::TableCellColumnIndex,
            _ => return None,
        })
    }
}

/// Functions, recognized only when the token has an argument list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Function {
    If,
    Earcon,
    CountChildren,
}

impl Function {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "if" => Some(Self::If),
            "earcon" => Some(Self::Earcon),
            "countChildren" => Some(Self::CountChildren),
            _ => None,
        }
    }
}

/// Token prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prefix {
    Attribute,
    Message,
    Flag,
}

/// Operator of a parsed token, split into prefix, name and uniqueness
#[derive(Debug, Clone, Copy)]
struct Operator<'t> {
    prefix: Prefix,
    name: &'t str,
    unique: bool,
}

impl<'t> Operator<'t> {
    fn parse(value: &'t str) -> Option<Self> {
        let (value, unique) = match value.strip_suffix('=') {
            Some(rest) => (rest, true),
            None => (value, false),
        };
        let mut chars = value.chars();
        let prefix = match chars.next()? {
            '$' => Prefix::Attribute,
            '@' => Prefix::Message,
            '!' => Prefix::Flag,
            _ => return None,
        };
        Some(Self {
            prefix,
            name: chars.as_str(),
            unique,
        })
    }
}

impl RenderContext<'_> {
    /// Evaluate every token of a template
    pub fn format(&mut self, node: Option<NodeId>, template: &str, buff: &mut Buffer, exclude: &[&str]) {
        for token in split_template(template) {
            match ExprTree::parse(&token) {
                Ok(expr) => self.format_expr(node, &expr, ExprTree::ROOT, buff, exclude),
                Err(e) => tracing::warn!(error = %e, "skipping malformed template token"),
            }
        }
    }

    /// Evaluate one parsed token (or argument subtree)
    pub fn format_expr(
        &mut self,
        node: Option<NodeId>,
        expr: &ExprTree,
        id: ExprId,
        buff: &mut Buffer,
        exclude: &[&str],
    ) {
        let value = expr.value(id);
        let Some(op) = Operator::parse(value) else {
            if !value.is_empty() {
                tracing::debug!(token = value, "ignoring token without a prefix");
            }
            return;
        };
        if exclude.contains(&op.name) {
            return;
        }

        match op.prefix {
            Prefix::Attribute => self.eval_attribute(node, expr, id, op, buff),
            Prefix::Message => self.eval_message(node, expr, id, op, buff),
            Prefix::Flag => {
                self.properties.insert(op.name.to_string(), true);
            }
        }
    }

    fn eval_attribute(&mut self, node: Option<NodeId>, expr: &ExprTree, id: ExprId, op: Operator<'_>, buff: &mut Buffer) {
        let tree = self.tree;
        let Some(node) = node.and_then(|n| tree.node(n)) else {
            // Without a node only buffer-level functions apply.
            if Function::parse(op.name) == Some(Function::Earcon) {
                self.call_function(None, Function::Earcon, expr, id, buff);
            }
            return;
        };

        if let Some(builtin) = Builtin::parse(op.name) {
            self.eval_builtin(node, builtin, expr, id, op.unique, buff);
        } else if let Some(text) = node.get(op.name).and_then(Value::to_text) {
            buff.append(Fragment::new(text).with(Annotation::Attribute(op.name.to_string())), op.unique);
        } else if let Some(info) = self.rules.state_info(op.name) {
            let Some(message) = info.message(node.state(op.name)) else {
                return;
            };
            let Some(text) = self.message(&message.msg_id, &[]) else {
                tracing::warn!(state = op.name, msg_id = %message.msg_id, "missing state message");
                return;
            };
            let mut fragment = Fragment::new(text).with(Annotation::Attribute("state".to_string()));
            if let Some(earcon) = &message.earcon {
                fragment = fragment.with(Annotation::Action(Effect::PlayEarcon(earcon.clone())));
            }
            buff.append(fragment, op.unique);
        } else if expr.first_child(id).is_some() {
            match Function::parse(op.name) {
                Some(function) => self.call_function(Some(node), function, expr, id, buff),
                None => tracing::debug!(function = op.name, "unknown template function"),
            }
        }
    }

    fn eval_builtin(
        &mut self,
        node: &Node,
        builtin: Builtin,
        expr: &ExprTree,
        id: ExprId,
        unique: bool,
        buff: &mut Buffer,
    ) {
        let tree = self.tree;
        match builtin {
            Builtin::Value => {
                let text = node.get("value").and_then(Value::to_text);
                let mut fragment = Fragment::new(text.clone().unwrap_or_default());
                if text.is_some() {
                    if let Some(start) = node.get("textSelStart").and_then(Value::as_int) {
                        let end = node.get("textSelEnd").and_then(Value::as_int).unwrap_or(start);
                        fragment = fragment.with(Annotation::Selection(SelectionSpan::new(
                            start.max(0) as usize,
                            end.max(0) as usize,
                        )));
                    }
                }
                // Text leaves carry their ancestor's name; tag them so it is not repeated.
                let tag = if self.config.is_text_leaf(&node.role) { "name" } else { "value" };
                buff.append(fragment.with(Annotation::Attribute(tag.to_string())), unique);
            }
            Builtin::Name => {
                let mut fragment = Fragment::new(node.name().unwrap_or_default())
                    .with(Annotation::Attribute("name".to_string()));
                if let Some(earcon) = self.role_earcon(node.id) {
                    fragment = fragment.with(Annotation::Action(Effect::PlayEarcon(earcon)));
                }
                buff.append(fragment, unique);
            }
            Builtin::NameOrDescendants => match node.name() {
                Some(name) => {
                    buff.append(
                        Fragment::new(name).with(Annotation::Attribute("nameOrDescendants".to_string())),
                        unique,
                    );
                }
                None => self.format(Some(node.id), "$descendants", buff, &[]),
            },
            Builtin::IndexInParent => {
                if let Some(index) = tree.index_in_parent(node.id) {
                    buff.append(Fragment::new((index + 1).to_string()), false);
                }
            }
            Builtin::ParentChildCount => {
                if let Some(parent) = node.parent {
                    buff.append(Fragment::new(tree.children(parent).len().to_string()), false);
                }
            }
            Builtin::State => {
                for (key, _) in node.state.iter().filter(|(_, on)| **on) {
                    buff.append(
                        Fragment::new(key.clone()).with(Annotation::Attribute("state".to_string())),
                        unique,
                    );
                }
            }
            Builtin::Find => self.find(node, expr, id, buff),
            Builtin::Descendants => self.descendants(node.id, buff),
            Builtin::Role => {
                let text = match self.rules.role_info(node.role.as_str()) {
                    Some(info) => self.message(&info.msg_id, &[]).unwrap_or_default(),
                    None => {
                        tracing::warn!(role = %node.role, "missing role metadata");
                        node.role.to_string()
                    }
                };
                buff.append(Fragment::new(text).with(Annotation::Attribute("role".to_string())), unique);
            }
            Builtin::TableRowIndex | Builtin::TableCellColumnIndex => {
                let name = if builtin == Builtin::TableRowIndex {
                    "tableRowIndex"
                } else {
                    "tableCellColumnIndex"
                };
                match node.get(name).and_then(Value::as_int) {
                    Some(index) if index != 0 => {
                        buff.append(
                            Fragment::new((index + 1).to_string()).with(Annotation::Attribute(name.to_string())),
                            unique,
                        );
                    }
                    _ => {}
                }
            }
        }
    }

    /// Earcon of the nearest ancestor (inclusive) whose role declares one
    fn role_earcon(&self, node: NodeId) -> Option<EarconId> {
        self.tree.ancestors(node).into_iter().find_map(|ancestor| {
            let role = self.tree.role(ancestor)?;
            self.rules.role_info(role.as_str())?.earcon.clone()
        })
    }

    fn find(&mut self, node: &Node, expr: &ExprTree, id: ExprId, buff: &mut Buffer) {
        let Some(query_id) = expr.first_child(id) else {
            return;
        };
        let query = match NodeQuery::from_json(expr.value(query_id)) {
            Ok(query) => query,
            Err(e) => {
                tracing::warn!(error = %e, "skipping $find with malformed query");
                return;
            }
        };
        let target = self.tree.find(node.id, &query);
        if let (Some(target), Some(template)) = (target, expr.next_sibling(query_id)) {
            self.format_expr(Some(target), expr, template, buff, &[]);
        }
    }

    fn descendants(&mut self, node: NodeId, buff: &mut Buffer) {
        let tree = self.tree;
        if tree.is_leaf(node) {
            return;
        }
        let (Some(first), Some(last)) = (tree.first_leaf(node), tree.last_leaf(node)) else {
            return;
        };
        if self.depth >= MAX_DEPTH {
            tracing::warn!(%node, "descendant rendering nested too deeply");
            return;
        }
        self.depth += 1;
        let range = Range::new(Cursor::node(first), Cursor::node(last));
        self.render_node_range(&range, Some(&Range::from_node(node)), EventKind::NAVIGATE, buff);
        self.depth -= 1;
    }

    fn call_function(&mut self, node: Option<&Node>, function: Function, expr: &ExprTree, id: ExprId, buff: &mut Buffer) {
        let Some(first) = expr.first_child(id) else {
            return;
        };
        match function {
            Function::If => {
                let Some(node) = node else {
                    return;
                };
                let cond = expr.value(first);
                let attr = cond.strip_prefix('$').unwrap_or(cond);
                let holds = node.get(attr).map(Value::is_truthy).unwrap_or(false)
                    || node.state(attr).unwrap_or(false);
                let then_branch = expr.next_sibling(first);
                let branch = if holds {
                    then_branch
                } else {
                    then_branch.and_then(|t| expr.next_sibling(t))
                };
                if let Some(branch) = branch {
                    self.format_expr(Some(node.id), expr, branch, buff, &[]);
                }
            }
            Function::Earcon => {
                let earcon = EarconId::new(expr.value(first));
                if !buff.annotate_last(Annotation::Action(Effect::PlayEarcon(earcon))) {
                    tracing::trace!("earcon with empty buffer ignored");
                }
            }
            Function::CountChildren => {
                let Some(node) = node else {
                    return;
                };
                let role = expr.value(first);
                let tree = self.tree;
                let count = node
                    .children
                    .iter()
                    .filter(|&&child| tree.role(child).map(|r| r == role).unwrap_or(false))
                    .count();
                buff.append(Fragment::new(count.to_string()), false);
            }
        }
    }

    fn eval_message(&mut self, node: Option<NodeId>, expr: &ExprTree, id: ExprId, op: Operator<'_>, buff: &mut Buffer) {
        let tree = self.tree;
        let node_ref = node.and_then(|n| tree.node(n));

        // `@tag_h+$hierarchicalLevel` builds the ID from literal and attribute pieces.
        let msg_id: String = op
            .name
            .split('+')
            .map(|piece| match piece.strip_prefix('$') {
                Some(attr) => node_ref
                    .and_then(|n| n.get(attr))
                    .and_then(Value::to_text)
                    .unwrap_or_default(),
                None => piece.to_string(),
            })
            .collect();

        let mut args = Vec::new();
        for arg in expr.args(id) {
            let value = expr.value(arg);
            if !value.starts_with('$') && !value.starts_with('@') {
                tracing::warn!(msg_id = %msg_id, argument = value, "unexpected message argument");
                return;
            }
            let mut sub = Buffer::new();
            self.format_expr(node, expr, arg, &mut sub, &[]);
            args.extend(sub.into_fragments().into_iter().map(|f| f.text));
        }

        match self.message(&msg_id, &args) {
            Some(text) => {
                buff.append(Fragment::new(text), op.unique);
            }
            None => tracing::warn!(msg_id = %msg_id, "missing message"),
        }
    }
}
