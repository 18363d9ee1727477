//! Generic rule-driven tree traversal.
//!
//! The walker is grammar-agnostic: it looks each node up in the registry and
//! recurses into the child fields the rule names. Kinds without a rule are
//! skipped together with their entire subtree, so an incomplete registry
//! silently narrows the metrics rather than failing traversal.

use log::trace;

use crate::core::ast::{safe_name, Field, Node, Span};
use crate::core::errors::{Error, Result};
use crate::rules::{Registry, RuleDescriptor};

/// Callbacks invoked during traversal.
pub trait Visitor {
    /// Called for every node that has a rule, before any scope handling.
    fn visit_node(&mut self, node: &Node, rule: &RuleDescriptor);

    /// Called when a scope-opening node is entered, after `visit_node` and
    /// before the node's children.
    fn enter_scope(&mut self, name: String, span: Option<Span>, params: usize);

    /// Called when the matching scope-opening node has been fully walked.
    fn exit_scope(&mut self);
}

/// Walk `root` depth-first, driving the visitor with the registry's rules.
///
/// The root must carry a `body` list; anything else is a caller contract
/// violation, not a recoverable condition.
pub fn walk(registry: &Registry, root: &Node, visitor: &mut dyn Visitor) -> Result<()> {
    let body = root
        .list("body")
        .ok_or(Error::InvalidTree("root has no body sequence"))?;
    visit_nodes(registry, body, None, visitor);
    Ok(())
}

fn visit_nodes(registry: &Registry, nodes: &[Node], assigned: Option<&str>, visitor: &mut dyn Visitor) {
    for node in nodes {
        visit_node(registry, node, assigned, visitor);
    }
}

fn visit_node(registry: &Registry, node: &Node, assigned: Option<&str>, visitor: &mut dyn Visitor) {
    let Some(rule) = registry.get(node.kind) else {
        trace!("skipping subtree of unsupported node kind {:?}", node.kind);
        return;
    };
    visitor.visit_node(node, rule);
    if rule.new_scope {
        let name = safe_name(node.child("id"), assigned);
        let params = node.list("params").map_or(0, |params| params.len());
        visitor.enter_scope(name, node.span, params);
    }
    // The name handed to children is recomputed from this node, never
    // inherited across more than one level.
    let assigned_to_children = rule.assignable_name.map(|name_of| name_of(node));
    for field in &rule.children {
        match node.field(field) {
            Some(Field::Node(child)) => {
                visit_node(registry, child, assigned_to_children.as_deref(), visitor);
            }
            Some(Field::List(children)) => {
                visit_nodes(registry, children, assigned_to_children.as_deref(), visitor);
            }
            _ => {}
        }
    }
    if rule.new_scope {
        visitor.exit_scope();
    }
}
