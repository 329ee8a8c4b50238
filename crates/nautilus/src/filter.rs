//! Name and type filters over the node tree.
//!
//! Filters never remove nodes: they narrow each node's filtered children. A child survives if it
//! or anything below it (in the already filtered tree) satisfies the predicate, so a matching
//! class keeps its whole package chain visible.

use crate::error::{Error, Result};
use crate::node::{Node, NodeId};
use crate::tree::Tree;
use crate::view::NodeView;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub trait NodePredicate {
    fn matches(&self, node: &Node) -> bool;
}

/// Full-name filter. `*` matches any run of characters, a trailing space anchors the pattern at
/// the end of the full name.
#[derive(Debug, Clone)]
pub struct NameFilter {
    pattern: String,
    exclude: bool,
    regex: Regex,
}

impl NameFilter {
    pub fn new(pattern: impl Into<String>, exclude: bool) -> Result<Self> {
        let pattern = pattern.into();
        let regex = Regex::new(&name_regex(&pattern)).map_err(|source| {
            Error::InvalidNameFilter {
                pattern: pattern.clone(),
                source,
            }
        })?;
        Ok(Self {
            pattern,
            exclude,
            regex,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_exclude(&self) -> bool {
        self.exclude
    }

    /// A blank pattern filters nothing.
    pub fn is_blank(&self) -> bool {
        self.pattern.trim().is_empty()
    }
}

impl NodePredicate for NameFilter {
    fn matches(&self, node: &Node) -> bool {
        self.regex.is_match(node.full_name()) != self.exclude
    }
}

fn name_regex(pattern: &str) -> String {
    let (body, anchored) = match pattern.strip_suffix(' ') {
        Some(body) => (body.trim_end(), true),
        None => (pattern, false),
    };
    let mut out = body
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    if anchored {
        out.push('$');
    }
    out
}

/// Keeps interfaces and/or classes. Packages are kept only through their matching descendants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeFilter {
    pub show_interfaces: bool,
    pub show_classes: bool,
}

impl Default for TypeFilter {
    fn default() -> Self {
        Self {
            show_interfaces: true,
            show_classes: true,
        }
    }
}

impl NodePredicate for TypeFilter {
    fn matches(&self, node: &Node) -> bool {
        if node.is_package() {
            false
        } else if node.is_interface() {
            self.show_interfaces
        } else {
            self.show_classes
        }
    }
}

/// Active filters. Applied name first, then type; a node must pass all of them.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    pub name: Option<NameFilter>,
    pub node_type: Option<TypeFilter>,
}

impl Filters {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.node_type.is_none()
    }

    pub fn values(&self) -> Vec<&dyn NodePredicate> {
        let mut out: Vec<&dyn NodePredicate> = Vec::with_capacity(2);
        if let Some(name) = &self.name {
            out.push(name);
        }
        if let Some(node_type) = &self.node_type {
            out.push(node_type);
        }
        out
    }
}

/// Recomputes every filtered-children list from scratch.
pub fn apply(tree: &mut Tree, filters: &Filters, view: &dyn NodeView) {
    tree.reset_filtering(view);
    for predicate in filters.values() {
        apply_predicate(tree, tree.root(), predicate, view);
    }
}

fn apply_predicate(
    tree: &mut Tree,
    id: NodeId,
    predicate: &dyn NodePredicate,
    view: &dyn NodeView,
) {
    let matches = |node: &Node| predicate.matches(node);
    let kept: Vec<NodeId> = tree
        .node(id)
        .filtered_children()
        .iter()
        .copied()
        .filter(|&child| tree.matches_or_has_child_that_matches(child, &matches))
        .collect();
    tree.set_filtered_children(id, kept.clone(), view);
    for child in kept {
        apply_predicate(tree, child, predicate, view);
    }
}
