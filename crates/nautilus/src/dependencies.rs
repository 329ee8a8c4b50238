//! Dependency links as seen by the layout.

use crate::model::Link;
use crate::node::NodeId;
use crate::tree::Tree;
use indexmap::IndexSet;

/// Supplies the links the force layout pulls together. Queried once per layout pass.
pub trait LinkSource {
    fn links(&self, tree: &Tree) -> Vec<Link>;
}

impl<F> LinkSource for F
where
    F: Fn(&Tree) -> Vec<Link>,
{
    fn links(&self, tree: &Tree) -> Vec<Link> {
        self(tree)
    }
}

/// Raw class-level links, folded onto whatever currently represents their endpoints.
#[derive(Debug, Clone, Default)]
pub struct Dependencies {
    links: Vec<Link>,
}

impl Dependencies {
    pub fn new(links: Vec<Link>) -> Self {
        Self { links }
    }

    pub fn raw(&self) -> &[Link] {
        &self.links
    }
}

impl LinkSource for Dependencies {
    fn links(&self, tree: &Tree) -> Vec<Link> {
        let mut out: IndexSet<(NodeId, NodeId)> = IndexSet::new();
        for link in &self.links {
            let (Some(source), Some(target)) = (
                tree.get_by_name(&link.source),
                tree.get_by_name(&link.target),
            ) else {
                tracing::debug!(source = %link.source, target = %link.target, "dropping link to unknown node");
                continue;
            };
            let (Some(source), Some(target)) =
                (representative(tree, source), representative(tree, target))
            else {
                continue;
            };
            if source != target {
                out.insert((source, target));
            }
        }
        out.into_iter()
            .map(|(s, t)| {
                Link::new(tree.node(s).full_name(), tree.node(t).full_name())
            })
            .collect()
    }
}

/// The node drawn in place of `id`: itself, or its outermost folded ancestor. `None` when a
/// filter removed `id` or one of its ancestors.
fn representative(tree: &Tree, id: NodeId) -> Option<NodeId> {
    let chain = tree.self_and_predecessors(id);
    let filtered_out = chain
        .windows(2)
        .any(|w| !tree.node(w[1]).filtered_children().contains(&w[0]));
    if filtered_out {
        return None;
    }
    chain
        .iter()
        .skip(1)
        .rev()
        .find(|&&n| tree.node(n).is_folded())
        .copied()
        .or(Some(id))
}
