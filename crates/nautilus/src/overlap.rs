//! Drag handling and overlap reporting.

use crate::listener::Listeners;
use crate::node::NodeId;
use crate::tree::Tree;
use crate::view::NodeView;
use nautilus_geom::Vector;

/// Moves `id` with everything below it by `delta`, then reports which solid circles overlap.
pub(crate) fn drag(
    tree: &mut Tree,
    id: NodeId,
    delta: Vector,
    view: &dyn NodeView,
    listeners: &Listeners,
) {
    tree.jump_to_relative_displacement(id, delta, view);
    let full_name = tree.node(id).full_name().to_string();
    listeners.notify(|l| l.on_drag(&full_name));

    let candidates: Vec<NodeId> = tree
        .descendants(tree.root())
        .into_iter()
        .filter(|&n| {
            let node = tree.node(n);
            !node.is_package() || node.is_folded()
        })
        .collect();

    listeners.notify(|l| l.reset_nodes_overlapping());
    let mut remaining = candidates.clone();
    let mut reported = 0usize;
    for candidate in candidates {
        remaining = check_overlapping_with_nodes(tree, candidate, remaining, listeners, &mut reported);
    }
    listeners.notify(|l| l.finish_on_nodes_overlapping());
    tracing::debug!(node = %full_name, reported, "drag finished");
}

/// Compares `id` with every remaining node except itself and its descendants, returning the
/// candidates left for the following nodes.
fn check_overlapping_with_nodes(
    tree: &Tree,
    id: NodeId,
    nodes: Vec<NodeId>,
    listeners: &Listeners,
    reported: &mut usize,
) -> Vec<NodeId> {
    let this = tree.node(id);
    let others: Vec<NodeId> = nodes
        .iter()
        .copied()
        .filter(|&n| n != id && !this.is_predecessor_of(tree.node(n).full_name()))
        .collect();

    let mut overlapping = false;
    for &other in &others {
        overlapping |= check_overlapping_with_single_node(tree, id, other, listeners, reported);
    }

    if !this.is_package() || overlapping {
        nodes.into_iter().filter(|&n| n != id).collect()
    } else {
        others
    }
}

fn check_overlapping_with_single_node(
    tree: &Tree,
    a: NodeId,
    b: NodeId,
    listeners: &Listeners,
    reported: &mut usize,
) -> bool {
    let (na, nb) = (tree.node(a), tree.node(b));
    let (ca, cb) = (na.circle.absolute(), nb.circle.absolute());
    if !ca.overlaps(&cb) {
        return false;
    }
    let (first, second) = if na.layer() < nb.layer() {
        (na, nb)
    } else {
        (nb, na)
    };
    if !second.is_package() {
        let circle = second.circle.absolute();
        listeners.notify(|l| l.on_nodes_overlapping(first.full_name(), circle));
        *reported += 1;
    }
    true
}
