//! Two-phase nested-circle layout.
//!
//! [`initial_layout`] sizes every rendered node bottom-up from its current children.
//! [`force_layout`] then positions the sized circles top-down, one level of the rendered tree
//! at a time. Each level runs one link simulation over everything laid out so far (earlier
//! levels are fixed anchors) and one collision simulation per parent, restricted to that
//! parent's children. Circles are clamped into their parent after every tick.

use crate::config::{LayoutOptions, VisualizationStyles};
use crate::error::Result;
use crate::model::Link;
use crate::node::NodeId;
use crate::tree::Tree;
use crate::view::{self, NodeView, ViewFuture};
use nautilus_geom::{
    Body, Circle, CollideForce, Force, LinkForce, Point, Simulation, enclosing_circle, point,
    run_simulations,
};
use rustc_hash::{FxHashMap, FxHashSet};
use std::f64::consts::PI;
use std::rc::Rc;
use std::time::Instant;

/// Phase 1. Returns the pending radius and position animations.
pub(crate) fn initial_layout(
    tree: &mut Tree,
    styles: &VisualizationStyles,
    view: &Rc<dyn NodeView>,
) -> Result<Vec<ViewFuture>> {
    let mut futures = Vec::new();

    for id in tree.descendants_then_self(tree.root()) {
        let children = tree.current_children(id).to_vec();
        let r = match children.as_slice() {
            [] => styles.default_radius(tree.node(id)),
            &[only] => {
                let child_r = tree.node(only).radius();
                let parent = tree.node(id).circle.absolute();
                let child = tree.node_mut(only);
                child.circle.move_to(Point::origin(), &parent);
                futures.push(view::move_and_show(
                    view,
                    child.full_name(),
                    Point::origin(),
                    child.is_visible(),
                ));
                styles.default_radius_for_node_with_one_child(tree.node(id), child_r)
            }
            _ => {
                let radii: Vec<f64> = children.iter().map(|&c| tree.node(c).radius()).collect();
                let enclosing = enclosing_circle(&radii, styles.circle_padding)?;
                enclosing.r.max(styles.default_radius(tree.node(id)))
            }
        };

        let node = tree.node_mut(id);
        node.circle.set_radius(r);
        futures.push(view.change_radius(node.full_name(), r));
    }

    let root = tree.root();
    let r = tree.node(root).radius();
    let node = tree.node_mut(root);
    node.circle.move_to(point(r, r), &Circle::default());
    futures.push(view::move_and_show(view, node.full_name(), point(r, r), true));

    Ok(futures)
}

/// Phase 2. `links` are the dependency links of this pass, by full name.
pub(crate) fn force_layout(
    tree: &mut Tree,
    links: &[Link],
    styles: &VisualizationStyles,
    options: &LayoutOptions,
    view: &Rc<dyn NodeView>,
) -> Vec<ViewFuture> {
    let padding = styles.circle_padding;
    let interval = options.intermediate_update_interval();

    let mut futures = Vec::new();
    let mut bodies: Vec<Body> = Vec::new();
    let mut body_of: FxHashMap<NodeId, usize> = FxHashMap::default();
    let mut current = vec![tree.root()];
    let mut level = 0usize;

    loop {
        let frontier: Vec<NodeId> = current
            .iter()
            .flat_map(|&id| tree.current_children(id).iter().copied())
            .collect();
        if frontier.is_empty() {
            break;
        }
        level += 1;

        for &parent in &current {
            let parent_abs = tree.node(parent).circle.absolute();
            let children = tree.current_children(parent).to_vec();
            for (i, child) in children.into_iter().enumerate() {
                let circle = &mut tree.node_mut(child).circle;
                let relative = if circle.is_placed() {
                    circle.relative_position()
                } else {
                    phyllotaxis(i)
                };
                circle.move_to(relative, &parent_abs);
                let abs = circle.absolute();
                body_of.insert(child, bodies.len());
                bodies.push(Body::new(abs.x, abs.y, abs.r));
            }
        }

        let new_nodes: FxHashSet<NodeId> = frontier.iter().copied().collect();
        let springs = level_springs(tree, links, &new_nodes, &body_of);

        let link_force = LinkForce::new(&bodies, &springs, padding);
        let mut simulations = vec![
            Simulation::new((0..bodies.len()).collect(), options.link_params())
                .with_force(Force::Link(link_force)),
        ];
        for &parent in &current {
            let siblings: Vec<usize> = tree
                .current_children(parent)
                .iter()
                .filter_map(|c| body_of.get(c).copied())
                .collect();
            if siblings.is_empty() {
                continue;
            }
            simulations.push(
                Simulation::new(siblings.clone(), options.collide_params())
                    .with_force(Force::Collide(CollideForce::new(siblings, padding))),
            );
        }

        let mut last_update = Instant::now();
        let mut on_tick = |bodies: &mut [Body]| {
            for &id in &frontier {
                let Some(&b) = body_of.get(&id) else {
                    continue;
                };
                let parent_abs = tree.parent_absolute(id);
                let position = tree.node_mut(id).circle.take_absolute_position(
                    bodies[b].position(),
                    &parent_abs,
                    padding,
                );
                bodies[b].x = position.x;
                bodies[b].y = position.y;
            }
            if last_update.elapsed() > interval {
                for &id in &frontier {
                    let node = tree.node(id);
                    futures.push(
                        view.start_move_to_position(
                            node.full_name(),
                            node.circle.relative_position(),
                        ),
                    );
                }
                last_update = Instant::now();
            }
        };

        let k = run_simulations(&mut simulations, 0, 0, &mut bodies, &mut on_tick);
        let ticks = run_simulations(&mut simulations[1..], 0, k, &mut bodies, &mut on_tick);

        for &id in &frontier {
            let node = tree.node(id);
            futures.push(view::move_and_show(
                view,
                node.full_name(),
                node.circle.relative_position(),
                node.is_visible(),
            ));
            if let Some(&b) = body_of.get(&id) {
                bodies[b].fix();
            }
        }

        tracing::debug!(
            level,
            nodes = frontier.len(),
            links = springs.len(),
            ticks,
            "force layout level settled"
        );
        current = frontier;
    }

    futures
}

/// Springs for one level: links touching at least one node of `new_nodes` whose endpoints
/// both already have a body.
fn level_springs(
    tree: &Tree,
    links: &[Link],
    new_nodes: &FxHashSet<NodeId>,
    body_of: &FxHashMap<NodeId, usize>,
) -> Vec<(usize, usize)> {
    links
        .iter()
        .filter_map(|link| {
            let source = tree.get_by_name(&link.source)?;
            let target = tree.get_by_name(&link.target)?;
            if !new_nodes.contains(&source) && !new_nodes.contains(&target) {
                return None;
            }
            Some((*body_of.get(&source)?, *body_of.get(&target)?))
        })
        .collect()
}

/// Start offset of the `i`-th child that was never placed before.
fn phyllotaxis(i: usize) -> Point {
    let radius = 10.0 * (0.5 + i as f64).sqrt();
    let angle = i as f64 * PI * (3.0 - 5f64.sqrt());
    point(radius * angle.cos(), radius * angle.sin())
}

#[cfg(test)]
mod tests {
    use super::{level_springs, phyllotaxis};
    use crate::model::{Link, NodeType, SourceNode};
    use crate::node::NodeId;
    use crate::tree::Tree;
    use rustc_hash::{FxHashMap, FxHashSet};

    fn sample() -> Tree {
        let source = SourceNode::new("default", "default", NodeType::Package).with_children(vec![
            SourceNode::new("a", "a", NodeType::Package).with_children(vec![
                SourceNode::new("A1", "a.A1", NodeType::Class),
                SourceNode::new("A2", "a.A2", NodeType::Class),
            ]),
            SourceNode::new("b", "b", NodeType::Package),
        ]);
        Tree::build(&source)
    }

    fn ids(tree: &Tree, names: &[&str]) -> Vec<NodeId> {
        names
            .iter()
            .map(|n| tree.get_by_name(n).unwrap())
            .collect()
    }

    fn bodies(ids: &[NodeId]) -> FxHashMap<NodeId, usize> {
        ids.iter().enumerate().map(|(i, &id)| (id, i)).collect()
    }

    #[test]
    fn links_into_unplaced_levels_have_no_spring() {
        let tree = sample();
        let placed = ids(&tree, &["a", "b"]);
        let new_nodes: FxHashSet<NodeId> = placed.iter().copied().collect();
        let links = vec![Link::new("a.A1", "b"), Link::new("a", "b")];

        let springs = level_springs(&tree, &links, &new_nodes, &bodies(&placed));
        assert_eq!(springs, vec![(0, 1)]);
    }

    #[test]
    fn links_between_earlier_levels_are_not_repeated() {
        let tree = sample();
        let placed = ids(&tree, &["a", "b", "a.A1", "a.A2"]);
        let new_nodes: FxHashSet<NodeId> = placed[2..].iter().copied().collect();
        let links = vec![
            Link::new("a", "b"),
            Link::new("a.A1", "b"),
            Link::new("a.A1", "a.A2"),
            Link::new("a.A2", "missing"),
        ];

        let springs = level_springs(&tree, &links, &new_nodes, &bodies(&placed));
        assert_eq!(springs, vec![(2, 1), (2, 3)]);
    }

    #[test]
    fn phyllotaxis_offsets_are_distinct() {
        let points: Vec<_> = (0..20).map(phyllotaxis).collect();
        for (i, a) in points.iter().enumerate() {
            for b in &points[i + 1..] {
                assert!((*a - *b).length() > 1.0);
            }
        }
    }
}
