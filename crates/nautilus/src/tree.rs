//! Node arena, full-name index and traversals.
//!
//! The tree is built once from the source hierarchy. Folding and filtering only change the
//! derived child lists and visibility flags, never the arena itself.

use crate::circle::NodeCircle;
use crate::model::SourceNode;
use crate::node::{Node, NodeDescription, NodeId, Role};
use crate::view::NodeView;
use nautilus_geom::{Circle, Point, Vector};
use rustc_hash::FxHashMap;
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    index: FxHashMap<String, NodeId>,
}

impl Tree {
    pub fn build(source: &SourceNode) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            index: FxHashMap::default(),
        };
        let mut next_layer = 0u32;
        tree.build_node(source, Role::Root, &mut next_layer);

        let mut index = FxHashMap::default();
        index.reserve(tree.nodes.len());
        tree.call_on_self_then_every_descendant(NodeId::ROOT, &mut |id| {
            index.insert(tree.nodes[id.0].full_name().to_string(), id);
        });
        tree.index = index;
        tree
    }

    fn build_node(&mut self, source: &SourceNode, role: Role, next_layer: &mut u32) -> NodeId {
        let id = NodeId(self.nodes.len());
        let layer = *next_layer;
        *next_layer += 1;
        self.nodes.push(Node {
            description: NodeDescription {
                name: source.name.clone(),
                full_name: source.full_name.clone(),
                node_type: source.node_type,
            },
            layer,
            role,
            original_children: Vec::new(),
            filtered_children: Vec::new(),
            folded: false,
            visible: true,
            circle: NodeCircle::default(),
        });

        let children: Vec<NodeId> = source
            .children
            .iter()
            .map(|child| self.build_node(child, Role::Inner { parent: id }, next_layer))
            .collect();
        let node = &mut self.nodes[id.0];
        node.filtered_children = children.clone();
        node.original_children = children;
        id
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn get_by_name(&self, full_name: &str) -> Option<NodeId> {
        self.index.get(full_name).copied()
    }

    pub fn current_children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).current_children()
    }

    pub fn call_on_self_then_every_descendant(&self, id: NodeId, f: &mut impl FnMut(NodeId)) {
        f(id);
        for &child in self.current_children(id) {
            self.call_on_self_then_every_descendant(child, f);
        }
    }

    /// Post-order: children are visited before their parent.
    pub fn call_on_every_descendant_then_self(&self, id: NodeId, f: &mut impl FnMut(NodeId)) {
        for &child in self.current_children(id) {
            self.call_on_every_descendant_then_self(child, f);
        }
        f(id);
    }

    pub fn self_and_descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.call_on_self_then_every_descendant(id, &mut |n| out.push(n));
        out
    }

    /// Current descendants in pre-order, without `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = self.self_and_descendants(id);
        out.remove(0);
        out
    }

    pub fn descendants_then_self(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.call_on_every_descendant_then_self(id, &mut |n| out.push(n));
        out
    }

    /// All nodes below `id` regardless of folding and filtering, children before parents.
    fn original_descendants_then_self(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for &child in self.node(id).original_children() {
            self.original_descendants_then_self(child, out);
        }
        out.push(id);
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent()
    }

    /// `id` first, root last.
    pub fn self_and_predecessors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = vec![id];
        let mut cur = id;
        while let Some(parent) = self.parent(cur) {
            out.push(parent);
            cur = parent;
        }
        out
    }

    pub fn self_or_first_predecessor_matching(
        &self,
        id: NodeId,
        matching: impl Fn(NodeId) -> bool,
    ) -> Option<NodeId> {
        self.self_and_predecessors(id)
            .into_iter()
            .find(|&n| matching(n))
    }

    /// Path from just below `predecessor` down to `id`. Empty if `id == predecessor`.
    pub fn self_and_predecessors_until_exclusively(
        &self,
        id: NodeId,
        predecessor: NodeId,
    ) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = self
            .self_and_predecessors(id)
            .into_iter()
            .take_while(|&n| n != predecessor)
            .collect();
        out.reverse();
        out
    }

    pub fn is_predecessor_of(&self, id: NodeId, full_name: &str) -> bool {
        self.node(id).is_predecessor_of(full_name)
    }

    pub fn is_predecessor_of_or_self(&self, id: NodeId, full_name: &str) -> bool {
        self.node(id).is_predecessor_of_or_self(full_name)
    }

    /// True iff `id` is reachable from the root through current children.
    pub fn is_rendered(&self, id: NodeId) -> bool {
        let mut cur = id;
        while let Some(parent) = self.parent(cur) {
            if !self.current_children(parent).contains(&cur) {
                return false;
            }
            cur = parent;
        }
        true
    }

    /// `predicate` holds for `id` or for any node below it in the filtered tree.
    pub fn matches_or_has_child_that_matches(
        &self,
        id: NodeId,
        predicate: &dyn Fn(&Node) -> bool,
    ) -> bool {
        let node = self.node(id);
        predicate(node)
            || node
                .filtered_children()
                .iter()
                .any(|&c| self.matches_or_has_child_that_matches(c, predicate))
    }

    /// Absolute circle of the frame `id` is positioned in.
    pub fn parent_absolute(&self, id: NodeId) -> Circle {
        match self.parent(id) {
            Some(parent) => self.node(parent).circle.absolute(),
            None => Circle::default(),
        }
    }

    pub(crate) fn set_filtered_children(
        &mut self,
        id: NodeId,
        children: Vec<NodeId>,
        view: &dyn NodeView,
    ) {
        self.node_mut(id).filtered_children = children;
        self.update_view_on_current_children_changed(id, view);
    }

    pub(crate) fn reset_filtering(&mut self, view: &dyn NodeView) {
        let mut order = Vec::with_capacity(self.nodes.len());
        self.original_descendants_then_self(NodeId::ROOT, &mut order);
        for id in order {
            let original = self.node(id).original_children.clone();
            self.set_filtered_children(id, original, view);
        }
    }

    pub(crate) fn set_folded(&mut self, id: NodeId, folded: bool, view: &dyn NodeView) {
        self.node_mut(id).folded = folded;
        self.update_view_on_current_children_changed(id, view);
    }

    fn update_view_on_current_children_changed(&mut self, id: NodeId, view: &dyn NodeView) {
        let node = self.node(id);
        view.update_node_type(node.full_name(), &node.class());

        let current = node.current_children().to_vec();
        let hidden: Vec<NodeId> = node
            .original_children()
            .iter()
            .copied()
            .filter(|c| !current.contains(c))
            .collect();

        for child in hidden {
            let child = self.node_mut(child);
            child.visible = false;
            view.hide(child.full_name());
        }
        for child in current {
            self.node_mut(child).visible = true;
        }
    }

    /// Shifts `id` by `delta` relative to its parent; every node below moves along.
    pub(crate) fn jump_to_relative_displacement(
        &mut self,
        id: NodeId,
        delta: Vector,
        view: &dyn NodeView,
    ) {
        let mut below = Vec::new();
        self.original_descendants_then_self(id, &mut below);
        for n in below {
            if n == id {
                self.node_mut(n).circle.translate_relative(delta);
            } else {
                self.node_mut(n).circle.translate(delta);
            }
        }
        let node = self.node(id);
        view.jump_to_position(node.full_name(), node.circle.relative_position());
    }

    pub fn snapshot(&self) -> Vec<NodeSnapshot> {
        self.self_and_descendants(NodeId::ROOT)
            .into_iter()
            .map(|id| NodeSnapshot::of(self.node(id)))
            .collect()
    }
}

/// Serializable view of a rendered node after layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSnapshot {
    pub full_name: String,
    #[serde(rename = "type")]
    pub node_type: crate::model::NodeType,
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub relative_x: f64,
    pub relative_y: f64,
    pub folded: bool,
    pub leaf: bool,
}

impl NodeSnapshot {
    fn of(node: &Node) -> Self {
        let abs = node.circle.absolute();
        let rel: Point = node.circle.relative_position();
        Self {
            full_name: node.full_name().to_string(),
            node_type: node.node_type(),
            x: abs.x,
            y: abs.y,
            r: abs.r,
            relative_x: rel.x,
            relative_y: rel.y,
            folded: node.is_folded(),
            leaf: node.is_leaf(),
        }
    }
}
