use crate::circle::NodeCircle;
use crate::model::NodeType;

/// Arena index of a node. Stable for the lifetime of its [`crate::Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDescription {
    pub name: String,
    pub full_name: String,
    pub node_type: NodeType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Root,
    Inner { parent: NodeId },
}

#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) description: NodeDescription,
    pub(crate) layer: u32,
    pub(crate) role: Role,
    pub(crate) original_children: Vec<NodeId>,
    pub(crate) filtered_children: Vec<NodeId>,
    pub(crate) folded: bool,
    pub(crate) visible: bool,
    pub(crate) circle: NodeCircle,
}

impl Node {
    pub fn description(&self) -> &NodeDescription {
        &self.description
    }

    pub fn name(&self) -> &str {
        &self.description.name
    }

    pub fn full_name(&self) -> &str {
        &self.description.full_name
    }

    pub fn node_type(&self) -> NodeType {
        self.description.node_type
    }

    pub fn is_package(&self) -> bool {
        self.description.node_type == NodeType::Package
    }

    pub fn is_interface(&self) -> bool {
        self.description.node_type == NodeType::Interface
    }

    /// Construction order; only used as a stable tie-break between overlapping nodes.
    pub fn layer(&self) -> u32 {
        self.layer
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_root(&self) -> bool {
        matches!(self.role, Role::Root)
    }

    pub fn parent(&self) -> Option<NodeId> {
        match self.role {
            Role::Root => None,
            Role::Inner { parent } => Some(parent),
        }
    }

    pub fn original_children(&self) -> &[NodeId] {
        &self.original_children
    }

    pub fn filtered_children(&self) -> &[NodeId] {
        &self.filtered_children
    }

    pub fn current_children(&self) -> &[NodeId] {
        if self.folded {
            &[]
        } else {
            &self.filtered_children
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.filtered_children.is_empty()
    }

    pub fn is_currently_leaf(&self) -> bool {
        self.is_leaf() || self.folded
    }

    pub fn is_folded(&self) -> bool {
        self.folded
    }

    /// Whether the node is shown inside its parent. A visible node inside a hidden parent is
    /// still not rendered, see [`crate::Tree::is_rendered`].
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn circle(&self) -> &NodeCircle {
        &self.circle
    }

    pub fn radius(&self) -> f64 {
        self.circle.radius()
    }

    /// Style class handed to the view, e.g. `node class foldable`.
    pub fn class(&self) -> String {
        let foldable = if self.is_leaf() {
            "not-foldable"
        } else {
            "foldable"
        };
        format!("node {} {foldable}", self.description.node_type)
    }

    /// True if `full_name` names a node nested below this one. The root precedes everything.
    pub fn is_predecessor_of(&self, full_name: &str) -> bool {
        match self.role {
            Role::Root => true,
            Role::Inner { .. } => {
                matches!(self.separator_after_prefix(full_name), Some(Some(_)))
            }
        }
    }

    pub fn is_predecessor_of_or_self(&self, full_name: &str) -> bool {
        match self.role {
            Role::Root => true,
            Role::Inner { .. } => self.separator_after_prefix(full_name).is_some(),
        }
    }

    /// `None`: not a prefix match. `Some(None)`: exact match. `Some(Some(sep))`: prefix followed
    /// by a name separator.
    fn separator_after_prefix(&self, full_name: &str) -> Option<Option<char>> {
        let rest = full_name.strip_prefix(self.full_name())?;
        match rest.chars().next() {
            None => Some(None),
            Some(c @ ('.' | '$')) => Some(Some(c)),
            Some(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Node, NodeDescription, NodeId, Role};
    use crate::circle::NodeCircle;
    use crate::model::NodeType;

    fn node(full_name: &str, role: Role) -> Node {
        Node {
            description: NodeDescription {
                name: full_name.rsplit('.').next().unwrap_or(full_name).to_string(),
                full_name: full_name.to_string(),
                node_type: NodeType::Class,
            },
            layer: 0,
            role,
            original_children: Vec::new(),
            filtered_children: Vec::new(),
            folded: false,
            visible: true,
            circle: NodeCircle::default(),
        }
    }

    #[test]
    fn predecessor_requires_separator_after_prefix() {
        let foo = node("com.example.Foo", Role::Inner { parent: NodeId::ROOT });
        assert!(!foo.is_predecessor_of("com.example.FooBar"));
        assert!(foo.is_predecessor_of("com.example.Foo$Inner"));
        assert!(foo.is_predecessor_of("com.example.Foo.sub"));
        assert!(!foo.is_predecessor_of("com.example.Foo"));
        assert!(foo.is_predecessor_of_or_self("com.example.Foo"));
        assert!(!foo.is_predecessor_of_or_self("com.example.FooBar"));
        assert!(!foo.is_predecessor_of_or_self("com.other"));
    }

    #[test]
    fn root_precedes_everything() {
        let root = node("default", Role::Root);
        assert!(root.is_predecessor_of("anything.at.All"));
        assert!(root.is_predecessor_of_or_self("x"));
    }

    #[test]
    fn folded_node_has_no_current_children() {
        let mut n = node("a", Role::Root);
        n.filtered_children = vec![NodeId(1), NodeId(2)];
        assert!(!n.is_currently_leaf());
        n.folded = true;
        assert!(n.current_children().is_empty());
        assert!(!n.is_leaf());
        assert!(n.is_currently_leaf());
        assert_eq!(n.class(), "node class foldable");
    }
}
