//! Input records: the already extracted source hierarchy and its dependency links.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Package,
    Class,
    Interface,
}

impl NodeType {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Package => "package",
            NodeType::Class => "class",
            NodeType::Interface => "interface",
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceNode {
    pub name: String,
    pub full_name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default)]
    pub children: Vec<SourceNode>,
}

impl SourceNode {
    pub fn new(name: impl Into<String>, full_name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            name: name.into(),
            full_name: full_name.into(),
            node_type,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<SourceNode>) -> Self {
        self.children = children;
        self
    }
}

/// A dependency between two nodes, by full name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub source: String,
    pub target: String,
}

impl Link {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}
