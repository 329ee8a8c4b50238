#![forbid(unsafe_code)]

//! Fold/filter state and nested-circle layout for hierarchical software structures.
//!
//! The engine keeps a tree of packages, classes and interfaces, derives which nodes are
//! currently visible (filters + folding) and lays the visible part out as nested circles:
//!
//! 1. bottom-up sizing: every parent is sized to pack its current children,
//! 2. top-down placement: level by level, dependency springs and sibling collisions position the
//!    already sized circles inside their parents.
//!
//! All mutations go through the root-owned [`UpdateQueue`], so a relayout never interleaves with
//! a filter change, a fold toggle or a drag. The APIs are runtime-agnostic async: nothing here
//! requires a specific executor.

pub mod circle;
pub mod config;
pub mod dependencies;
pub mod error;
pub mod filter;
pub mod graph;
mod layout;
pub mod listener;
pub mod model;
pub mod node;
mod overlap;
pub mod queue;
pub mod root;
pub mod tree;
pub mod view;

pub use config::{LayoutOptions, VisualizationStyles};
pub use dependencies::{Dependencies, LinkSource};
pub use error::{Error, Result};
pub use filter::{Filters, NameFilter, NodePredicate, TypeFilter};
pub use graph::{Graph, TypeFilterConfig};
pub use listener::{Listener, Listeners};
pub use model::{Link, NodeType, SourceNode};
pub use node::{Node, NodeDescription, NodeId, Role};
pub use queue::{Completion, Task, UpdateHandle, UpdateQueue};
pub use root::Root;
pub use tree::{NodeSnapshot, Tree};
pub use view::{NodeView, NoopView, ViewFuture};

pub use nautilus_geom::{Circle, Point, Vector, point, vector};
