//! Wires a [`Root`] to its dependency links and view.

use crate::config::VisualizationStyles;
use crate::dependencies::Dependencies;
use crate::error::Result;
use crate::listener::Listener;
use crate::model::{Link, SourceNode};
use crate::queue::Completion;
use crate::root::Root;
use crate::view::NodeView;
use futures::future::{FutureExt, LocalBoxFuture, TryFutureExt, try_join};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Node type visibility as chosen in a settings menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeFilterConfig {
    pub show_interfaces: bool,
    pub show_classes: bool,
}

impl Default for TypeFilterConfig {
    fn default() -> Self {
        Self {
            show_interfaces: true,
            show_classes: true,
        }
    }
}

#[derive(Debug)]
pub struct Graph {
    root: Root,
}

impl Graph {
    /// Builds the tree and queues its first layout.
    pub fn new(source: &SourceNode, links: Vec<Link>, view: Rc<dyn NodeView>) -> Self {
        let root = Root::new(source, Dependencies::new(links), view);
        let _ = root.relayout();
        Self { root }
    }

    /// Like [`Graph::new`], but starts with every package folded. The fold queues the first
    /// layout itself, so only the folded tree is laid out.
    pub fn create(source: &SourceNode, links: Vec<Link>, view: Rc<dyn NodeView>) -> Self {
        let root = Root::new(source, Dependencies::new(links), view);
        let _ = root.fold_all();
        Self { root }
    }

    pub fn with_styles(mut self, styles: VisualizationStyles) -> Self {
        self.root = self.root.with_styles(styles);
        self
    }

    pub fn root(&self) -> &Root {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Root {
        &mut self.root
    }

    pub fn add_listener(&mut self, listener: Rc<dyn Listener>) {
        self.root.add_listener(listener);
    }

    pub fn fold_all_nodes(&self) -> Completion {
        self.root.fold_all()
    }

    pub fn filter_nodes_by_name_containing(&self, pattern: &str) -> Result<Completion> {
        self.filter_nodes_by_name(pattern, false)
    }

    pub fn filter_nodes_by_name_not_containing(&self, pattern: &str) -> Result<Completion> {
        self.filter_nodes_by_name(pattern, true)
    }

    fn filter_nodes_by_name(&self, pattern: &str, exclude: bool) -> Result<Completion> {
        let filtered = self.root.filter_by_name(pattern, exclude)?;
        let _ = self.root.relayout();
        Ok(filtered)
    }

    pub fn filter_nodes_by_type(&self, filter: TypeFilterConfig) -> Completion {
        let filtered = self
            .root
            .filter_by_type(filter.show_interfaces, filter.show_classes);
        let _ = self.root.relayout();
        filtered
    }

    pub fn refresh(&self) -> Completion {
        self.root.relayout()
    }

    /// Applies new label and padding sizes and lays the tree out again. Resolves once both
    /// tasks are done, with the first error of either.
    pub fn change_settings(
        &self,
        node_font_size: f64,
        circle_padding: f64,
    ) -> LocalBoxFuture<'static, Result<()>> {
        let styles = VisualizationStyles {
            node_font_size,
            circle_padding,
            ..*self.root.styles()
        };
        let styled = self.root.apply_styles(styles);
        let refreshed = self.refresh();
        try_join(styled, refreshed).map_ok(|_| ()).boxed_local()
    }

    pub fn toggle_fold(&self, full_name: &str) -> Completion {
        self.root.toggle_fold_by_name(full_name)
    }

    pub fn drag(&self, full_name: &str, dx: f64, dy: f64) -> Completion {
        self.root.drag_by_name(full_name, dx, dy)
    }

    /// Drains the update queue.
    pub async fn settle(&mut self) {
        self.root.process().await;
    }
}
