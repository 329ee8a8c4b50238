//! The tree context: nodes, filters, listeners and the update queue that serializes changes.

use crate::config::{LayoutOptions, VisualizationStyles};
use crate::dependencies::LinkSource;
use crate::error::{Error, Result};
use crate::filter::{self, Filters, NameFilter, TypeFilter};
use crate::layout;
use crate::listener::{Listener, Listeners};
use crate::model::SourceNode;
use crate::node::{Node, NodeId};
use crate::overlap;
use crate::queue::{Completion, Task, UpdateHandle, UpdateQueue};
use crate::tree::{NodeSnapshot, Tree};
use crate::view::NodeView;
use futures::future::try_join_all;
use nautilus_geom::{Vector, vector};
use std::rc::Rc;

pub struct Root {
    tree: Tree,
    filters: Filters,
    queue: UpdateQueue,
    links: Box<dyn LinkSource>,
    view: Rc<dyn NodeView>,
    listeners: Listeners,
    styles: VisualizationStyles,
    options: LayoutOptions,
}

impl std::fmt::Debug for Root {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Root")
            .field("nodes", &self.tree.len())
            .field("filters", &self.filters)
            .field("queue", &self.queue)
            .field("listeners", &self.listeners)
            .field("styles", &self.styles)
            .finish_non_exhaustive()
    }
}

impl Root {
    pub fn new(
        source: &SourceNode,
        links: impl LinkSource + 'static,
        view: Rc<dyn NodeView>,
    ) -> Self {
        Self {
            tree: Tree::build(source),
            filters: Filters::default(),
            queue: UpdateQueue::new(),
            links: Box::new(links),
            view,
            listeners: Listeners::default(),
            styles: VisualizationStyles::default(),
            options: LayoutOptions::default(),
        }
    }

    pub fn with_styles(mut self, styles: VisualizationStyles) -> Self {
        self.styles = styles;
        self
    }

    pub fn with_options(mut self, options: LayoutOptions) -> Self {
        self.options = options;
        self
    }

    pub fn add_listener(&mut self, listener: Rc<dyn Listener>) {
        self.listeners.add(listener);
    }

    pub fn handle(&self) -> UpdateHandle {
        self.queue.handle().clone()
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn node(&self, id: NodeId) -> &Node {
        self.tree.node(id)
    }

    pub fn get_by_name(&self, full_name: &str) -> Option<NodeId> {
        self.tree.get_by_name(full_name)
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn styles(&self) -> &VisualizationStyles {
        &self.styles
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    pub fn snapshot(&self) -> Vec<NodeSnapshot> {
        self.tree.snapshot()
    }

    pub fn fold_all(&self) -> Completion {
        self.queue.handle().enqueue(Task::FoldAll)
    }

    /// Keeps nodes whose full name contains `pattern` (or, with `exclude`, does not), together
    /// with their ancestors. A blank pattern clears the name filter.
    pub fn filter_by_name(&self, pattern: &str, exclude: bool) -> Result<Completion> {
        let filter = NameFilter::new(pattern, exclude)?;
        Ok(self.queue.handle().enqueue(Task::FilterByName(filter)))
    }

    pub fn filter_by_type(&self, show_interfaces: bool, show_classes: bool) -> Completion {
        self.queue.handle().enqueue(Task::FilterByType(TypeFilter {
            show_interfaces,
            show_classes,
        }))
    }

    pub fn apply_styles(&self, styles: VisualizationStyles) -> Completion {
        self.queue.handle().enqueue(Task::ApplyStyles(styles))
    }

    pub fn relayout(&self) -> Completion {
        self.queue.handle().request_relayout()
    }

    pub fn toggle_fold(&self, id: NodeId) -> Completion {
        self.queue.handle().toggle_fold(id)
    }

    pub fn toggle_fold_by_name(&self, full_name: &str) -> Completion {
        match self.tree.get_by_name(full_name) {
            Some(id) => self.toggle_fold(id),
            None => Completion::failed(Error::UnknownNode {
                full_name: full_name.to_string(),
            }),
        }
    }

    pub fn drag(&self, id: NodeId, dx: f64, dy: f64) -> Completion {
        self.queue.handle().drag(id, vector(dx, dy))
    }

    pub fn drag_by_name(&self, full_name: &str, dx: f64, dy: f64) -> Completion {
        match self.tree.get_by_name(full_name) {
            Some(id) => self.drag(id, dx, dy),
            None => Completion::failed(Error::UnknownNode {
                full_name: full_name.to_string(),
            }),
        }
    }

    /// Runs queued tasks in submission order until the queue is empty, including tasks queued
    /// by the tasks themselves. A failing task resolves its own completion with the error; the
    /// next task still runs.
    pub async fn process(&mut self) {
        while let Some(job) = self.queue.next_job() {
            let label = job.task.label();
            tracing::trace!(task = label, "start");
            let result = self.execute(job.task).await;
            if let Err(err) = &result {
                tracing::warn!(task = label, error = %err, "queued task failed");
            }
            let _ = job.done.send(result);
        }
    }

    async fn execute(&mut self, task: Task) -> Result<()> {
        if task.invalidates_layout() {
            self.queue.handle().mark_dirty();
        }
        match task {
            Task::FoldAll => {
                self.fold_all_now();
                Ok(())
            }
            Task::ToggleFold(id) => {
                self.toggle_fold_now(id);
                Ok(())
            }
            Task::Drag { node, delta } => {
                self.drag_now(node, delta);
                Ok(())
            }
            Task::FilterByName(name) => {
                self.filters.name = (!name.is_blank()).then_some(name);
                filter::apply(&mut self.tree, &self.filters, self.view.as_ref());
                Ok(())
            }
            Task::FilterByType(node_type) => {
                self.filters.node_type = Some(node_type);
                filter::apply(&mut self.tree, &self.filters, self.view.as_ref());
                Ok(())
            }
            Task::ApplyStyles(styles) => {
                self.styles = styles;
                Ok(())
            }
            Task::Relayout => {
                if self.queue.take_relayout_request() {
                    self.relayout_completely().await
                } else {
                    tracing::debug!("relayout already served by an earlier pass");
                    Ok(())
                }
            }
        }
    }

    fn fold_all_now(&mut self) {
        let view = Rc::clone(&self.view);
        let root = self.tree.root();
        for id in self.tree.descendants_then_self(root) {
            if id == root || self.tree.node(id).is_leaf() {
                continue;
            }
            self.tree.set_folded(id, true, view.as_ref());
            let full_name = self.tree.node(id).full_name();
            self.listeners.notify(|l| l.on_initial_fold(full_name));
        }
        self.listeners.notify(|l| l.on_all_nodes_folded_finished());
        let _ = self.queue.handle().request_relayout();
    }

    fn toggle_fold_now(&mut self, id: NodeId) {
        let node = self.tree.node(id);
        if node.is_root() || node.is_leaf() {
            return;
        }
        let folded = !node.is_folded();
        self.tree.set_folded(id, folded, self.view.as_ref());
        let full_name = self.tree.node(id).full_name();
        self.listeners.notify(|l| l.on_fold(full_name, folded));
        let _ = self.queue.handle().request_relayout();
    }

    fn drag_now(&mut self, id: NodeId, delta: Vector) {
        overlap::drag(
            &mut self.tree,
            id,
            delta,
            self.view.as_ref(),
            &self.listeners,
        );
    }

    async fn relayout_completely(&mut self) -> Result<()> {
        let mut pending = layout::initial_layout(&mut self.tree, &self.styles, &self.view)?;
        let links = self.links.links(&self.tree);
        pending.extend(layout::force_layout(
            &mut self.tree,
            &links,
            &self.styles,
            &self.options,
            &self.view,
        ));
        pending.extend(self.listeners.on_layout_changed());
        tracing::debug!(
            nodes = self.tree.len(),
            links = links.len(),
            animations = pending.len(),
            "relayout"
        );
        try_join_all(pending).await?;
        Ok(())
    }
}
