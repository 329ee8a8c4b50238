use crate::view::{self, ViewFuture};
use nautilus_geom::Circle;
use std::rc::Rc;

/// Observer of tree events. Nodes are identified by full name.
pub trait Listener {
    fn on_drag(&self, _full_name: &str) {}

    fn reset_nodes_overlapping(&self) {}

    /// `full_name` is the lower-layer node of the pair, `circle` the absolute circle of the
    /// other one.
    fn on_nodes_overlapping(&self, _full_name: &str, _circle: Circle) {}

    fn finish_on_nodes_overlapping(&self) {}

    fn on_initial_fold(&self, _full_name: &str) {}

    fn on_fold(&self, _full_name: &str, _folded: bool) {}

    fn on_all_nodes_folded_finished(&self) {}

    fn on_layout_changed(&self) -> ViewFuture {
        view::ready()
    }
}

/// Registry owned by the root; nodes publish through it instead of holding listeners.
#[derive(Default, Clone)]
pub struct Listeners {
    entries: Vec<Rc<dyn Listener>>,
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.entries.len())
            .finish()
    }
}

impl Listeners {
    pub fn add(&mut self, listener: Rc<dyn Listener>) {
        self.entries.push(listener);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn notify(&self, f: impl Fn(&dyn Listener)) {
        for listener in &self.entries {
            f(listener.as_ref());
        }
    }

    pub fn on_layout_changed(&self) -> Vec<ViewFuture> {
        self.entries.iter().map(|l| l.on_layout_changed()).collect()
    }
}
