//! Boundary to whatever draws the circles.
//!
//! Views are addressed by full name. Animated operations return a [`ViewFuture`] that resolves
//! once the animation settles; a rejected future aborts the queued task that awaited it.

use crate::error::Result;
use futures::FutureExt;
use futures::future::{self, LocalBoxFuture};
use nautilus_geom::Point;
use std::rc::Rc;

pub type ViewFuture = LocalBoxFuture<'static, Result<()>>;

pub fn ready() -> ViewFuture {
    future::ready(Ok(())).boxed_local()
}

pub trait NodeView {
    fn update_node_type(&self, _full_name: &str, _class: &str) {}

    fn hide(&self, _full_name: &str) {}

    fn show_if_visible(&self, _full_name: &str, _visible: bool) {}

    fn jump_to_position(&self, _full_name: &str, _position: Point) {}

    fn change_radius(&self, _full_name: &str, _radius: f64) -> ViewFuture {
        ready()
    }

    fn move_to_position(&self, _full_name: &str, _position: Point) -> ViewFuture {
        ready()
    }

    fn start_move_to_position(&self, _full_name: &str, _position: Point) -> ViewFuture {
        ready()
    }
}

/// Resolves every operation immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopView;

impl NodeView for NoopView {}

/// Moves the node in the view and reveals it afterwards if it is still meant to be visible.
pub(crate) fn move_and_show(
    view: &Rc<dyn NodeView>,
    full_name: &str,
    position: Point,
    visible: bool,
) -> ViewFuture {
    let moved = view.move_to_position(full_name, position);
    let view = Rc::clone(view);
    let full_name = full_name.to_owned();
    async move {
        moved.await?;
        view.show_if_visible(&full_name, visible);
        Ok(())
    }
    .boxed_local()
}
