//! Serial update queue.
//!
//! Every state change of the tree is a [`Task`] pushed through an unbounded channel and executed
//! by [`crate::Root::process`], one at a time and in submission order. Each submission returns a
//! [`Completion`] that resolves with the task's result.

use crate::config::VisualizationStyles;
use crate::error::{Error, Result};
use crate::filter::{NameFilter, TypeFilter};
use crate::node::NodeId;
use futures::channel::{mpsc, oneshot};
use nautilus_geom::Vector;
use std::cell::Cell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

#[derive(Debug, Clone)]
pub enum Task {
    FoldAll,
    ToggleFold(NodeId),
    Drag { node: NodeId, delta: Vector },
    FilterByName(NameFilter),
    FilterByType(TypeFilter),
    ApplyStyles(VisualizationStyles),
    Relayout,
}

impl Task {
    pub fn label(&self) -> &'static str {
        match self {
            Task::FoldAll => "fold-all",
            Task::ToggleFold(_) => "toggle-fold",
            Task::Drag { .. } => "drag",
            Task::FilterByName(_) => "filter-by-name",
            Task::FilterByType(_) => "filter-by-type",
            Task::ApplyStyles(_) => "apply-styles",
            Task::Relayout => "relayout",
        }
    }

    /// Tasks whose effect is only visible after the next layout pass.
    pub(crate) fn invalidates_layout(&self) -> bool {
        !matches!(self, Task::Drag { .. } | Task::Relayout)
    }
}

pub(crate) struct Job {
    pub(crate) task: Task,
    pub(crate) done: oneshot::Sender<Result<()>>,
}

/// Cloneable submission side of the queue, suitable for UI callbacks.
#[derive(Clone)]
pub struct UpdateHandle {
    sender: mpsc::UnboundedSender<Job>,
    relayout_pending: Rc<Cell<bool>>,
}

impl std::fmt::Debug for UpdateHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateHandle")
            .field("relayout_pending", &self.relayout_pending.get())
            .finish()
    }
}

impl UpdateHandle {
    pub fn enqueue(&self, task: Task) -> Completion {
        let (done, receiver) = oneshot::channel();
        tracing::trace!(task = task.label(), "enqueue");
        // A closed receiver drops the job, which resolves the completion with `QueueClosed`.
        let _ = self.sender.unbounded_send(Job { task, done });
        Completion(receiver)
    }

    /// Requests a full relayout. Requests issued before the queue reaches the first of them are
    /// served by a single layout pass.
    pub fn request_relayout(&self) -> Completion {
        self.relayout_pending.set(true);
        self.enqueue(Task::Relayout)
    }

    pub fn toggle_fold(&self, node: NodeId) -> Completion {
        self.enqueue(Task::ToggleFold(node))
    }

    pub fn drag(&self, node: NodeId, delta: Vector) -> Completion {
        self.enqueue(Task::Drag { node, delta })
    }

    pub fn is_relayout_pending(&self) -> bool {
        self.relayout_pending.get()
    }

    pub(crate) fn mark_dirty(&self) {
        self.relayout_pending.set(true);
    }
}

/// Receiving side, owned by the root.
pub struct UpdateQueue {
    receiver: mpsc::UnboundedReceiver<Job>,
    handle: UpdateHandle,
}

impl std::fmt::Debug for UpdateQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateQueue")
            .field("handle", &self.handle)
            .finish()
    }
}

impl Default for UpdateQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateQueue {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded();
        Self {
            receiver,
            handle: UpdateHandle {
                sender,
                relayout_pending: Rc::new(Cell::new(false)),
            },
        }
    }

    pub fn handle(&self) -> &UpdateHandle {
        &self.handle
    }

    /// Next queued job, or `None` once the queue is drained.
    #[allow(deprecated)]
    pub(crate) fn next_job(&mut self) -> Option<Job> {
        self.receiver.try_next().ok().flatten()
    }

    /// Consumes a pending relayout request; `false` means an earlier pass already served it.
    pub(crate) fn take_relayout_request(&self) -> bool {
        self.handle.relayout_pending.replace(false)
    }
}

/// Resolves once the queued task ran.
#[must_use = "a completion does nothing unless awaited; the task runs regardless"]
#[derive(Debug)]
pub struct Completion(oneshot::Receiver<Result<()>>);

impl Completion {
    pub(crate) fn failed(error: Error) -> Self {
        let (done, receiver) = oneshot::channel();
        let _ = done.send(Err(error));
        Completion(receiver)
    }
}

impl Future for Completion {
    type Output = Result<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.0).poll(cx).map(|r| match r {
            Ok(result) => result,
            Err(oneshot::Canceled) => Err(Error::QueueClosed),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Task, UpdateQueue};
    use crate::error::Error;
    use futures::executor::block_on;

    #[test]
    fn jobs_come_out_in_submission_order() {
        let mut queue = UpdateQueue::new();
        let handle = queue.handle().clone();
        let _a = handle.enqueue(Task::FoldAll);
        let _b = handle.request_relayout();
        assert_eq!(queue.next_job().map(|j| j.task.label()), Some("fold-all"));
        assert_eq!(queue.next_job().map(|j| j.task.label()), Some("relayout"));
        assert!(queue.next_job().is_none());
    }

    #[test]
    fn relayout_request_is_taken_once() {
        let queue = UpdateQueue::new();
        let _a = queue.handle().request_relayout();
        let _b = queue.handle().request_relayout();
        assert!(queue.take_relayout_request());
        assert!(!queue.take_relayout_request());
    }

    #[test]
    fn dropped_job_resolves_with_queue_closed() {
        let mut queue = UpdateQueue::new();
        let completion = queue.handle().enqueue(Task::FoldAll);
        drop(queue.next_job());
        assert!(matches!(block_on(completion), Err(Error::QueueClosed)));
    }

    #[test]
    fn completion_carries_task_result() {
        let mut queue = UpdateQueue::new();
        let completion = queue.handle().enqueue(Task::Relayout);
        let job = queue.next_job().unwrap();
        job.done.send(Ok(())).unwrap();
        assert!(block_on(completion).is_ok());
    }
}
