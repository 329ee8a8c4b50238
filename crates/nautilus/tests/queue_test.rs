use futures::executor::block_on;
use nautilus::{
    Error, Graph, Listener, NodeType, NodeView, Root, SourceNode, Task, TypeFilterConfig,
    ViewFuture,
};
use std::cell::RefCell;
use std::rc::Rc;

fn node(full_name: &str, node_type: NodeType, children: Vec<SourceNode>) -> SourceNode {
    let name = full_name.rsplit('.').next().unwrap_or(full_name);
    SourceNode::new(name, full_name, node_type).with_children(children)
}

fn sample() -> SourceNode {
    node(
        "default",
        NodeType::Package,
        vec![node(
            "a",
            NodeType::Package,
            vec![
                node("a.A1", NodeType::Class, vec![]),
                node("a.A2", NodeType::Class, vec![]),
                node("a.I1", NodeType::Interface, vec![]),
            ],
        )],
    )
}

type Log = Rc<RefCell<Vec<String>>>;

struct LoggingView(Log);

impl NodeView for LoggingView {
    fn hide(&self, full_name: &str) {
        self.0.borrow_mut().push(format!("hide:{full_name}"));
    }
}

struct LoggingListener(Log);

impl Listener for LoggingListener {
    fn on_layout_changed(&self) -> ViewFuture {
        self.0.borrow_mut().push("layout-changed".to_string());
        nautilus::view::ready()
    }
}

fn graph(log: &Log) -> Graph {
    let mut graph = Graph::new(&sample(), Vec::new(), Rc::new(LoggingView(log.clone())));
    graph.add_listener(Rc::new(LoggingListener(log.clone())));
    graph
}

fn position(log: &[String], entry: &str) -> usize {
    log.iter()
        .position(|e| e == entry)
        .unwrap_or_else(|| panic!("{entry} missing from {log:?}"))
}

fn count(log: &[String], entry: &str) -> usize {
    log.iter().filter(|e| *e == entry).count()
}

#[test]
fn name_filter_effects_precede_type_filter_effects() {
    let log = Log::default();
    let mut graph = graph(&log);
    block_on(graph.settle());
    log.borrow_mut().clear();

    let by_name = graph.filter_nodes_by_name_containing("A").unwrap();
    let by_type = graph.filter_nodes_by_type(TypeFilterConfig {
        show_interfaces: true,
        show_classes: false,
    });
    block_on(graph.settle());
    block_on(by_name).unwrap();
    block_on(by_type).unwrap();

    let log = log.borrow();
    let hidden_interface = position(&log, "hide:a.I1");
    let first_layout = position(&log, "layout-changed");
    let hidden_package = position(&log, "hide:a");
    assert!(hidden_interface < first_layout);
    assert!(first_layout < hidden_package);
    assert_eq!(count(&log, "layout-changed"), 2);
}

#[test]
fn relayout_burst_runs_a_single_pass() {
    let log = Log::default();
    let mut graph = graph(&log);
    let completions = vec![graph.refresh(), graph.refresh(), graph.refresh()];
    block_on(graph.settle());

    for completion in completions {
        block_on(completion).unwrap();
    }
    assert_eq!(count(&log.borrow(), "layout-changed"), 1);
}

#[test]
fn relayout_queued_behind_a_filter_still_runs() {
    let log = Log::default();
    let source = sample();
    let mut root = Root::new(
        &source,
        nautilus::Dependencies::default(),
        Rc::new(LoggingView(log.clone())),
    );
    root.add_listener(Rc::new(LoggingListener(log.clone())));

    let _ = root.relayout();
    let _ = root.filter_by_name("A1", false).unwrap();
    let _ = root.relayout();
    block_on(root.process());

    assert_eq!(count(&log.borrow(), "layout-changed"), 2);
}

#[test]
fn drag_does_not_force_a_relayout() {
    let log = Log::default();
    let mut graph = graph(&log);
    block_on(graph.settle());

    let dragged = graph.drag("a.A1", 1.0, 1.0);
    let refreshed = graph.refresh();
    block_on(graph.settle());
    block_on(dragged).unwrap();
    block_on(refreshed).unwrap();
    assert_eq!(count(&log.borrow(), "layout-changed"), 2);

    assert!(!graph.root().handle().is_relayout_pending());
}

#[test]
fn tasks_queued_from_a_handle_run_in_order() {
    let log = Log::default();
    let mut graph = graph(&log);
    block_on(graph.settle());
    let handle = graph.root().handle();
    let a = graph.root().get_by_name("a").unwrap();

    let folded = handle.toggle_fold(a);
    let unfolded = handle.enqueue(Task::ToggleFold(a));
    block_on(graph.settle());
    block_on(folded).unwrap();
    block_on(unfolded).unwrap();

    assert!(!graph.root().node(a).is_folded());
    let log = log.borrow();
    assert_eq!(count(&log, "hide:a.A1"), 1);
    assert_eq!(count(&log, "layout-changed"), 2);
}

#[test]
fn create_starts_folded() {
    let log = Log::default();
    let mut graph = Graph::create(&sample(), Vec::new(), Rc::new(LoggingView(log.clone())));
    block_on(graph.settle());

    let a = graph.root().get_by_name("a").unwrap();
    assert!(graph.root().node(a).is_folded());
    let snapshot = graph.root().snapshot();
    assert_eq!(snapshot.len(), 2);
}

#[test]
fn create_lays_out_only_the_folded_tree() {
    let log = Log::default();
    let mut graph = Graph::create(&sample(), Vec::new(), Rc::new(LoggingView(log.clone())));
    graph.add_listener(Rc::new(LoggingListener(log.clone())));
    block_on(graph.settle());

    assert_eq!(count(&log.borrow(), "layout-changed"), 1);
    assert!(!graph.root().handle().is_relayout_pending());
}

#[test]
fn change_settings_relayouts_with_new_styles() {
    let log = Log::default();
    let mut graph = graph(&log);
    block_on(graph.settle());
    let before = graph.root().snapshot();

    let done = graph.change_settings(14.0, 3.0);
    block_on(graph.settle());
    block_on(done).unwrap();

    let styles = graph.root().styles();
    assert_eq!((styles.node_font_size, styles.circle_padding), (14.0, 3.0));
    let after = graph.root().snapshot();
    assert!(after[0].r > before[0].r);
}

#[test]
fn change_settings_reports_tasks_that_never_ran() {
    let log = Log::default();
    let graph = graph(&log);
    let done = graph.change_settings(14.0, 3.0);
    drop(graph);

    assert!(matches!(block_on(done), Err(Error::QueueClosed)));
}
