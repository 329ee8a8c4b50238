use futures::executor::block_on;
use nautilus::{
    Dependencies, Error, Link, Listener, NodeSnapshot, NodeType, NodeView, NoopView, Point, Root,
    SourceNode, ViewFuture, VisualizationStyles,
};
use nautilus_geom::enclosing_circle;
use serde::Deserialize;
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Deserialize)]
struct Fixture {
    root: SourceNode,
    links: Vec<Link>,
}

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn fixture() -> Fixture {
    let path = repo_root().join("fixtures").join("basic.json");
    let text = std::fs::read_to_string(&path).expect("read fixture");
    serde_json::from_str(&text).expect("parse fixture")
}

fn node(full_name: &str, node_type: NodeType, children: Vec<SourceNode>) -> SourceNode {
    let name = full_name.rsplit('.').next().unwrap_or(full_name);
    SourceNode::new(name, full_name, node_type).with_children(children)
}

fn laid_out(source: &SourceNode, links: Vec<Link>) -> Root {
    let mut root = Root::new(source, Dependencies::new(links), Rc::new(NoopView));
    let done = root.relayout();
    block_on(root.process());
    block_on(done).unwrap();
    root
}

fn by_name<'a>(snapshot: &'a [NodeSnapshot], full_name: &str) -> &'a NodeSnapshot {
    snapshot
        .iter()
        .find(|n| n.full_name == full_name)
        .unwrap_or_else(|| panic!("{full_name} not rendered"))
}

#[test]
fn root_is_shifted_to_its_radius() {
    let fixture = fixture();
    let root = laid_out(&fixture.root, fixture.links);
    let snapshot = root.snapshot();
    let r = &snapshot[0];
    assert_eq!(r.full_name, "default");
    assert!(r.r > 0.0);
    assert_eq!((r.x, r.y), (r.r, r.r));
    assert_eq!((r.relative_x, r.relative_y), (r.r, r.r));
}

#[test]
fn single_child_is_centered_in_its_parent() {
    let source = node(
        "default",
        NodeType::Package,
        vec![node(
            "A",
            NodeType::Package,
            vec![node("A.B", NodeType::Class, vec![])],
        )],
    );
    let root = laid_out(&source, Vec::new());
    let snapshot = root.snapshot();
    let a = by_name(&snapshot, "A");
    let b = by_name(&snapshot, "A.B");
    assert_eq!((b.relative_x, b.relative_y), (0.0, 0.0));
    assert_eq!((b.x, b.y), (a.x, a.y));

    let styles = VisualizationStyles::default();
    assert!(a.r >= b.r + styles.node_font_size + styles.circle_padding);
}

#[test]
fn parents_are_at_least_as_large_as_their_packed_children() {
    let fixture = fixture();
    let root = laid_out(&fixture.root, fixture.links);
    let styles = root.styles();
    let tree = root.tree();

    for id in tree.self_and_descendants(tree.root()) {
        let node = tree.node(id);
        let children = node.current_children();
        if children.len() < 2 {
            continue;
        }
        let radii: Vec<f64> = children.iter().map(|&c| tree.node(c).radius()).collect();
        let packed = enclosing_circle(&radii, styles.circle_padding).unwrap();
        assert!(node.radius() >= packed.r - 1e-9, "{}", node.full_name());
        assert!(node.radius() >= styles.default_radius(node) - 1e-9);
    }
}

#[test]
fn children_stay_inside_their_parents() {
    let fixture = fixture();
    let root = laid_out(&fixture.root, fixture.links);
    let padding = root.styles().circle_padding;
    let tree = root.tree();

    for id in tree.descendants(tree.root()) {
        let child = tree.node(id).circle().absolute();
        let parent = tree.parent_absolute(id);
        assert!(
            child.distance(&parent) + child.r <= parent.r - padding + 1e-6,
            "{} escapes its parent",
            tree.node(id).full_name()
        );
    }
}

#[test]
fn layout_is_deterministic() {
    let fixture = fixture();
    let first = laid_out(&fixture.root, fixture.links.clone()).snapshot();
    let second = laid_out(&fixture.root, fixture.links).snapshot();
    assert_eq!(first, second);
}

#[test]
fn folded_packages_are_laid_out_as_leaves() {
    let fixture = fixture();
    let mut root = Root::new(
        &fixture.root,
        Dependencies::new(fixture.links),
        Rc::new(NoopView),
    );
    let _ = root.fold_all();
    block_on(root.process());

    let snapshot = root.snapshot();
    let names: Vec<&str> = snapshot.iter().map(|n| n.full_name.as_str()).collect();
    assert_eq!(names, vec!["default", "com.example"]);
    let example = by_name(&snapshot, "com.example");
    assert!(example.folded);
    assert!(!example.leaf);
    assert_eq!((example.relative_x, example.relative_y), (0.0, 0.0));
}

#[test]
fn larger_font_grows_every_circle() {
    let fixture = fixture();
    let small = laid_out(&fixture.root, fixture.links.clone());

    let mut large = Root::new(
        &fixture.root,
        Dependencies::new(fixture.links),
        Rc::new(NoopView),
    );
    let styles = VisualizationStyles {
        node_font_size: 20.0,
        ..VisualizationStyles::default()
    };
    let _ = large.apply_styles(styles);
    let _ = large.relayout();
    block_on(large.process());

    for (a, b) in small.snapshot().iter().zip(large.snapshot().iter()) {
        assert_eq!(a.full_name, b.full_name);
        assert!(b.r > a.r, "{}", a.full_name);
    }
}

#[test]
fn links_source_is_queried_once_per_pass() {
    let fixture = fixture();
    let calls = Rc::new(Cell::new(0usize));
    let counted = calls.clone();
    let links = fixture.links.clone();
    let mut root = Root::new(
        &fixture.root,
        move |_: &nautilus::Tree| {
            counted.set(counted.get() + 1);
            links.clone()
        },
        Rc::new(NoopView),
    );
    let _ = root.relayout();
    let _ = root.relayout();
    block_on(root.process());
    assert_eq!(calls.get(), 1);

    let _ = root.relayout();
    block_on(root.process());
    assert_eq!(calls.get(), 2);
}

#[derive(Default)]
struct RecordingView {
    radii: RefCell<Vec<(String, f64)>>,
    moves: RefCell<Vec<(String, Point)>>,
    shown: RefCell<Vec<String>>,
    reject_radius_of: RefCell<Option<String>>,
}

impl NodeView for RecordingView {
    fn show_if_visible(&self, full_name: &str, visible: bool) {
        if visible {
            self.shown.borrow_mut().push(full_name.to_string());
        }
    }

    fn change_radius(&self, full_name: &str, radius: f64) -> ViewFuture {
        self.radii
            .borrow_mut()
            .push((full_name.to_string(), radius));
        if self.reject_radius_of.borrow().as_deref() == Some(full_name) {
            return Box::pin(futures::future::err::<(), Error>(Error::ViewRejected {
                full_name: full_name.to_string(),
                message: "detached".to_string(),
            }));
        }
        nautilus::view::ready()
    }

    fn move_to_position(&self, full_name: &str, position: Point) -> ViewFuture {
        self.moves
            .borrow_mut()
            .push((full_name.to_string(), position));
        nautilus::view::ready()
    }
}

#[test]
fn view_receives_final_positions_and_radii() {
    let fixture = fixture();
    let view = Rc::new(RecordingView::default());
    let mut root = Root::new(
        &fixture.root,
        Dependencies::new(fixture.links),
        view.clone(),
    );
    let _ = root.relayout();
    block_on(root.process());

    let snapshot = root.snapshot();
    for n in &snapshot {
        let last_radius = view
            .radii
            .borrow()
            .iter()
            .rev()
            .find(|(name, _)| *name == n.full_name)
            .map(|(_, r)| *r);
        assert_eq!(last_radius, Some(n.r), "{}", n.full_name);

        let last_move = view
            .moves
            .borrow()
            .iter()
            .rev()
            .find(|(name, _)| *name == n.full_name)
            .map(|(_, p)| *p);
        assert_eq!(
            last_move,
            Some(nautilus::point(n.relative_x, n.relative_y)),
            "{}",
            n.full_name
        );
        assert!(view.shown.borrow().contains(&n.full_name));
    }
}

#[derive(Default)]
struct CountingListener {
    layouts: Cell<usize>,
}

impl Listener for CountingListener {
    fn on_layout_changed(&self) -> ViewFuture {
        self.layouts.set(self.layouts.get() + 1);
        nautilus::view::ready()
    }
}

#[test]
fn rejected_view_future_fails_only_its_own_task() {
    let fixture = fixture();
    let view = Rc::new(RecordingView::default());
    *view.reject_radius_of.borrow_mut() = Some("com.example.model.Order".to_string());
    let mut root = Root::new(
        &fixture.root,
        Dependencies::new(fixture.links),
        view.clone(),
    );
    let listener = Rc::new(CountingListener::default());
    root.add_listener(listener.clone());

    let relayout = root.relayout();
    let filtered = root.filter_by_type(true, false);
    let dragged = root.drag_by_name("com.example.web", 1.0, 0.0);
    block_on(root.process());

    assert!(matches!(
        block_on(relayout),
        Err(Error::ViewRejected { full_name, .. }) if full_name == "com.example.model.Order"
    ));
    block_on(filtered).unwrap();
    block_on(dragged).unwrap();

    *view.reject_radius_of.borrow_mut() = None;
    let before = listener.layouts.get();
    let again = root.relayout();
    block_on(root.process());
    block_on(again).unwrap();
    assert_eq!(listener.layouts.get(), before + 1);
}

#[test]
fn cross_level_link_pulls_its_endpoints_together() {
    let source = node(
        "default",
        NodeType::Package,
        vec![
            node(
                "a",
                NodeType::Package,
                vec![
                    node("a.A1", NodeType::Class, vec![]),
                    node("a.A2", NodeType::Class, vec![]),
                    node("a.A3", NodeType::Class, vec![]),
                    node("a.A4", NodeType::Class, vec![]),
                ],
            ),
            node(
                "b",
                NodeType::Package,
                vec![
                    node("b.B1", NodeType::Class, vec![]),
                    node("b.B2", NodeType::Class, vec![]),
                ],
            ),
        ],
    );
    let distance = |root: &Root| {
        let snapshot = root.snapshot();
        let a3 = by_name(&snapshot, "a.A3");
        let b = by_name(&snapshot, "b");
        (a3.x - b.x).hypot(a3.y - b.y)
    };

    let unlinked = laid_out(&source, Vec::new());
    let linked = laid_out(&source, vec![Link::new("a.A3", "b")]);
    assert!(distance(&linked) < distance(&unlinked));
}
