use futures::executor::block_on;
use futures::future::try_join_all;
use nautilus::{
    Circle, Completion, Dependencies, LayoutOptions, Link, LinkSource, Listener, NodeSnapshot,
    NoopView, Root, SourceNode, VisualizationStyles,
};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::io::Read;
use std::rc::Rc;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Json(serde_json::Error),
    Engine(nautilus::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Engine(err) => write!(f, "{err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<nautilus::Error> for CliError {
    fn from(value: nautilus::Error) -> Self {
        Self::Engine(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Layout,
    Visible,
}

#[derive(Debug, Clone)]
struct Drag {
    full_name: String,
    dx: f64,
    dy: f64,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    fold_all: bool,
    toggle: Vec<String>,
    name_filter: Option<String>,
    exclude_names: bool,
    hide_interfaces: bool,
    hide_classes: bool,
    styles: Option<String>,
    options: Option<String>,
    drags: Vec<Drag>,
}

#[derive(Deserialize)]
struct InputGraph {
    root: SourceNode,
    #[serde(default)]
    links: Vec<Link>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct OverlapOut {
    full_name: String,
    x: f64,
    y: f64,
    r: f64,
}

#[derive(Serialize)]
struct LayoutOut<'a> {
    nodes: &'a [NodeSnapshot],
    links: &'a [Link],
    overlaps: &'a [OverlapOut],
}

/// Collects the overlaps reported after the last drag.
#[derive(Default)]
struct OverlapRecorder {
    overlaps: RefCell<Vec<OverlapOut>>,
}

impl Listener for OverlapRecorder {
    fn reset_nodes_overlapping(&self) {
        self.overlaps.borrow_mut().clear();
    }

    fn on_nodes_overlapping(&self, full_name: &str, circle: Circle) {
        self.overlaps.borrow_mut().push(OverlapOut {
            full_name: full_name.to_string(),
            x: circle.x,
            y: circle.y,
            r: circle.r,
        });
    }
}

fn usage() -> &'static str {
    "nautilus-cli\n\
\n\
USAGE:\n\
  nautilus-cli [layout] [--pretty] [--fold-all] [--toggle <fullName>]... [--name-filter <pattern>] [--exclude-names] [--hide-interfaces] [--hide-classes] [--styles <path>] [--options <path>] [--drag <fullName> <dx> <dy>]... [<path>|-]\n\
  nautilus-cli visible [--fold-all] [--toggle <fullName>]... [--name-filter <pattern>] [--exclude-names] [--hide-interfaces] [--hide-classes] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - Input is JSON: {\"root\": {name, fullName, type, children}, \"links\": [{source, target}]}.\n\
  - layout prints rendered nodes, effective links and the overlaps reported by the last drag.\n\
  - visible prints the full names of the rendered nodes, one per line.\n\
  - In name patterns '*' matches any characters; a trailing space anchors at the end.\n\
  - Set NAUTILUS_LAYOUT_TIMING=1 to print timings to stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "visible" => args.command = Command::Visible,
            "--pretty" => args.pretty = true,
            "--fold-all" => args.fold_all = true,
            "--exclude-names" => args.exclude_names = true,
            "--hide-interfaces" => args.hide_interfaces = true,
            "--hide-classes" => args.hide_classes = true,
            "--toggle" => {
                let Some(name) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.toggle.push(name.clone());
            }
            "--name-filter" => {
                let Some(pattern) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.name_filter = Some(pattern.clone());
            }
            "--styles" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.styles = Some(path.clone());
            }
            "--options" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.options = Some(path.clone());
            }
            "--drag" => {
                let (Some(name), Some(dx), Some(dy)) = (it.next(), it.next(), it.next()) else {
                    return Err(CliError::Usage(usage()));
                };
                args.drags.push(Drag {
                    full_name: name.clone(),
                    dx: dx.parse::<f64>().map_err(|_| CliError::Usage(usage()))?,
                    dy: dy.parse::<f64>().map_err(|_| CliError::Usage(usage()))?,
                });
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn read_json_file<T: serde::de::DeserializeOwned + Default>(
    path: Option<&str>,
) -> Result<T, CliError> {
    match path {
        None => Ok(T::default()),
        Some(path) => Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    Ok(())
}

/// Queues the fold and filter state requested on the command line.
fn queue_view_state(root: &Root, args: &Args) -> Result<Vec<Completion>, CliError> {
    let mut pending = Vec::new();
    if args.fold_all {
        pending.push(root.fold_all());
    }
    for name in &args.toggle {
        pending.push(root.toggle_fold_by_name(name));
    }
    if let Some(pattern) = &args.name_filter {
        pending.push(root.filter_by_name(pattern, args.exclude_names)?);
    }
    if args.hide_interfaces || args.hide_classes {
        pending.push(root.filter_by_type(!args.hide_interfaces, !args.hide_classes));
    }
    Ok(pending)
}

fn run(args: Args) -> Result<(), CliError> {
    let timing_enabled = std::env::var("NAUTILUS_LAYOUT_TIMING")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    let total_start = timing_enabled.then(std::time::Instant::now);

    let text = read_input(args.input.as_deref())?;
    let input: InputGraph = serde_json::from_str(&text)?;
    let styles: VisualizationStyles = read_json_file(args.styles.as_deref())?;
    let options: LayoutOptions = read_json_file(args.options.as_deref())?;

    let dependencies = Dependencies::new(input.links);
    let mut root = Root::new(&input.root, dependencies.clone(), Rc::new(NoopView))
        .with_styles(styles)
        .with_options(options);
    let recorder = Rc::new(OverlapRecorder::default());
    root.add_listener(recorder.clone());

    let mut pending = queue_view_state(&root, &args)?;
    if let Command::Layout = args.command {
        pending.push(root.relayout());
        for drag in &args.drags {
            pending.push(root.drag_by_name(&drag.full_name, drag.dx, drag.dy));
        }
    }

    let queue_start = timing_enabled.then(std::time::Instant::now);
    block_on(root.process());
    block_on(try_join_all(pending))?;
    let queue = queue_start.map(|s| s.elapsed()).unwrap_or_default();

    match args.command {
        Command::Layout => {
            let nodes = root.snapshot();
            let links = dependencies.links(root.tree());
            let overlaps = recorder.overlaps.borrow();
            write_json(
                &LayoutOut {
                    nodes: &nodes,
                    links: &links,
                    overlaps: &overlaps,
                },
                args.pretty,
            )?;
        }
        Command::Visible => {
            for node in root.snapshot() {
                println!("{}", node.full_name);
            }
        }
    }

    if let Some(start) = total_start {
        eprintln!(
            "nautilus timing: total={:?} queue={:?} nodes={} rendered={}",
            start.elapsed(),
            queue,
            root.tree().len(),
            root.snapshot().len(),
        );
    }
    Ok(())
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
