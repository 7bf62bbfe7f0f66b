use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use treebolic_core::{Graph, LoadBalancer, Model, Settings};
use treebolic_core::synthetic::{self, TreeShape};
use treebolic_events::{Event, EventBus};
use treebolic_hyper::Complex;
use treebolic_search::{MatchMode, MatchScope};
use treebolic_view::animation::ANIMATION_DURATION;
use treebolic_view::{Controller, SearchCommand, View};

mod svg;

use svg::SvgGraphics;

/// Render a hyperbolic tree to SVG: the initial view, the frames of a focus
/// animation and the views focused by a search.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory the SVG frames are written to
    #[arg(short, long, default_value = "frames")]
    out: PathBuf,

    /// Settings file (JSON)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Graph file (JSON) spanned into the tree instead of a generated one
    #[arg(short, long)]
    graph: Option<PathBuf>,

    /// Levels of the generated tree
    #[arg(long, default_value_t = 3)]
    depth: usize,

    /// Children per inner node
    #[arg(long, default_value_t = 4)]
    fanout: usize,

    /// Turn every n-th leaf into a mount point (0 disables)
    #[arg(long, default_value_t = 0)]
    mount_every: usize,

    #[arg(long, default_value_t = 800.0)]
    width: f64,

    #[arg(long, default_value_t = 800.0)]
    height: f64,

    /// Node id to animate to the center
    #[arg(short, long)]
    focus: Option<String>,

    /// Number of animation frames
    #[arg(long)]
    frames: Option<usize>,

    /// Search target; every match is focused and rendered
    #[arg(long)]
    search: Option<String>,

    #[arg(long, default_value = "label")]
    scope: MatchScope,

    #[arg(long, default_value = "includes")]
    mode: MatchMode,

    /// Maximum search results to render
    #[arg(long, default_value_t = 5)]
    max_results: usize,

    /// Directory node images are looked up in
    #[arg(long)]
    images: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();
    run(&args)
}

fn run(args: &Args) -> Result<()> {
    let settings = match &args.settings {
        Some(path) => Settings::load(path).with_context(|| format!("Failed to load settings from {:?}", path))?,
        None => Settings::default(),
    };
    std::fs::create_dir_all(&args.out).with_context(|| format!("Failed to create {:?}", args.out))?;

    let model = load_model(args)?;

    let mut view = View::from_settings(model, &settings)?;
    view.resize(args.width, args.height);
    view.start(false)?;

    let mut renderer = Renderer {
        out: &args.out,
        images: args.images.clone(),
        written: 0,
    };
    renderer.write(&mut view, "start")?;

    if let Some(id) = &args.focus {
        let Some(node) = view.find_node_by_id(id) else {
            bail!("No node with id {}", id);
        };
        let from = view.model()[node].location.hyper.center;
        animate(&mut view, &mut renderer, from, args.frames, "focus")?;
    }

    if let Some(target) = &args.search {
        search(&mut view, &mut renderer, args, target)?;
    }

    println!("Wrote {} frames to {:?}", renderer.written, args.out);
    Ok(())
}

fn load_model(args: &Args) -> Result<Model> {
    let Some(path) = &args.graph else {
        let model = synthetic::generate(TreeShape {
            depth: args.depth,
            fanout: args.fanout,
            mount_every: args.mount_every,
        });
        tracing::info!("Generated tree with {} nodes", model.node_count());
        return Ok(model);
    };
    let graph = Graph::load(path).with_context(|| format!("Failed to load graph from {:?}", path))?;
    let mut model = graph.to_model()?;
    let root = model.root();
    LoadBalancer::default().balance_subtree(&mut model, root);
    tracing::info!("Spanned {} nodes and {} edges from {:?}", model.node_count(), model.edges().len(), path);
    Ok(model)
}

struct Renderer<'a> {
    out: &'a Path,
    images: Option<PathBuf>,
    written: usize,
}

impl Renderer<'_> {
    fn write(&mut self, view: &mut View, name: &str) -> Result<()> {
        let (width, height) = view.size();
        let mut g = SvgGraphics::new(width, height).with_image_dir(self.images.clone());
        view.paint(&mut g);
        let path = self.out.join(format!("{:03}-{}.svg", self.written, name));
        std::fs::write(&path, g.finish()).with_context(|| format!("Failed to write {:?}", path))?;
        tracing::debug!("Wrote {:?}", path);
        self.written += 1;
        Ok(())
    }
}

/// Animate `from` to the center and render every step.
fn animate(view: &mut View, renderer: &mut Renderer<'_>, from: Complex, frames: Option<usize>, name: &str) -> Result<()> {
    let clock = Instant::now();
    let Some(steps) = view.animate(from, Complex::ZERO, frames, clock, Duration::ZERO) else {
        tracing::info!("{} is already centered", name);
        return Ok(());
    };
    let last = steps.saturating_sub(1).max(1) as u32;
    for i in 0..steps {
        let at = clock + ANIMATION_DURATION * i as u32 / last;
        view.tick(at);
        renderer.write(view, &format!("{name}-{i}"))?;
    }
    view.finish_animation();
    Ok(())
}

fn search(view: &mut View, renderer: &mut Renderer<'_>, args: &Args, target: &str) -> Result<()> {
    let bus = EventBus::new();
    let events = bus.receiver();
    let mut controller = Controller::new(bus);

    let mut command = SearchCommand::Search {
        scope: args.scope,
        mode: args.mode,
        target: target.to_string(),
        start: None,
    };
    for i in 0..args.max_results {
        if controller.search(view, command).is_none() {
            break;
        }
        view.finish_animation();
        renderer.write(view, &format!("search-{i}"))?;
        command = SearchCommand::Continue;
    }
    controller.search(view, SearchCommand::Reset);

    for event in events.try_iter() {
        match event {
            Event::SearchResult { id } => {
                let data = &view.model()[id].data;
                println!("match {} {}", data.id, data.label.as_deref().unwrap_or(""));
            }
            Event::SearchExhausted => println!("no more matches"),
            Event::Status { kind, title, message } => tracing::debug!("{:?} {}: {}", kind, title, message),
            other => tracing::trace!("{:?}", other),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn args(out: &Path) -> Args {
        Args::parse_from(["treebolic", "--out", out.to_str().unwrap(), "--depth", "2", "--fanout", "3"])
    }

    fn svg_count(dir: &Path) -> usize {
        std::fs::read_dir(dir)
            .unwrap()
            .filter(|e| e.as_ref().unwrap().path().extension().is_some_and(|x| x == "svg"))
            .count()
    }

    #[test]
    fn test_start_frame_only() {
        let dir = tempdir().unwrap();
        run(&args(dir.path())).unwrap();
        assert_eq!(svg_count(dir.path()), 1);
        let svg = std::fs::read_to_string(dir.path().join("000-start.svg")).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("</text>"), "labels are drawn");
    }

    #[test]
    fn test_focus_writes_requested_frames() {
        let dir = tempdir().unwrap();
        let mut args = args(dir.path());
        args.focus = Some("n.1.2".into());
        args.frames = Some(4);
        run(&args).unwrap();
        assert_eq!(svg_count(dir.path()), 1 + 4);
        assert!(dir.path().join("004-focus-3.svg").exists());
    }

    #[test]
    fn test_unknown_focus_fails() {
        let dir = tempdir().unwrap();
        let mut args = args(dir.path());
        args.focus = Some("nope".into());
        assert!(run(&args).is_err());
    }

    #[test]
    fn test_search_renders_each_match() {
        let dir = tempdir().unwrap();
        let mut args = args(dir.path());
        args.search = Some("n.2".into());
        args.scope = MatchScope::Id;
        args.mode = MatchMode::StartsWith;
        args.max_results = 2;
        run(&args).unwrap();
        assert_eq!(svg_count(dir.path()), 1 + 2);
    }

    #[test]
    fn test_graph_file_rendered() {
        let dir = tempdir().unwrap();
        let graph = dir.path().join("graph.json");
        std::fs::write(
            &graph,
            r#"{"nodes": [{"id": "a", "label": "alpha"}, {"id": "b", "label": "beta"}, {"id": "c", "label": "gamma"}],
                "edges": [{"from": 0, "to": 1}, {"from": 0, "to": 2}, {"from": 1, "to": 2, "label": "link"}]}"#,
        )
        .unwrap();
        let mut args = args(dir.path());
        args.graph = Some(graph);
        args.focus = Some("c".into());
        args.frames = Some(2);
        run(&args).unwrap();
        assert_eq!(svg_count(dir.path()), 1 + 2);
        let svg = std::fs::read_to_string(dir.path().join("000-start.svg")).unwrap();
        assert!(svg.contains("</text>"));
    }

    #[test]
    fn test_graph_without_single_root_fails() {
        let dir = tempdir().unwrap();
        let graph = dir.path().join("graph.json");
        std::fs::write(&graph, r#"{"nodes": [{"id": "a"}, {"id": "b"}]}"#).unwrap();
        let mut args = args(dir.path());
        args.graph = Some(graph);
        let err = run(&args).unwrap_err();
        assert!(err.to_string().contains("No single root"));
    }

    #[test]
    fn test_scope_and_mode_parse() {
        let args = Args::parse_from(["treebolic", "--scope", "content", "--mode", "equals"]);
        assert_eq!(args.scope, MatchScope::Content);
        assert_eq!(args.mode, MatchMode::Equals);
    }
}
