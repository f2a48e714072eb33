//! Command implementations for Mindmap CLI.
//!
//! This module contains the business logic for each CLI command:
//! - `render` - Bind a document to an SVG scene, run the simulation, write SVG
//! - `inspect` - Summarize a document's nodes and connections
//! - `config_show` - Report the resolved configuration

use crate::config::ResolvedConfig;
use crate::gui::{
    DragBehavior, DragGestures, ForceSimulation, PointerId, Scene, SimulationHandle, SvgScene,
    TickHandler, ZoomBehavior, bind_connections, bind_nodes, theme, view_box,
};
use crate::models::MindMap;
use crate::parser::{get_text, get_url};
use crate::{Error, Result};
use serde::Serialize;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Command results that can be serialized to JSON or formatted for humans.
pub trait CommandResult {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

/// Read and parse a mind-map document.
pub fn load_document(path: &Path) -> Result<MindMap> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        Error::InvalidInput(format!("cannot read {}: {}", path.display(), e))
    })?;
    let graph = MindMap::from_json(&text)?;
    tracing::debug!(
        path = %path.display(),
        nodes = graph.nodes.len(),
        connections = graph.connections.len(),
        "loaded document"
    );
    Ok(graph)
}

// === Render ===

/// A scripted drag: move node `node` to `(x, y)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DragScript {
    pub node: String,
    pub x: f64,
    pub y: f64,
}

impl std::str::FromStr for DragScript {
    type Err = Error;

    /// Parse `NODE=X,Y`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidInput(format!("expected NODE=X,Y, got '{}'", s));
        let (node, coords) = s.rsplit_once('=').ok_or_else(invalid)?;
        let (x, y) = coords.split_once(',').ok_or_else(invalid)?;
        let x: f64 = x.trim().parse().map_err(|_| invalid())?;
        let y: f64 = y.trim().parse().map_err(|_| invalid())?;
        if node.is_empty() || !x.is_finite() || !y.is_finite() {
            return Err(invalid());
        }
        Ok(Self {
            node: node.to_string(),
            x,
            y,
        })
    }
}

/// Options for [`render`].
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub output: Option<PathBuf>,
    pub ticks: usize,
    pub scale: Option<f64>,
    pub drags: Vec<DragScript>,
}

#[derive(Debug, Serialize)]
pub struct RenderResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub nodes: usize,
    pub connections: usize,
    pub ticks: usize,
    pub view_box: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
    #[serde(skip)]
    pub svg: String,
}

impl CommandResult for RenderResult {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        match &self.output {
            Some(path) => lines.push(format!("Rendered {}", path)),
            None => lines.push("Rendered to stdout".to_string()),
        }
        lines.push(format!(
            "  {} nodes, {} connections, {} ticks",
            self.nodes, self.connections, self.ticks
        ));
        lines.push(format!("  viewBox: {}", self.view_box));
        if let Some(transform) = &self.transform {
            lines.push(format!("  transform: {}", transform));
        }
        lines.join("\n")
    }
}

/// Lay out `graph`, replay scripted drags and zoom, and render it as SVG.
///
/// Returns the rendered scene; writing it anywhere is up to the caller.
pub fn render_graph(
    graph: MindMap,
    options: &RenderOptions,
    config: &ResolvedConfig,
) -> Result<RenderResult> {
    graph.validate()?;

    let scene = Rc::new(RefCell::new(SvgScene::with_stylesheet(&theme::stylesheet())));

    // Connections first so nodes paint over them.
    let (connections, node_sets) = {
        let mut scene = scene.borrow_mut();
        let connections = bind_connections(&mut *scene, &graph);
        let node_sets = bind_nodes(&mut *scene, &graph);
        (connections, node_sets)
    };

    let node_count = graph.nodes.len();
    let connection_count = graph.connections.len();

    let mut sim = ForceSimulation::with_config(graph, config.simulation());
    sim.subscribe_tick(
        TickHandler::new(
            Rc::clone(&scene),
            connections,
            node_sets.nodes.clone(),
            node_sets.subnodes,
        )
        .into_listener(),
    );

    let mut ticks = sim.run(options.ticks);

    if !options.drags.is_empty() {
        let behavior =
            DragBehavior::with_config(Rc::clone(&scene), node_sets.nodes.clone(), config.drag());
        let mut gestures = DragGestures::new(behavior);
        for (i, script) in options.drags.iter().enumerate() {
            let subject = sim
                .graph()
                .find(&script.node)
                .ok_or_else(|| Error::UnknownNode(script.node.clone()))?;
            let pointer = PointerId(i as u32);
            gestures.pointer_down(&mut sim, pointer, subject)?;
            gestures.pointer_move(&mut sim, pointer, script.x, script.y)?;
            ticks += sim.run(options.ticks);
            gestures.pointer_up(&mut sim, pointer)?;
        }
    }

    if ticks == 0 {
        // Nothing has positioned the elements yet.
        sim.step();
        ticks = 1;
    }

    let vb = view_box(
        sim.graph().nodes.iter().map(|node| node.position()),
        config.margin(),
    );
    scene
        .borrow_mut()
        .set_root_attribute("viewBox", vb.to_string());

    let transform = match options.scale {
        Some(k) => {
            let (min, max) = config.scale_extent();
            let mut zoom = ZoomBehavior::with_scale_extent(min, max);
            let mut scene = scene.borrow_mut();
            Some(zoom.scale_to([&mut *scene], k, (0.0, 0.0)).to_string())
        }
        None => None,
    };

    let svg = scene.borrow().to_svg_string();
    tracing::info!(nodes = node_count, ticks, view_box = %vb, "rendered scene");

    Ok(RenderResult {
        output: options.output.as_ref().map(|p| p.display().to_string()),
        nodes: node_count,
        connections: connection_count,
        ticks,
        view_box: vb.to_string(),
        transform,
        svg,
    })
}

/// Render the document at `input`, writing the SVG to `options.output` when set.
pub fn render(input: &Path, options: &RenderOptions, config: &ResolvedConfig) -> Result<RenderResult> {
    let graph = load_document(input)?;
    let result = render_graph(graph, options, config)?;
    if let Some(path) = &options.output {
        std::fs::write(path, &result.svg)?;
    }
    Ok(result)
}

// === Inspect ===

#[derive(Debug, Serialize)]
pub struct NodeSummary {
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    pub pinned: bool,
    pub subnodes: bool,
}

#[derive(Debug, Serialize)]
pub struct InspectResult {
    pub node_count: usize,
    pub connection_count: usize,
    pub curved_count: usize,
    pub nodes: Vec<NodeSummary>,
}

impl CommandResult for InspectResult {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "{} nodes, {} connections ({} curved)",
            self.node_count, self.connection_count, self.curved_count
        )];
        for node in &self.nodes {
            let mut line = format!("  {}: {}", node.id, node.text);
            if !node.url.is_empty() {
                line.push_str(&format!(" <{}>", node.url));
            }
            if node.pinned {
                line.push_str(" [pinned]");
            }
            if node.subnodes {
                line.push_str(" [+subnodes]");
            }
            lines.push(line);
        }
        lines.join("\n")
    }
}

/// Summarize a mind map.
pub fn inspect_graph(graph: &MindMap) -> InspectResult {
    let nodes = graph
        .nodes
        .iter()
        .map(|node| NodeSummary {
            id: node.id.clone(),
            text: get_text(&node.html),
            url: get_url(&node.html),
            pinned: node.is_pinned(),
            subnodes: !node.nodes_html.is_empty(),
        })
        .collect();

    InspectResult {
        node_count: graph.nodes.len(),
        connection_count: graph.connections.len(),
        curved_count: graph.connections.iter().filter(|c| c.curve.is_some()).count(),
        nodes,
    }
}

/// Load and summarize the document at `input`.
pub fn inspect(input: &Path) -> Result<InspectResult> {
    let graph = load_document(input)?;
    Ok(inspect_graph(&graph))
}

// === Config ===

#[derive(Debug, Serialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: f64,
    pub source: String,
}

#[derive(Debug, Serialize)]
pub struct ConfigShowResult {
    pub settings: Vec<ConfigEntry>,
}

impl CommandResult for ConfigShowResult {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        let width = self
            .settings
            .iter()
            .map(|entry| entry.key.len())
            .max()
            .unwrap_or(0);
        self.settings
            .iter()
            .map(|entry| {
                format!(
                    "{:width$} = {}  ({})",
                    entry.key,
                    entry.value,
                    entry.source,
                    width = width
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Report every setting with its value source.
pub fn config_show(config: &ResolvedConfig) -> ConfigShowResult {
    let settings = config
        .entries()
        .iter()
        .map(|(key, resolved)| ConfigEntry {
            key: key.to_string(),
            value: resolved.value,
            source: resolved.source.to_string(),
        })
        .collect();
    ConfigShowResult { settings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::resolve_layers;
    use crate::models::{Connection, Node};

    fn defaults() -> ResolvedConfig {
        resolve_layers(&[]).unwrap()
    }

    fn chain() -> MindMap {
        let mut graph = MindMap::new();
        let a = graph.add_node(
            Node::new("a")
                .at(-100.0, 0.0)
                .with_label(r#"<p><a href="https://a.example">Alpha</a></p>"#, 60.0, 20.0),
        );
        let b = graph.add_node(Node::new("b").at(100.0, 0.0).with_label("<p>Beta</p>", 40.0, 20.0));
        graph
            .connect(Connection::new(a, b).with_curve(10.0, -10.0))
            .unwrap();
        graph
    }

    #[test]
    fn test_drag_script_parse() {
        let script: DragScript = "root=10,-2.5".parse().unwrap();
        assert_eq!(
            script,
            DragScript {
                node: "root".to_string(),
                x: 10.0,
                y: -2.5
            }
        );
        assert!("root".parse::<DragScript>().is_err());
        assert!("root=1".parse::<DragScript>().is_err());
        assert!("=1,2".parse::<DragScript>().is_err());
        assert!("root=a,2".parse::<DragScript>().is_err());
    }

    #[test]
    fn test_render_graph_produces_bound_svg() {
        let options = RenderOptions {
            ticks: 20,
            ..RenderOptions::default()
        };
        let result = render_graph(chain(), &options, &defaults()).unwrap();
        assert_eq!(result.nodes, 2);
        assert_eq!(result.connections, 1);
        assert_eq!(result.ticks, 20);
        assert!(result.svg.contains("class=\"mindmap-connection\""));
        assert!(result.svg.contains("class=\"mindmap-node\""));
        assert!(result.svg.contains("class=\"mindmap-subnodes\""));
        assert!(result.svg.contains(" Q "));
        assert!(result.svg.contains(&format!("viewBox=\"{}\"", result.view_box)));
        assert!(result.transform.is_none());
    }

    #[test]
    fn test_render_graph_zero_ticks_still_positions() {
        let result = render_graph(chain(), &RenderOptions::default(), &defaults()).unwrap();
        assert_eq!(result.ticks, 1);
        assert!(result.svg.contains(" d=\"M "));
    }

    #[test]
    fn test_render_graph_zero_ticks_with_drag_still_positions() {
        let options = RenderOptions {
            ticks: 0,
            drags: vec![DragScript {
                node: "b".to_string(),
                x: 5.0,
                y: 5.0,
            }],
            ..RenderOptions::default()
        };
        let result = render_graph(chain(), &options, &defaults()).unwrap();
        assert_eq!(result.ticks, 1);
        assert!(result.svg.contains(" d=\"M "));
        // b is 40x20, dropped and pinned at (5, 5).
        assert!(result.svg.contains(r#"x="-15" y="-5""#));
    }

    #[test]
    fn test_render_graph_scale_is_clamped() {
        let options = RenderOptions {
            ticks: 1,
            scale: Some(50.0),
            ..RenderOptions::default()
        };
        let result = render_graph(chain(), &options, &defaults()).unwrap();
        assert_eq!(result.transform.as_deref(), Some("translate(0,0) scale(5)"));
        assert!(result.svg.contains("transform=\"translate(0,0) scale(5)\""));
    }

    #[test]
    fn test_render_graph_drag_pins_node() {
        let options = RenderOptions {
            ticks: 5,
            drags: vec![DragScript {
                node: "b".to_string(),
                x: 500.0,
                y: 250.0,
            }],
            ..RenderOptions::default()
        };
        let result = render_graph(chain(), &options, &defaults()).unwrap();
        // The dropped node stays pinned, so it bounds the viewbox.
        let parts: Vec<f64> = result
            .view_box
            .split(' ')
            .map(|p| p.parse().unwrap())
            .collect();
        assert!((parts[0] + parts[2] - 700.0).abs() < 1e-6);
        assert!((parts[1] + parts[3] - 350.0).abs() < 1e-6);
    }

    #[test]
    fn test_render_graph_unknown_drag_node() {
        let options = RenderOptions {
            ticks: 1,
            drags: vec![DragScript {
                node: "zzz".to_string(),
                x: 0.0,
                y: 0.0,
            }],
            ..RenderOptions::default()
        };
        let err = render_graph(chain(), &options, &defaults()).unwrap_err();
        assert!(matches!(err, Error::UnknownNode(id) if id == "zzz"));
    }

    #[test]
    fn test_inspect_graph() {
        let result = inspect_graph(&chain());
        assert_eq!(result.node_count, 2);
        assert_eq!(result.connection_count, 1);
        assert_eq!(result.curved_count, 1);
        assert_eq!(result.nodes[0].text, "Alpha");
        assert_eq!(result.nodes[0].url, "https://a.example");
        assert_eq!(result.nodes[1].text, "Beta");
        assert!(result.nodes[1].url.is_empty());

        let human = result.to_human();
        assert!(human.contains("a: Alpha <https://a.example>"));
        let json: serde_json::Value = serde_json::from_str(&result.to_json()).unwrap();
        assert_eq!(json["node_count"], 2);
        assert!(json["nodes"][1].get("url").is_none());
    }

    #[test]
    fn test_config_show_lists_every_key() {
        let result = config_show(&defaults());
        assert_eq!(result.settings.len(), crate::config::schema::KEYS.len());
        assert!(result.settings.iter().all(|e| e.source == "default"));
        assert!(result.to_human().contains("zoom.min-scale"));
    }
}
