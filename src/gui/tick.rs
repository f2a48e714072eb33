//! Per-step geometry updates for bound elements.
//!
//! Node coordinates are the geometric centre of the label box, while
//! `foreignObject` elements are anchored at their top-left corner, so every
//! step converts centre coordinates to corner coordinates.

use super::binder::Selection;
use super::layout::TickListener;
use super::scene::Scene;
use crate::models::{Connection, ConnectionId, MindMap, NodeId};
use std::cell::RefCell;
use std::rc::Rc;

/// Quadratic path descriptor for a connection.
///
/// Starts at the source, bows through `source + curve`, ends at the target.
/// Returns `None` when either endpoint is missing from `graph`.
pub fn connection_path(graph: &MindMap, connection: &Connection) -> Option<String> {
    let (source, target) = graph.endpoints(connection)?;
    let curve = connection.control_offset();
    Some(format!(
        "M {} {} Q {} {} , {} {}",
        source.x,
        source.y,
        source.x + curve.x,
        source.y + curve.y,
        target.x,
        target.y
    ))
}

/// Recompute path and position attributes from current node coordinates.
///
/// Only attribute writes happen here; repeated calls with unchanged
/// coordinates write identical values. Elements bound to records missing
/// from `graph` are left untouched.
pub fn on_tick<S: Scene>(
    scene: &mut S,
    graph: &MindMap,
    connections: &Selection<ConnectionId>,
    nodes: &Selection<NodeId>,
    subnodes: &Selection<NodeId>,
) {
    connections.attr_with(scene, "d", |id| {
        let path = graph
            .connection(id)
            .and_then(|conn| connection_path(graph, conn));
        if path.is_none() {
            report_dangling(id.to_string());
        }
        path
    });

    let node = |id: NodeId| {
        let node = graph.node(id);
        if node.is_none() {
            report_dangling(id.to_string());
        }
        node
    };

    nodes
        .attr_with(scene, "x", |id| node(id).map(|n| (n.x - n.width / 2.0).to_string()))
        .attr_with(scene, "y", |id| {
            node(id).map(|n| (n.y - n.height / 2.0).to_string())
        });

    subnodes
        .attr_with(scene, "x", |id| node(id).map(|n| (n.x + n.width / 2.0).to_string()))
        .attr_with(scene, "y", |id| {
            node(id).map(|n| (n.y - n.nodes_height / 2.0).to_string())
        });

    tracing::trace!(
        connections = connections.len(),
        nodes = nodes.len(),
        "tick applied"
    );
}

fn report_dangling(record: String) {
    debug_assert!(false, "bound element references missing {}", record);
    tracing::warn!(%record, "skipping element bound to a missing record");
}

/// The three bound element sets plus the scene they live in.
///
/// Registered with a simulation through [`TickHandler::into_listener`].
#[derive(Debug)]
pub struct TickHandler<S> {
    scene: Rc<RefCell<S>>,
    connections: Selection<ConnectionId>,
    nodes: Selection<NodeId>,
    subnodes: Selection<NodeId>,
}

impl<S: Scene> TickHandler<S> {
    pub fn new(
        scene: Rc<RefCell<S>>,
        connections: Selection<ConnectionId>,
        nodes: Selection<NodeId>,
        subnodes: Selection<NodeId>,
    ) -> Self {
        Self {
            scene,
            connections,
            nodes,
            subnodes,
        }
    }

    /// Apply one tick against `graph`.
    pub fn apply(&self, graph: &MindMap) {
        let mut scene = self.scene.borrow_mut();
        on_tick(
            &mut *scene,
            graph,
            &self.connections,
            &self.nodes,
            &self.subnodes,
        );
    }
}

impl<S: Scene + 'static> TickHandler<S> {
    /// Convert into a callback for [`SimulationHandle::subscribe_tick`].
    ///
    /// [`SimulationHandle::subscribe_tick`]: super::layout::SimulationHandle::subscribe_tick
    pub fn into_listener(self) -> TickListener {
        Box::new(move |graph: &MindMap| self.apply(graph))
    }
}
