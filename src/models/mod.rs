//! Data models for mind-map diagrams.
//!
//! This module defines the records the renderer binds to:
//! - `Node` - A labeled box positioned by the force simulation
//! - `Connection` - An edge between two nodes, optionally bowed by a curve
//! - `MindMap` - The owned node and connection store
//!
//! Connections never hold copies of nodes. They reference entries of the
//! node store by [`NodeId`], so every reader sees the live simulation
//! coordinates.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Index of a node inside a [`MindMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Index of a connection inside a [`MindMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub usize);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "connection#{}", self.0)
    }
}

/// A mind-map node.
///
/// `x`/`y` is the geometric centre of the primary label box. It is owned by
/// the simulation between ticks. `fx`/`fy` pin the node: while set, the
/// simulation snaps `x`/`y` to them instead of integrating forces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier used by connection records
    pub id: String,

    /// Simulated x coordinate; NaN until placed
    #[serde(default = "unplaced", skip_serializing_if = "is_unplaced")]
    pub x: f64,

    #[serde(default = "unplaced", skip_serializing_if = "is_unplaced")]
    pub y: f64,

    /// Pinned x coordinate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fx: Option<f64>,

    /// Pinned y coordinate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fy: Option<f64>,

    /// Width of the primary label box
    #[serde(default)]
    pub width: f64,

    /// Height of the primary label box
    #[serde(default)]
    pub height: f64,

    /// Pre-rendered label content
    #[serde(default)]
    pub html: String,

    /// Width of the subnodes box rendered to the right of the node
    #[serde(default)]
    pub nodes_width: f64,

    /// Height of the subnodes box
    #[serde(default)]
    pub nodes_height: f64,

    /// Pre-rendered subnodes content
    #[serde(default, rename = "nodesHTML")]
    pub nodes_html: String,

    /// Simulation velocity, never persisted
    #[serde(skip)]
    pub vx: f64,

    #[serde(skip)]
    pub vy: f64,
}

impl Node {
    /// Create an unplaced node with an empty label.
    ///
    /// The simulation assigns a starting position unless [`Node::at`] is used.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            x: f64::NAN,
            y: f64::NAN,
            fx: None,
            fy: None,
            width: 0.0,
            height: 0.0,
            html: String::new(),
            nodes_width: 0.0,
            nodes_height: 0.0,
            nodes_html: String::new(),
            vx: 0.0,
            vy: 0.0,
        }
    }

    /// Set the simulated position
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Set the primary label box
    pub fn with_label(mut self, html: impl Into<String>, width: f64, height: f64) -> Self {
        self.html = html.into();
        self.width = width;
        self.height = height;
        self
    }

    /// Set the subnodes box
    pub fn with_subnodes(mut self, html: impl Into<String>, width: f64, height: f64) -> Self {
        self.nodes_html = html.into();
        self.nodes_width = width;
        self.nodes_height = height;
        self
    }

    /// Whether both coordinates have been assigned.
    pub fn is_placed(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Whether either coordinate is pinned.
    pub fn is_pinned(&self) -> bool {
        self.fx.is_some() || self.fy.is_some()
    }

    /// Effective position: the pin where set, the simulated coordinate otherwise.
    pub fn position(&self) -> (f64, f64) {
        (self.fx.unwrap_or(self.x), self.fy.unwrap_or(self.y))
    }
}

fn unplaced() -> f64 {
    f64::NAN
}

fn is_unplaced(value: &f64) -> bool {
    !value.is_finite()
}

/// Control-point offset, relative to the connection source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

impl Curve {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A resolved connection between two nodes of the same store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub source: NodeId,
    pub target: NodeId,
    pub curve: Option<Curve>,
}

impl Connection {
    /// Create a straight connection
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self {
            source,
            target,
            curve: None,
        }
    }

    /// Bow the connection by a control-point offset
    pub fn with_curve(mut self, x: f64, y: f64) -> Self {
        self.curve = Some(Curve::new(x, y));
        self
    }

    /// The control-point offset; an absent curve is `(0, 0)`.
    pub fn control_offset(&self) -> Curve {
        self.curve.unwrap_or_default()
    }
}

/// A connection as it appears in a document, referencing nodes by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve: Option<Curve>,
}

impl ConnectionRecord {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            curve: None,
        }
    }
}

/// On-disk mind-map document.
///
/// # Examples
///
/// ```json
/// {
///   "nodes": [{"id": "root", "html": "<p>Root</p>", "width": 60, "height": 20}],
///   "connections": [{"source": "root", "target": "child", "curve": {"x": 10, "y": -5}}]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub connections: Vec<ConnectionRecord>,
}

/// The owned node and connection store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MindMap {
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
}

impl MindMap {
    /// Create an empty mind map
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its id
    pub fn add_node(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Add a connection between two existing nodes.
    pub fn connect(&mut self, connection: Connection) -> Result<ConnectionId> {
        for id in [connection.source, connection.target] {
            if self.node(id).is_none() {
                return Err(Error::NodeNotFound(id));
            }
        }
        self.connections.push(connection);
        Ok(ConnectionId(self.connections.len() - 1))
    }

    /// Build a store from document records, resolving string ids.
    pub fn from_records(nodes: Vec<Node>, records: Vec<ConnectionRecord>) -> Result<Self> {
        let mut index: HashMap<&str, NodeId> = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if index.insert(node.id.as_str(), NodeId(i)).is_some() {
                return Err(Error::DuplicateNode(node.id.clone()));
            }
        }

        let resolve = |id: &str| {
            index
                .get(id)
                .copied()
                .ok_or_else(|| Error::UnknownNode(id.to_string()))
        };

        let mut connections = Vec::with_capacity(records.len());
        for record in &records {
            connections.push(Connection {
                source: resolve(&record.source)?,
                target: resolve(&record.target)?,
                curve: record.curve,
            });
        }

        Ok(Self { nodes, connections })
    }

    /// Parse a JSON [`Document`] into a store.
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: Document = serde_json::from_str(json)?;
        Self::from_records(doc.nodes, doc.connections)
    }

    /// Convert back to a document, with current positions.
    ///
    /// Connections whose endpoints are missing from the store are dropped.
    pub fn to_document(&self) -> Document {
        Document {
            nodes: self.nodes.clone(),
            connections: self
                .connections
                .iter()
                .filter_map(|c| {
                    let (source, target) = self.endpoints(c)?;
                    Some(ConnectionRecord {
                        source: source.id.clone(),
                        target: target.id.clone(),
                        curve: c.curve,
                    })
                })
                .collect(),
        }
    }

    /// Check that every connection endpoint is a member of the node store.
    pub fn validate(&self) -> Result<()> {
        for connection in &self.connections {
            for id in [connection.source, connection.target] {
                if self.node(id).is_none() {
                    return Err(Error::NodeNotFound(id));
                }
            }
        }
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(id.0)
    }

    /// Look up a node by its string id
    pub fn find(&self, id: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.id == id).map(NodeId)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn connection_ids(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        (0..self.connections.len()).map(ConnectionId)
    }

    /// Both endpoints of a connection, if they exist.
    pub fn endpoints(&self, connection: &Connection) -> Option<(&Node, &Node)> {
        Some((self.node(connection.source)?, self.node(connection.target)?))
    }
}
