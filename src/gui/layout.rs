//! Force simulation driving mind-map node positions
//!
//! The simulation owns the [`MindMap`] store. Everything else reads node
//! coordinates through [`SimulationHandle::graph`] and writes pins through
//! [`SimulationHandle::pin`], never through a copy.
//!
//! The algorithm uses:
//! - Centre gravity: pulls all nodes toward a centre point
//! - Node repulsion: nodes push each other apart (inverse square law)
//! - Connection springs: connected nodes are pulled toward a resting length
//! - Velocity decay: prevents oscillation and helps convergence
//!
//! All forces are scaled by the current energy (`alpha`). Energy moves toward
//! the target energy on every step; once it drops below `alpha_min` the loop
//! stops until [`SimulationHandle::restart`] is called.

use crate::models::{MindMap, NodeId};
use crate::{Error, Result};
use std::f64::consts::PI;
use std::fmt;

/// Callback invoked once per simulation step, after pins are applied.
pub type TickListener = Box<dyn FnMut(&MindMap)>;

/// Capabilities the interaction layer needs from a simulation engine.
pub trait SimulationHandle {
    /// Current node and connection store
    fn graph(&self) -> &MindMap;

    /// Pin a node at `(x, y)`.
    fn pin(&mut self, id: NodeId, x: f64, y: f64) -> Result<()>;

    /// Release a pinned node.
    fn unpin(&mut self, id: NodeId) -> Result<()>;

    /// Set the energy level the simulation settles toward.
    fn set_target_energy(&mut self, value: f64);

    fn target_energy(&self) -> f64;

    /// Resume the integration loop.
    fn restart(&mut self);

    fn is_running(&self) -> bool;

    /// Register a per-step callback.
    fn subscribe_tick(&mut self, listener: TickListener);
}

/// Configuration for the force simulation
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Energy below which the loop stops
    pub alpha_min: f64,
    /// Fraction of the gap to the target energy closed per step
    pub alpha_decay: f64,
    /// Velocity retained per step (0-1, higher = slower decay)
    pub velocity_decay: f64,
    /// Strength of gravity pulling nodes toward the centre
    pub gravity_strength: f64,
    pub gravity_center: (f64, f64),
    /// Repulsion strength between nodes (inverse square law)
    pub repulsion_strength: f64,
    /// Spring strength along connections
    pub spring_strength: f64,
    /// Ideal resting length for springs
    pub spring_length: f64,
    /// Maximum speed per step
    pub max_velocity: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            alpha_min: 0.001,
            // Reaches alpha_min from 1.0 in about 300 steps
            alpha_decay: 1.0 - 0.001_f64.powf(1.0 / 300.0),
            velocity_decay: 0.6,
            gravity_strength: 0.05,
            gravity_center: (0.0, 0.0),
            repulsion_strength: 2500.0,
            spring_strength: 0.08,
            spring_length: 200.0,
            max_velocity: 30.0,
        }
    }
}

/// Force-directed simulation over a [`MindMap`].
pub struct ForceSimulation {
    graph: MindMap,
    config: SimulationConfig,
    alpha: f64,
    alpha_target: f64,
    running: bool,
    listeners: Vec<TickListener>,
}

impl fmt::Debug for ForceSimulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForceSimulation")
            .field("nodes", &self.graph.nodes.len())
            .field("connections", &self.graph.connections.len())
            .field("alpha", &self.alpha)
            .field("alpha_target", &self.alpha_target)
            .field("running", &self.running)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ForceSimulation {
    /// Create a simulation with default configuration
    pub fn new(graph: MindMap) -> Self {
        Self::with_config(graph, SimulationConfig::default())
    }

    /// Create a simulation with custom configuration.
    ///
    /// Nodes without a position are spread on a phyllotaxis spiral so forces
    /// can separate them. Pins then override the starting position.
    pub fn with_config(mut graph: MindMap, config: SimulationConfig) -> Self {
        place_unpositioned(&mut graph);
        for node in &mut graph.nodes {
            if let Some(fx) = node.fx {
                node.x = fx;
            }
            if let Some(fy) = node.fy {
                node.y = fy;
            }
        }

        Self {
            graph,
            config,
            alpha: 1.0,
            alpha_target: 0.0,
            running: true,
            listeners: Vec::new(),
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Current energy level
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Apply gravity toward the configured centre
    fn apply_gravity(&mut self) {
        let (cx, cy) = self.config.gravity_center;
        let strength = self.config.gravity_strength * self.alpha;

        for node in &mut self.graph.nodes {
            let dx = cx - node.x;
            let dy = cy - node.y;
            let distance = (dx * dx + dy * dy).sqrt();

            if distance > 0.0 {
                node.vx += (dx / distance) * strength;
                node.vy += (dy / distance) * strength;
            }
        }
    }

    /// Apply repulsion forces between all node pairs
    ///
    /// Uses inverse square law: force = repulsion_strength / distance²
    fn apply_repulsion(&mut self) {
        let repulsion = self.config.repulsion_strength * self.alpha;
        let n = self.graph.nodes.len();
        let mut forces: Vec<(f64, f64)> = vec![(0.0, 0.0); n];

        for i in 0..n {
            for j in (i + 1)..n {
                let n1 = &self.graph.nodes[i];
                let n2 = &self.graph.nodes[j];

                let dx = n2.x - n1.x;
                let dy = n2.y - n1.y;
                let distance_sq = dx * dx + dy * dy;

                if distance_sq == 0.0 {
                    continue;
                }

                let force = repulsion / distance_sq;
                let distance = distance_sq.sqrt();
                let fx = (dx / distance) * force;
                let fy = (dy / distance) * force;

                forces[i].0 -= fx;
                forces[i].1 -= fy;
                forces[j].0 += fx;
                forces[j].1 += fy;
            }
        }

        for (node, (fx, fy)) in self.graph.nodes.iter_mut().zip(forces) {
            node.vx += fx;
            node.vy += fy;
        }
    }

    /// Apply spring forces along connections
    ///
    /// Uses Hooke's law: force = spring_strength * (distance - resting_length)
    fn apply_springs(&mut self) {
        let strength = self.config.spring_strength * self.alpha;
        let resting_length = self.config.spring_length;
        let mut forces: Vec<(f64, f64)> = vec![(0.0, 0.0); self.graph.nodes.len()];

        for connection in &self.graph.connections {
            let (from, to) = (connection.source.0, connection.target.0);
            let (Some(a), Some(b)) = (self.graph.nodes.get(from), self.graph.nodes.get(to)) else {
                continue;
            };

            let dx = b.x - a.x;
            let dy = b.y - a.y;
            let distance = (dx * dx + dy * dy).sqrt();
            if distance == 0.0 {
                continue;
            }

            let force = strength * (distance - resting_length);
            let fx = (dx / distance) * force;
            let fy = (dy / distance) * force;

            forces[from].0 += fx;
            forces[from].1 += fy;
            forces[to].0 -= fx;
            forces[to].1 -= fy;
        }

        for (node, (fx, fy)) in self.graph.nodes.iter_mut().zip(forces) {
            node.vx += fx;
            node.vy += fy;
        }
    }

    /// Integrate velocities and apply pins.
    fn update_positions(&mut self) {
        let decay = self.config.velocity_decay;
        let max_velocity = self.config.max_velocity;

        for node in &mut self.graph.nodes {
            node.vx *= decay;
            node.vy *= decay;

            let speed = (node.vx * node.vx + node.vy * node.vy).sqrt();
            if speed > max_velocity {
                node.vx = node.vx / speed * max_velocity;
                node.vy = node.vy / speed * max_velocity;
            }

            match node.fx {
                Some(fx) => {
                    node.x = fx;
                    node.vx = 0.0;
                }
                None => node.x += node.vx,
            }
            match node.fy {
                Some(fy) => {
                    node.y = fy;
                    node.vy = 0.0;
                }
                None => node.y += node.vy,
            }
        }
    }

    /// Run one integration step and notify tick listeners.
    ///
    /// Returns the maximum speed of any unpinned node.
    pub fn step(&mut self) -> f64 {
        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;

        self.apply_gravity();
        self.apply_repulsion();
        self.apply_springs();
        self.update_positions();

        let graph = &self.graph;
        for listener in self.listeners.iter_mut() {
            listener(graph);
        }

        if self.alpha < self.config.alpha_min {
            self.running = false;
            tracing::debug!(alpha = self.alpha, "simulation cooled down");
        }

        self.graph
            .nodes
            .iter()
            .filter(|n| !n.is_pinned())
            .map(|n| (n.vx * n.vx + n.vy * n.vy).sqrt())
            .fold(0.0, f64::max)
    }

    /// Step while the loop is running, up to `max_steps`.
    ///
    /// Returns the number of steps run.
    pub fn run(&mut self, max_steps: usize) -> usize {
        let mut steps = 0;
        while self.running && steps < max_steps {
            self.step();
            steps += 1;
        }
        steps
    }
}

impl SimulationHandle for ForceSimulation {
    fn graph(&self) -> &MindMap {
        &self.graph
    }

    fn pin(&mut self, id: NodeId, x: f64, y: f64) -> Result<()> {
        let node = self.graph.node_mut(id).ok_or(Error::NodeNotFound(id))?;
        node.fx = Some(x);
        node.fy = Some(y);
        Ok(())
    }

    fn unpin(&mut self, id: NodeId) -> Result<()> {
        let node = self.graph.node_mut(id).ok_or(Error::NodeNotFound(id))?;
        node.fx = None;
        node.fy = None;
        Ok(())
    }

    fn set_target_energy(&mut self, value: f64) {
        self.alpha_target = value;
    }

    fn target_energy(&self) -> f64 {
        self.alpha_target
    }

    fn restart(&mut self) {
        tracing::debug!(
            alpha = self.alpha,
            target = self.alpha_target,
            "simulation restarted"
        );
        self.running = true;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn subscribe_tick(&mut self, listener: TickListener) {
        self.listeners.push(listener);
    }
}

/// Spread unplaced nodes on a phyllotaxis spiral around the origin.
fn place_unpositioned(graph: &mut MindMap) {
    let angle = PI * (3.0 - 5.0_f64.sqrt());
    for (i, node) in graph.nodes.iter_mut().enumerate() {
        if node.is_placed() {
            continue;
        }
        let radius = 10.0 * (0.5 + i as f64).sqrt();
        let theta = i as f64 * angle;
        if !node.x.is_finite() {
            node.x = radius * theta.cos();
        }
        if !node.y.is_finite() {
            node.y = radius * theta.sin();
        }
    }
}
