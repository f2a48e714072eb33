//! Node dragging against the live simulation.
//!
//! [`DragBehavior`] implements the start/drag/end handlers. [`DragGestures`]
//! is the event source: it tracks one gesture per pointer and hands every
//! handler the number of *other* gestures that are active, so concurrent
//! drags keep the simulation warm until the last one ends.
//!
//! Pointer coordinates are scene coordinates. Hosts that receive screen
//! coordinates convert them with [`ViewTransform::invert`] first.
//!
//! [`ViewTransform::invert`]: super::zoom::ViewTransform::invert

use super::binder::Selection;
use super::geometry::{ViewBoxMargin, view_box};
use super::layout::SimulationHandle;
use super::scene::Scene;
use crate::models::NodeId;
use crate::{Error, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Identifier of a pointer (mouse, touch point, pen).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerId(pub u32);

/// Context passed to each drag handler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragEvent {
    /// The node being dragged
    pub subject: NodeId,
    /// Pointer position in scene coordinates
    pub x: f64,
    pub y: f64,
    /// Number of other gestures active on the same source
    pub active: usize,
}

/// Energy levels and viewbox padding used by drag handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct DragConfig {
    /// Target energy while at least one drag is active
    pub warm_energy: f64,
    /// Target energy once the last drag ends
    pub rest_energy: f64,
    pub margin: ViewBoxMargin,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            warm_energy: 0.2,
            rest_energy: 0.0,
            margin: ViewBoxMargin::default(),
        }
    }
}

/// Start, drag and end handlers for node gestures.
#[derive(Debug)]
pub struct DragBehavior<S> {
    scene: Rc<RefCell<S>>,
    nodes: Selection<NodeId>,
    config: DragConfig,
}

impl<S: Scene> DragBehavior<S> {
    /// Create handlers for the bound `nodes` of `scene`.
    pub fn new(scene: Rc<RefCell<S>>, nodes: Selection<NodeId>) -> Self {
        Self::with_config(scene, nodes, DragConfig::default())
    }

    pub fn with_config(scene: Rc<RefCell<S>>, nodes: Selection<NodeId>, config: DragConfig) -> Self {
        Self {
            scene,
            nodes,
            config,
        }
    }

    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    /// Pin the subject where it currently is, warming the simulation if no
    /// other drag is active.
    pub fn start<H>(&self, sim: &mut H, event: &DragEvent) -> Result<()>
    where
        H: SimulationHandle + ?Sized,
    {
        let node = sim
            .graph()
            .node(event.subject)
            .ok_or(Error::NodeNotFound(event.subject))?;
        let (x, y) = (node.x, node.y);

        if event.active == 0 {
            sim.set_target_energy(self.config.warm_energy);
            sim.restart();
        }

        tracing::debug!(subject = %event.subject, x, y, active = event.active, "drag start");
        sim.pin(event.subject, x, y)
    }

    /// Re-pin the subject at the pointer.
    pub fn drag<H>(&self, sim: &mut H, event: &DragEvent) -> Result<()>
    where
        H: SimulationHandle + ?Sized,
    {
        sim.pin(event.subject, event.x, event.y)
    }

    /// Relax the simulation if this was the last drag, then refit the viewbox.
    ///
    /// The subject stays pinned where it was dropped.
    pub fn end<H>(&self, sim: &mut H, event: &DragEvent) -> Result<()>
    where
        H: SimulationHandle + ?Sized,
    {
        if event.active == 0 {
            sim.set_target_energy(self.config.rest_energy);
        }

        let graph = sim.graph();
        let vb = view_box(
            self.nodes
                .data()
                .filter_map(|id| graph.node(id))
                .map(|node| node.position()),
            self.config.margin,
        );

        tracing::debug!(subject = %event.subject, active = event.active, view_box = %vb, "drag end");
        self.scene
            .borrow_mut()
            .set_root_attribute("viewBox", vb.to_string());
        Ok(())
    }
}

/// Per-gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging,
}

#[derive(Debug, Clone, Copy)]
struct Gesture {
    subject: NodeId,
    x: f64,
    y: f64,
}

/// Pointer event source feeding a [`DragBehavior`].
#[derive(Debug)]
pub struct DragGestures<S> {
    behavior: DragBehavior<S>,
    gestures: HashMap<PointerId, Gesture>,
}

impl<S: Scene> DragGestures<S> {
    pub fn new(behavior: DragBehavior<S>) -> Self {
        Self {
            behavior,
            gestures: HashMap::new(),
        }
    }

    pub fn behavior(&self) -> &DragBehavior<S> {
        &self.behavior
    }

    /// Number of gestures currently dragging
    pub fn active(&self) -> usize {
        self.gestures.len()
    }

    pub fn phase(&self, pointer: PointerId) -> DragPhase {
        if self.gestures.contains_key(&pointer) {
            DragPhase::Dragging
        } else {
            DragPhase::Idle
        }
    }

    /// Pointer pressed over the element bound to `subject`.
    ///
    /// A pointer that is already dragging is ignored.
    pub fn pointer_down<H>(&mut self, sim: &mut H, pointer: PointerId, subject: NodeId) -> Result<()>
    where
        H: SimulationHandle + ?Sized,
    {
        if self.gestures.contains_key(&pointer) {
            return Ok(());
        }

        let node = sim
            .graph()
            .node(subject)
            .ok_or(Error::NodeNotFound(subject))?;
        let gesture = Gesture {
            subject,
            x: node.x,
            y: node.y,
        };

        let event = DragEvent {
            subject,
            x: gesture.x,
            y: gesture.y,
            active: self.gestures.len(),
        };
        self.behavior.start(sim, &event)?;
        self.gestures.insert(pointer, gesture);
        Ok(())
    }

    /// Pointer moved to `(x, y)`. Ignored unless the pointer is dragging.
    pub fn pointer_move<H>(&mut self, sim: &mut H, pointer: PointerId, x: f64, y: f64) -> Result<()>
    where
        H: SimulationHandle + ?Sized,
    {
        let others = self.gestures.len().saturating_sub(1);
        let Some(gesture) = self.gestures.get_mut(&pointer) else {
            return Ok(());
        };
        gesture.x = x;
        gesture.y = y;

        let event = DragEvent {
            subject: gesture.subject,
            x,
            y,
            active: others,
        };
        self.behavior.drag(sim, &event)
    }

    /// Pointer released. Ignored unless the pointer is dragging.
    pub fn pointer_up<H>(&mut self, sim: &mut H, pointer: PointerId) -> Result<()>
    where
        H: SimulationHandle + ?Sized,
    {
        let Some(gesture) = self.gestures.remove(&pointer) else {
            return Ok(());
        };

        let event = DragEvent {
            subject: gesture.subject,
            x: gesture.x,
            y: gesture.y,
            active: self.gestures.len(),
        };
        self.behavior.end(sim, &event)
    }

    /// Gesture cancelled (e.g. the pointer left the surface); handled as a release.
    pub fn pointer_cancel<H>(&mut self, sim: &mut H, pointer: PointerId) -> Result<()>
    where
        H: SimulationHandle + ?Sized,
    {
        tracing::debug!(?pointer, "drag cancelled");
        self.pointer_up(sim, pointer)
    }
}
