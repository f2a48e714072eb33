//! Scene binding and interaction for mind-map diagrams
//!
//! This module turns a [`MindMap`](crate::models::MindMap) into a live scene:
//!
//! - `scene`: Scene graph traits and the in-memory SVG implementation
//! - `binder`: Creates one element (or element pair) per record
//! - `tick`: Recomputes element geometry on every simulation step
//! - `layout`: Force simulation that owns node coordinates
//! - `drag`: Node drag gestures that pin nodes and reheat the simulation
//! - `zoom`: Clamped pan/zoom transform applied to whole scenes
//! - `geometry`: Viewbox fitting
//! - `theme`: Class names and stylesheet
//!
//! ```text
//!   ForceSimulation ──step──▶ TickHandler ──attrs──▶ SvgScene
//!         ▲                                            ▲
//!         │ pin / energy                               │ viewBox / transform
//!   DragGestures ─────────────────────────────  ZoomBehavior
//! ```

pub mod binder;
pub mod drag;
pub mod geometry;
pub mod layout;
pub mod scene;
pub mod theme;
pub mod tick;
pub mod zoom;

pub use binder::{Bound, NodeSelections, Selection, bind_connections, bind_data, bind_nodes};
pub use drag::{DragBehavior, DragConfig, DragEvent, DragGestures, DragPhase, PointerId};
pub use geometry::{ViewBox, ViewBoxMargin, view_box};
pub use layout::{ForceSimulation, SimulationConfig, SimulationHandle, TickListener};
pub use scene::{ElementId, RenderedElement, Scene, SvgElement, SvgScene};
pub use tick::{TickHandler, connection_path, on_tick};
pub use zoom::{DEFAULT_SCALE_EXTENT, ViewTransform, ZoomBehavior, apply_transform};
