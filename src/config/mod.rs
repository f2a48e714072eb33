//! Configuration for Mindmap.
//!
//! ## config.kdl - Layout and interaction tuning
//!
//! Located at:
//! - System: `~/.config/mindmap/config.kdl`
//! - Extra file: `$MINDMAP_CONFIG` or `--config <file>`
//!
//! Contains one block per concern:
//! - `simulation` - Force strengths, cooling rate and speed limit
//! - `drag` - Target energies while dragging and after release
//! - `zoom` - Scale extent for pan/zoom
//! - `viewbox` - Padding around the fitted viewbox
//!
//! ## Precedence
//!
//! CLI flag > `--config` file > `$MINDMAP_CONFIG` file > system config > defaults
//!
//! Use the [`resolver`] module for unified precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{
    MINDMAP_CONFIG_ENV, Resolved, ResolvedConfig, ValueSource, resolve_config, resolve_layers,
    system_config_path,
};
pub use schema::MindmapConfig;
