//! Theme constants for rendered mind maps
//!
//! Defines the class names attached by the binder and the colour scheme of
//! the stylesheet embedded in rendered SVG.

/// Class names attached to bound elements
pub mod class {
    /// Connection paths
    pub const CONNECTION: &str = "mindmap-connection";
    /// Primary node boxes
    pub const NODE: &str = "mindmap-node";
    /// Subnodes boxes
    pub const SUBNODES: &str = "mindmap-subnodes";
}

/// Background colors
pub mod background {
    /// Canvas background
    pub const CANVAS: &str = "#ffffff";
    /// Node box background
    pub const NODE: &str = "#f5f7fa";
}

/// Text colors
pub mod text {
    pub const PRIMARY: &str = "#1a2332";
    /// Links inside node labels
    pub const LINK: &str = "#4a90e2";
}

/// Connection colors
pub mod edge {
    pub const STROKE: &str = "#7a8fa3";
    pub const WIDTH: f64 = 2.0;
}

/// Node border color
pub const NODE_BORDER: &str = "#3a4d66";

/// Stylesheet embedded in rendered SVG.
pub fn stylesheet() -> String {
    format!(
        "svg {{ background: {canvas}; }}\n\
         .{conn} {{ fill: none; stroke: {stroke}; stroke-width: {width}; }}\n\
         .{node} {{ background: {node_bg}; border: 1px solid {border}; color: {text}; }}\n\
         .{node} a, .{subnodes} a {{ color: {link}; }}\n\
         .{subnodes} {{ color: {text}; }}\n",
        canvas = background::CANVAS,
        conn = class::CONNECTION,
        node = class::NODE,
        subnodes = class::SUBNODES,
        stroke = edge::STROKE,
        width = edge::WIDTH,
        node_bg = background::NODE,
        border = NODE_BORDER,
        text = text::PRIMARY,
        link = text::LINK,
    )
}
