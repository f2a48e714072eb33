//! Mindmap - force-directed mind-map rendering.
//!
//! This library binds mind-map nodes and connections to an SVG-like scene,
//! keeps that scene in step with a force simulation, and handles node dragging
//! and canvas pan/zoom against the live simulation state. It also provides the
//! core functionality for the `mm` CLI tool.

pub mod cli;
pub mod commands;
pub mod config;
pub mod gui;
pub mod models;
pub mod parser;

use models::NodeId;

/// Library-level error type for Mindmap operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Unknown node referenced by connection: {0}")]
    UnknownNode(String),

    #[error("Duplicate node id: {0}")]
    DuplicateNode(String),

    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Mindmap operations.
pub type Result<T> = std::result::Result<T, Error>;
