//! CLI argument definitions for Mindmap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Mindmap - force-directed mind-map rendering.
///
/// Start with `mm inspect <file>` to check a document, then `mm render <file>`.
#[derive(Parser, Debug)]
#[command(name = "mm")]
#[command(author, version, about = "Lay out mind maps with a force simulation and render them to SVG", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Config file layered over the system config and $MINDMAP_CONFIG
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override a single setting, e.g. `--set zoom.max-scale=8` (repeatable)
    #[arg(long = "set", global = true, value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Lay out a mind-map document and render it as SVG
    ///
    /// Writes the SVG to stdout unless --output is given.
    Render {
        /// Mind-map document (JSON with `nodes` and `connections`)
        input: PathBuf,

        /// Write the SVG to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum number of simulation steps
        #[arg(long, default_value_t = 300)]
        ticks: usize,

        /// Zoom the rendered scene (clamped to the configured scale extent)
        #[arg(long)]
        scale: Option<f64>,

        /// Drag a node to a scene position before rendering (repeatable)
        #[arg(long = "drag", value_name = "NODE=X,Y")]
        drags: Vec<String>,
    },

    /// List nodes with their label text and link, plus document counts
    Inspect {
        /// Mind-map document (JSON with `nodes` and `connections`)
        input: PathBuf,
    },

    /// Show the resolved configuration and where each value came from
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render_with_options() {
        let cli = Cli::try_parse_from([
            "mm", "-H", "render", "map.json", "-o", "out.svg", "--ticks", "50", "--scale", "2",
            "--drag", "root=10,20", "--set", "zoom.max-scale=8",
        ])
        .unwrap();
        assert!(cli.human_readable);
        assert_eq!(cli.overrides, vec!["zoom.max-scale=8".to_string()]);
        match cli.command {
            Commands::Render {
                input,
                output,
                ticks,
                scale,
                drags,
            } => {
                assert_eq!(input, PathBuf::from("map.json"));
                assert_eq!(output, Some(PathBuf::from("out.svg")));
                assert_eq!(ticks, 50);
                assert_eq!(scale, Some(2.0));
                assert_eq!(drags, vec!["root=10,20".to_string()]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_render_defaults() {
        let cli = Cli::try_parse_from(["mm", "render", "map.json"]).unwrap();
        match cli.command {
            Commands::Render {
                output,
                ticks,
                scale,
                drags,
                ..
            } => {
                assert!(output.is_none());
                assert_eq!(ticks, 300);
                assert!(scale.is_none());
                assert!(drags.is_empty());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["mm"]).is_err());
    }
}
