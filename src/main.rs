//! Mindmap CLI - force-directed mind-map rendering.

use clap::Parser;
use mindmap::cli::{Cli, Commands};
use mindmap::commands::{self, CommandResult, DragScript, RenderOptions};
use mindmap::config::{MindmapConfig, ResolvedConfig, resolve_config};
use std::io::Write;
use std::process;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `mindmap=debug`).
const LOG_ENV: &str = "MINDMAP_LOG";

fn main() {
    let cli = Cli::parse();
    let human = cli.human_readable;

    init_logging();

    let result = run(cli);

    if let Err(e) = result {
        if human {
            eprintln!("Error: {}", e);
        } else {
            eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
        }
        process::exit(1);
    }
}

/// Install the stderr subscriber. Logging stays at `warn` unless MINDMAP_LOG says otherwise.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_config(cli: &Cli) -> Result<ResolvedConfig, mindmap::Error> {
    let mut overrides = MindmapConfig::new();
    for assignment in &cli.overrides {
        overrides.set_assignment(assignment)?;
    }
    resolve_config(cli.config.as_deref(), &overrides)
}

fn run(cli: Cli) -> Result<(), mindmap::Error> {
    let human = cli.human_readable;
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Render {
            input,
            output: out,
            ticks,
            scale,
            drags,
        } => {
            let drags = drags
                .iter()
                .map(|s| s.parse::<DragScript>())
                .collect::<Result<Vec<_>, _>>()?;
            let options = RenderOptions {
                output: out,
                ticks,
                scale,
                drags,
            };
            let result = commands::render(&input, &options, &config)?;
            if options.output.is_some() {
                output(&result, human);
            } else {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(result.svg.as_bytes())?;
                stdout.write_all(b"\n")?;
            }
        }
        Commands::Inspect { input } => {
            let result = commands::inspect(&input)?;
            output(&result, human);
        }
        Commands::Config => {
            let result = commands::config_show(&config);
            output(&result, human);
        }
    }

    Ok(())
}

fn output<T: CommandResult>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
