use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::json;
use tokio::sync::mpsc;

use webdm_routes::config::{load_config, read_config, validate_config, RouterConfig};
use webdm_routes::lifecycle::{build_table, Shutdown};
use webdm_routes::navigation::{NavigationEvent, Navigator};
use webdm_routes::observability::logging;
use webdm_routes::sections;

#[derive(Parser)]
#[command(name = "routes-cli")]
#[command(about = "Inspect and exercise the webdm route table offline", long_about = None)]
struct Cli {
    /// TOML configuration file; the built-in table is used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit tracing output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every route in match order
    List,
    /// Show what a location resolves to
    Resolve { path: String },
    /// Validate the configuration and controller bindings
    Check,
    /// Replay a navigation session; use "back" for a history step back
    Navigate {
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match (&cli.config, &cli.command) {
        (Some(path), Commands::Check) => read_config(path)?,
        (Some(path), _) => load_config(path)?,
        (None, _) => RouterConfig::default(),
    };
    if cli.verbose {
        logging::init_logging(&config.observability);
    }

    if let Commands::Check = cli.command {
        if let Err(errors) = validate_config(&config) {
            for error in &errors {
                eprintln!("error: {}", error);
            }
            return Err(format!("{} validation error(s)", errors.len()).into());
        }
    }

    let controllers = sections::section_controllers();
    let table = Arc::new(build_table(&config, &sections::registry(&controllers))?);

    match cli.command {
        Commands::List => {
            println!("{}", serde_json::to_string_pretty(&table.describe())?);
        }
        Commands::Resolve { path } => match table.resolve(&path) {
            Some(resolution) => println!("{}", serde_json::to_string_pretty(&resolution)?),
            None => eprintln!("No route matches {}", path),
        },
        Commands::Check => {
            println!(
                "ok: {} groups, {} routes",
                table.groups().len(),
                table.route_count()
            );
        }
        Commands::Navigate { paths } => {
            let (first, rest) = paths.split_first().ok_or("no paths given")?;
            let (tx, rx) = mpsc::unbounded_channel();
            for path in rest {
                let event = if path == "back" {
                    NavigationEvent::Back
                } else {
                    NavigationEvent::Navigate(path.clone())
                };
                tx.send(event)?;
            }
            drop(tx);

            let shutdown = Shutdown::new();
            let navigator = Navigator::new(table)
                .with_fallback(|path| eprintln!("No route matches {}", path));
            let navigator = navigator.start(first, rx, shutdown.subscribe()).await?;

            let report: Vec<_> = controllers
                .iter()
                .map(|c| (c.name(), c.take_invocations()))
                .filter(|(_, calls)| !calls.is_empty())
                .map(|(name, calls)| json!({ "controller": name, "invocations": calls }))
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "history": navigator.history(),
                    "dispatched": report,
                }))?
            );
        }
    }

    Ok(())
}
