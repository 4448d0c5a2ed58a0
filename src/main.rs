//! toposcope: terminal cloud network topology explorer.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use toposcope::cli::{run_scan, run_view, ScanOutput, ViewOptions};
use toposcope::config;
use toposcope::projection::ResourceFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "toposcope")]
#[command(version)]
#[command(about = "Terminal cloud network topology explorer", long_about = None)]
#[command(after_help = "EXAMPLES:
    # Explore the topology served by a local scan backend
    toposcope view

    # Explore a saved snapshot offline
    toposcope view --input inventory.json

    # Start in the instance table
    toposcope view --filter instance

    # Save a snapshot for later
    toposcope scan -O inventory.json")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Scan endpoint URL (overrides config file)
    #[arg(long, global = true, env = "TOPOSCOPE_ENDPOINT")]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments for the `view` subcommand
#[derive(Parser)]
struct ViewArgs {
    /// Load a local inventory JSON snapshot instead of scanning
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Resource filter to start in
    #[arg(short, long, value_enum, default_value_t = ResourceFilter::All)]
    filter: ResourceFilter,

    /// Start with an empty inventory, without an initial scan
    #[arg(long)]
    offline: bool,
}

/// Arguments for the `scan` subcommand
#[derive(Parser)]
struct ScanArgs {
    /// Read a local snapshot instead of hitting the endpoint
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ScanOutput::Json)]
    output: ScanOutput,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Exit with code 1 if any region reported a scan error
    #[arg(long)]
    fail_on_region_error: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Explore the topology interactively
    View(ViewArgs),

    /// Fetch one inventory snapshot and print it
    Scan(ScanArgs),

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .toposcope.yaml in the current directory
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let (mut config, loaded_from) = config::load_or_default(cli.config.as_deref());
    if let Some(path) = &loaded_from {
        tracing::debug!("Loaded config from {}", path.display());
    }
    if let Some(endpoint) = cli.endpoint.clone() {
        config.endpoint = endpoint;
    }
    config
        .validate()
        .context("invalid effective configuration")?;

    match cli.command {
        Commands::View(args) => {
            run_view(
                config,
                ViewOptions {
                    input: args.input,
                    filter: args.filter,
                    offline: args.offline,
                },
            )?;
            Ok(())
        }

        Commands::Scan(args) => {
            let failed_regions = run_scan(
                &config,
                args.input.as_ref(),
                args.output,
                args.output_file.as_ref(),
            )?;
            if failed_regions > 0 {
                tracing::warn!("{failed_regions} regions reported scan errors");
                if args.fail_on_region_error {
                    std::process::exit(1);
                }
            }
            Ok(())
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                if let Some(path) = &loaded_from {
                    eprintln!("# Loaded from: {}", path.display());
                } else {
                    eprintln!("# No config file found; showing defaults");
                }
                let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
                print!("{yaml}");
                Ok(())
            }
            ConfigAction::Path => {
                let search_paths: [Option<String>; 3] = [
                    std::env::current_dir()
                        .ok()
                        .map(|p| p.display().to_string()),
                    dirs::config_dir().map(|p| p.join("toposcope").display().to_string()),
                    dirs::home_dir().map(|p| p.display().to_string()),
                ];
                eprintln!("Config file search paths (in order):");
                for path in search_paths.into_iter().flatten() {
                    eprintln!("  {path}");
                }
                eprintln!();
                match config::discover_config_file(cli.config.as_deref()) {
                    Some(path) => eprintln!("Active config file: {}", path.display()),
                    None => eprintln!("No config file found."),
                }
                Ok(())
            }
            ConfigAction::Init => {
                let target = std::env::current_dir()
                    .context("cannot determine current directory")?
                    .join(".toposcope.yaml");
                if target.exists() {
                    anyhow::bail!(
                        "{} already exists. Remove it first to re-initialize.",
                        target.display()
                    );
                }
                std::fs::write(&target, config::generate_example_config())
                    .with_context(|| format!("failed to write {}", target.display()))?;
                eprintln!("Created {}", target.display());
                Ok(())
            }
        },
    }
}
