// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Solara - voice-driven appliance intake and solar system sizing.
//!
//! This is the binary entry point. It loads configuration, installs logging
//! and signal handling, opens local storage and dispatches to a subcommand.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod app;
mod appliances;
mod intake;
mod recommend;
mod shutdown;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use solara_config::SolaraConfig;
use solara_core::SolaraError;

use crate::app::App;
use crate::appliances::ManualEntry;
use crate::intake::IntakeOptions;

/// Solara - describe your appliances, get a solar system sized for them.
#[derive(Parser, Debug)]
#[command(name = "solara", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Keep everything in memory; nothing is read from or written to disk.
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Describe an appliance to the voice assistant.
    Intake(IntakeOptions),
    /// Add an appliance by hand.
    Add(ManualEntry),
    /// List the stored appliances.
    List {
        /// Print the list as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Remove one appliance by id.
    Remove { id: String },
    /// Remove every appliance.
    Clear,
    /// Price a solar system for the stored appliances.
    Recommend,
    /// Show the last recommendation as an order summary.
    Receipt {
        /// Delivery address to print on the receipt. Saved for later runs.
        #[arg(long)]
        address: Option<String>,
    },
    /// Send one message to the conversational assistant.
    Chat { message: String },
    /// Validate the configuration and print the effective values.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.plain || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let loaded = match &cli.config {
        Some(path) => solara_config::load_and_validate_path(path),
        None => solara_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            solara_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.app.log_level);

    let Some(command) = cli.command else {
        println!("solara: use --help for available commands");
        return;
    };

    if let Commands::Config = command {
        print_config(&config);
        return;
    }

    let cancel = shutdown::install_signal_handler();
    let app = match App::open(config, cli.ephemeral, cancel).await {
        Ok(app) => app,
        Err(e) => exit_with(&e),
    };

    let result = dispatch(&app, command).await;
    app.close().await;

    match result {
        Ok(()) => {}
        Err(SolaraError::Cancelled) => eprintln!("{}", "stopped".yellow()),
        Err(e) => exit_with(&e),
    }
}

async fn dispatch(app: &App, command: Commands) -> Result<(), SolaraError> {
    match command {
        Commands::Intake(options) => intake::run_intake(app, options).await,
        Commands::Add(entry) => appliances::run_add(app, entry).await,
        Commands::List { json } => appliances::run_list(app, json).await,
        Commands::Remove { id } => appliances::run_remove(app, &id).await,
        Commands::Clear => appliances::run_clear(app).await,
        Commands::Recommend => recommend::run_recommend(app).await,
        Commands::Receipt { address } => recommend::run_receipt(app, address).await,
        Commands::Chat { message } => recommend::run_chat(app, &message).await,
        Commands::Config => {
            print_config(&app.config);
            Ok(())
        }
    }
}

fn print_config(config: &SolaraConfig) {
    match toml::to_string_pretty(config) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("{} failed to render configuration: {e}", "error:".red()),
    }
}

/// Prints the error and exits. In-progress dialogue state is not kept, so
/// the user starts over by running the command again.
fn exit_with(error: &SolaraError) -> ! {
    eprintln!("{} {error}", "error:".red().bold());
    eprintln!("Please run the command again.");
    std::process::exit(1);
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("solara={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_manual_entry() {
        let cli = Cli::try_parse_from([
            "solara", "--ephemeral", "add", "--name", "freezer", "--quantity", "2",
            "--day-hours", "12", "--night-hours", "12", "--wattage", "150",
        ])
        .unwrap();
        assert!(cli.ephemeral);
        match cli.command {
            Some(Commands::Add(entry)) => {
                assert_eq!(entry.name, "freezer");
                assert_eq!(entry.quantity, 2);
                assert_eq!(entry.wattage, 150.0);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = solara_config::load_and_validate_str("").expect("default config should be valid");
        assert_eq!(config.app.name, "solara");
        assert!(toml::to_string_pretty(&config).is_ok());
    }
}
