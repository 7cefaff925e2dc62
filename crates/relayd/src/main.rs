// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! relayd - the relay decision engine daemon.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use relay_config::RelayConfig;

mod serve;
mod stores;

/// relayd - authenticated chat events in, canonical decisions out.
#[derive(Parser, Debug)]
#[command(name = "relayd", version, about, long_about = None)]
struct Cli {
    /// Path to an explicit relay.toml (otherwise the XDG hierarchy is used).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the relay daemon.
    Serve,
    /// Load and validate the configuration, then exit.
    CheckConfig,
}

fn load_config(path: Option<&PathBuf>) -> Result<RelayConfig, ExitCode> {
    let result = match path {
        Some(path) => relay_config::load_and_validate_path(path),
        None => relay_config::load_and_validate(),
    };
    result.map_err(|errors| {
        relay_config::render_errors(&errors);
        ExitCode::FAILURE
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(code) => return code,
    };

    match cli.command {
        Some(Commands::Serve) | None => match serve::run_serve(config).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("relayd: {err}");
                ExitCode::FAILURE
            }
        },
        Some(Commands::CheckConfig) => {
            println!(
                "relayd: config ok ({} bot seed(s), {} mapping seed(s))",
                config.bots.len(),
                config.mappings.len()
            );
            ExitCode::SUCCESS
        }
    }
}
