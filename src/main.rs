//! ifacepicker - pick a network interface for shell scripts
//!
//! Main entry point: parses arguments, loads configuration, initializes
//! logging and runs one selection round on the terminal.
//!
//! Copyright (c) 2026 The ifacepicker Developers
//! Licensed under the MIT License (https://opensource.org/licenses/MIT)

use anyhow::Result;
use clap::Parser;
use ifacepicker::{cli::Cli, config::AppConfig, core::Application, error::PickerError, logging};
use std::{io, process::ExitCode};
use tracing::{debug, info};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            let code = e.downcast_ref::<PickerError>().map_or(1, PickerError::exit_code);
            ExitCode::from(code)
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    if let Err(e) = cli.validate() {
        e.exit();
    }

    let config = AppConfig::load(cli.config.as_deref())?.with_verbosity(cli.verbose);

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    // Held until run() returns so a file appender can flush
    let _log_guard = logging::init_logging_with_config(&config.logging)?;
    info!("Starting ifacepicker");

    let app = Application::new(&config, &cli);
    let stdin = io::stdin();
    let stdout = io::stdout();

    match app.run(&mut stdin.lock(), &mut stdout.lock()) {
        Ok(_) => {
            info!("Selection completed");
            Ok(())
        }
        Err(e) => {
            debug!(kind = %e.kind(), exit_code = e.exit_code(), "Selection failed");
            Err(e.into())
        }
    }
}
