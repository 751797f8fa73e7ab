//! imageroller: cloud server image rotation
//!
//! Entry point for the imageroller application.

use imageroller::config::{Cli, Command, ValidatedConfig, write_default_configs};
use std::process::ExitCode;

mod app;
mod run;

use app::{exit_code, print_config_hint, setup_tracing};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // Handle init subcommand
    if let Some(Command::Init { output_dir }) = &cli.command {
        return handle_init(output_dir);
    }

    // Logging comes first so resolution can report skipped servers
    setup_tracing(cli.verbose);

    // Load and validate configuration
    let config = match ValidatedConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            print_config_hint(&e);
            return exit_code::CONFIG_ERROR;
        }
    };

    tracing::info!("{config}");
    run::execute(&config);

    exit_code::SUCCESS
}

/// Handles the `init` subcommand.
fn handle_init(output_dir: &std::path::Path) -> ExitCode {
    match write_default_configs(output_dir) {
        Ok(paths) => {
            for path in paths {
                println!("Template written to: {}", path.display());
            }
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::CONFIG_ERROR
        }
    }
}
