pub mod cli;
pub mod commands;
pub mod config;
pub mod csv_file;
pub mod errors;
pub mod excel;
pub mod export;
pub mod logging;
pub mod models;
pub mod reference;
pub mod services;
pub mod types;

use clap::Parser;
use std::process::ExitCode;
use tracing::error;

use cli::{Cli, Command};
use config::Settings;
use errors::CleanseError;
use reference::SheetsHandle;

fn exit_code(err: &CleanseError) -> ExitCode {
    if err.is_configuration() {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CleanseError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| CleanseError::Output(e.to_string()))?;
    println!("{text}");
    Ok(())
}

fn dispatch(cli: &Cli, settings: &Settings, handle: &SheetsHandle) -> Result<(), CleanseError> {
    match &cli.command {
        Command::Clean(args) => {
            let summary = commands::clean(args, settings, handle)?;
            if args.summary_json {
                print_json(&summary)?;
            } else {
                println!("{summary}");
                for w in &summary.warnings {
                    println!("warning: {w}");
                }
            }
        }
        Command::Inspect(args) => {
            let report = commands::inspect(args)?;
            print_json(&report)?;
        }
    }
    Ok(())
}

/// CLI entry point. Exit code 2 for configuration problems, 1 for anything else that fails.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            logging::init(cli.log_level.as_deref().unwrap_or("info"));
            error!("{e}");
            return exit_code(&e);
        }
    };
    logging::init(cli.log_level.as_deref().unwrap_or(&settings.log_level));

    let handle = SheetsHandle::new(settings.http_timeout);
    match dispatch(&cli, &settings, &handle) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            exit_code(&e)
        }
    }
}
