mod cli;
mod commands;
mod config;
mod discovery;
mod engine;
mod error;
mod manifest;
mod paths;
mod platform;
mod progress;
mod schema;
mod signals;
mod ui;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use commands::Outcome;
use engine::TerminalPrompt;
use error::Interrupted;
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit status after SIGINT/SIGTERM
const EXIT_INTERRUPTED: u8 = 130;

/// Global context for the application
pub struct Context {
    /// Resolved configuration file
    pub config_path: PathBuf,
    /// Print the change report but never prompt or copy
    pub dry_run: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level)
        .format_timestamp(None)
        .init();

    if let Err(e) = signals::install() {
        log::warn!("Could not install signal handlers: {e}");
    }

    match run(cli) {
        Ok(Outcome::Applied { manifests }) => {
            log::debug!("Applied {manifests} manifests");
            ExitCode::SUCCESS
        }
        Ok(outcome) => {
            log::debug!("Finished with {outcome:?}");
            ExitCode::SUCCESS
        }
        Err(err) => report(&err),
    }
}

fn run(cli: Cli) -> Result<Outcome> {
    let ctx = Context {
        config_path: paths::config_file(cli.config.as_deref())?,
        dry_run: cli.dry_run,
    };
    let client = rclone::Client::new();
    let mut gate = TerminalPrompt;

    match cli.command {
        Commands::Upload => commands::upload(&ctx, &client, &mut gate),
        Commands::Download => commands::download(&ctx, &client, &mut gate),
        Commands::Sync => commands::sync(&ctx, &client, &mut gate),
    }
}

/// Print `err` and pick the process exit status.
///
/// A failed rclone run hands back its own stderr and exit code.
fn report(err: &anyhow::Error) -> ExitCode {
    if let Some(rclone::Error::Failed { code, stderr }) = err.downcast_ref::<rclone::Error>() {
        log::debug!("{err:#}");
        eprintln!("{}", stderr.trim_end());
        return ExitCode::from(exit_status(*code));
    }
    if err.downcast_ref::<Interrupted>().is_some() {
        ui::error("Interrupted");
        return ExitCode::from(EXIT_INTERRUPTED);
    }
    ui::error(&format!("{err:#}"));
    ExitCode::FAILURE
}

/// Child exit codes outside `1..=255` collapse to 1.
fn exit_status(code: i32) -> u8 {
    match u8::try_from(code) {
        Ok(0) | Err(_) => 1,
        Ok(status) => status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_status_keeps_child_code() {
        assert_eq!(exit_status(2), 2);
        assert_eq!(exit_status(9), 9);
        assert_eq!(exit_status(255), 255);
    }

    #[test]
    fn exit_status_never_reports_success() {
        assert_eq!(exit_status(0), 1);
        assert_eq!(exit_status(-1), 1);
        assert_eq!(exit_status(300), 1);
    }
}
