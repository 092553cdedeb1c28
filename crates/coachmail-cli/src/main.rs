use std::process::ExitCode;

use clap::Parser;

use coachmail_cli::commands;
use coachmail_cli::Cli;
use coachmail_core::logging::setup_logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match commands::load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("coachmail: {e}");
            return ExitCode::from(2);
        }
    };
    setup_logging(&settings);
    tracing::debug!(command = ?cli.command, "Dispatching command");

    let mut stdout = std::io::stdout();
    match commands::run(&cli, &settings, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("coachmail: {e}");
            ExitCode::FAILURE
        }
    }
}
