mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use tracing::debug;

use cfban_config::Settings;
use cfban_core::{Context, critical};

use crate::cli::Cli;
use crate::error::{CliError, exit_code};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let code = match run(&cli).await {
        Ok(()) => exit_code::SUCCESS,
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            code
        }
    };
    std::process::exit(code);
}

/// Everything up to and including the action. The log guard lives in here,
/// so pending lines are flushed before `main` exits the process.
async fn run(cli: &Cli) -> Result<(), CliError> {
    let settings = cfban_config::load_settings()?;
    let daemon = cfban_config::load_daemon(&settings)?;
    let pid = daemon.pid();

    let pid_label = pid.as_ref().map_or_else(|_| "?".to_owned(), u32::to_string);
    let _guard = logging::init(&daemon.log_target, &pid_label)?;

    if let Err(err) = pid {
        critical!("{err}");
        return Err(err.into());
    }

    let result = execute(cli, &settings).await;
    if let Err(ref err) = result {
        critical!("{err}");
    }
    result
}

async fn execute(cli: &Cli, settings: &Settings) -> Result<(), CliError> {
    let credentials = cfban_config::load_credentials(settings)?;
    let ctx = Context::new(cfban_config::context_config(settings, credentials)?)?;

    debug!(action = ?cli.action, "dispatching action");
    commands::dispatch(cli.action, cli.target.as_deref(), &ctx).await
}
