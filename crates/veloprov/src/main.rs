mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Offline commands
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),
        Command::Transform(args) => commands::transform::handle(args, &cli.global),
        Command::Template(args) => commands::template::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "veloprov", &mut std::io::stdout());
            Ok(())
        }

        // Everything else talks to the orchestrator
        cmd => {
            let cfg = config::load_config()?;
            let orchestrator_config = config::resolve_orchestrator(&cli.global, &cfg)?;
            let client = veloprov_core::connect(&orchestrator_config)?;

            tracing::debug!(command = ?cmd, host = orchestrator_config.hostname(), "dispatching command");
            commands::dispatch(cmd, &client, &cfg, &orchestrator_config, &cli.global).await
        }
    }
}
