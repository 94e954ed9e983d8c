//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod config_cmd;
pub mod profiles;
pub mod provision;
pub mod template;
pub mod transform;
pub mod util;

use veloprov_api::OrchestratorClient;
use veloprov_core::OrchestratorConfig;

use crate::cli::{Command, GlobalOpts};
use crate::config::Config;
use crate::error::CliError;

/// Dispatch an orchestrator-bound command to its handler.
pub async fn dispatch(
    cmd: Command,
    client: &OrchestratorClient,
    config: &Config,
    orchestrator: &OrchestratorConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Provision(args) => {
            provision::handle(client, args, config, orchestrator, global).await
        }
        Command::Profiles(args) => profiles::handle(client, args, global).await,
        // Offline commands are handled before dispatch
        Command::Config(_)
        | Command::Transform(_)
        | Command::Template(_)
        | Command::Completions(_) => Err(CliError::Validation {
            field: "command".into(),
            reason: "command does not use an orchestrator connection".into(),
        }),
    }
}
