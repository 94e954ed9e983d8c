//! Configuration profile command handlers.

use tabled::Tabled;

use veloprov_api::{ConfigurationProfile, OrchestratorClient};
use veloprov_core::{CoreError, Step, resolve_or_create_profile};

use crate::cli::{GlobalOpts, ProfilesArgs, ProfilesCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&ConfigurationProfile> for ProfileRow {
    fn from(p: &ConfigurationProfile) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            description: p
                .extra
                .get("description")
                .and_then(|d| d.as_str())
                .unwrap_or_default()
                .to_owned(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &OrchestratorClient,
    args: ProfilesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let enterprise = client
        .get_enterprise()
        .await
        .map_err(|source| CoreError::ExternalCallFailure {
            step: Step::GetEnterprise,
            source,
        })?;

    match args.command {
        ProfilesCommand::List => {
            let profiles = client
                .list_configuration_profiles(enterprise.id)
                .await
                .map_err(|source| CoreError::ExternalCallFailure {
                    step: Step::ListProfiles,
                    source,
                })?;
            let out = output::render_list(
                &global.output,
                &profiles,
                |p| ProfileRow::from(p),
                |p| p.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProfilesCommand::Ensure { name } => {
            let resolved = resolve_or_create_profile(client, enterprise.id, &name).await?;
            let out = output::render_single(
                &global.output,
                &resolved,
                |r| {
                    output::detail_block(&[
                        ("Profile", name.clone()),
                        ("ID", r.id.to_string()),
                        ("Created", r.created.to_string()),
                    ])
                },
                |r| r.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
