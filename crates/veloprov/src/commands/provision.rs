//! Provision command handler.

use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use veloprov_api::OrchestratorClient;
use veloprov_core::{OrchestratorConfig, Provisioner, ProvisioningReport, TemplateParameters};

use crate::cli::{GlobalOpts, ProvisionArgs};
use crate::config::Config;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct ProvisionOutput {
    #[serde(flatten)]
    report: ProvisioningReport,
    template: Option<PathBuf>,
}

fn detail(out: &ProvisionOutput, color: bool) -> String {
    let r = &out.report;
    let profile = if r.profile_created {
        format!("{} (created)", r.profile_id)
    } else {
        r.profile_id.to_string()
    };
    output::detail_block(&[
        ("Enterprise", r.enterprise_id.to_string()),
        ("Profile", profile),
        ("Edge", format!("{} ({})", r.edge_name, r.edge_id)),
        ("Activation key", output::highlight(&r.activation_key, color)),
        ("Device settings", r.module_id.to_string()),
        (
            "Stack template",
            out.template
                .as_ref()
                .map_or_else(|| "-".into(), |p| p.display().to_string()),
        ),
    ])
}

pub async fn handle(
    client: &OrchestratorClient,
    args: ProvisionArgs,
    config: &Config,
    orchestrator: &OrchestratorConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let section = &config.provisioning;

    let mut prov = section.to_provisioning_config()?;
    if let Some(name) = args.profile_name {
        prov.profile_name = name;
    }
    if let Some(prefix) = args.edge_prefix {
        prov.edge_name_prefix = prefix;
    }
    if let Some(name) = args.enterprise {
        prov.enterprise_name = Some(name);
    }
    if let Some(role) = args.first_wan_role {
        prov.layout.first_wan_role = role.into();
    }
    prov.edge_name = args.edge_name;

    let report = Provisioner::new(client).run(&prov).await?;

    let template = if args.no_template {
        None
    } else {
        let mut stack = util::load_template(args.template.as_deref().or(section.template.as_deref()))?;
        stack.populate(&TemplateParameters {
            activation_key: report.activation_key.clone(),
            key_pair_name: args.key_pair.or_else(|| section.key_pair_name.clone()),
            orchestrator_host: orchestrator.hostname().to_owned(),
            edge_name: report.edge_name.clone(),
        })?;
        let path = args.out.unwrap_or_else(|| section.output.clone());
        stack.write_to(&path)?;
        info!(path = %path.display(), "stack template written");
        Some(path)
    };

    let result = ProvisionOutput { report, template };
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &result,
        |o| detail(o, color),
        |o| o.report.activation_key.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
