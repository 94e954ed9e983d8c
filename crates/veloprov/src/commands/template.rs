//! Stack template command handlers.

use std::path::Path;

use veloprov_core::TemplateParameters;

use crate::cli::{GlobalOpts, TemplateArgs, TemplateCommand};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

pub fn handle(args: TemplateArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        TemplateCommand::Render {
            template,
            activation_key,
            edge_name,
            key_pair,
            out,
        } => {
            let cfg = config::load_config()?;
            let section = &cfg.provisioning;

            let mut stack = util::load_template(template.as_deref().or(section.template.as_deref()))?;
            stack.populate(&TemplateParameters {
                activation_key,
                key_pair_name: key_pair.or_else(|| section.key_pair_name.clone()),
                orchestrator_host: config::resolve_host_only(global, &cfg)?,
                edge_name,
            })?;

            let path = out.unwrap_or_else(|| section.output.clone());
            if path == Path::new("-") {
                output::print_output(&stack.to_json_pretty()?, false);
            } else {
                stack.write_to(&path)?;
                if !global.quiet {
                    eprintln!("✓ Stack template written to {}", path.display());
                }
            }
            Ok(())
        }

        TemplateCommand::Bundled => {
            output::print_output(util::BUNDLED_TEMPLATE.trim_end(), global.quiet);
            Ok(())
        }
    }
}
