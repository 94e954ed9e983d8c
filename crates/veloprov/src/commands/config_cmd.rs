//! Config subcommand handlers.

use std::fmt::Write as _;

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, OrchestratorProfile};
use crate::error::{CliError, prompt_err};
use crate::output;

use super::util;

// ── Helpers ─────────────────────────────────────────────────────────

/// Replace plaintext tokens so the config can be displayed.
fn redact(cfg: &mut Config) {
    for profile in cfg.orchestrators.values_mut() {
        if profile.token.is_some() {
            profile.token = Some("****".into());
        }
    }
}

/// Format an already-redacted config for table output.
fn format_config(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_orchestrator {
        let _ = writeln!(out, "default_orchestrator = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    let mut names: Vec<_> = cfg.orchestrators.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.orchestrators[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[orchestrators.{name}]");
        let _ = writeln!(out, "hostname = \"{}\"", p.hostname);
        if let Some(ref token) = p.token {
            let _ = writeln!(out, "token = \"{token}\"");
        }
        if let Some(ref env) = p.token_env {
            let _ = writeln!(out, "token_env = \"{env}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    let prov = &cfg.provisioning;
    let _ = writeln!(out);
    let _ = writeln!(out, "[provisioning]");
    if let Some(ref name) = prov.enterprise_name {
        let _ = writeln!(out, "enterprise_name = \"{name}\"");
    }
    let _ = writeln!(out, "profile_name = \"{}\"", prov.profile_name);
    let _ = writeln!(out, "edge_name_prefix = \"{}\"", prov.edge_name_prefix);
    if let Some(ref name) = prov.contact_name {
        let _ = writeln!(out, "contact_name = \"{name}\"");
    }
    if let Some(ref email) = prov.contact_email {
        let _ = writeln!(out, "contact_email = \"{email}\"");
    }
    if let Some(ref key_pair) = prov.key_pair_name {
        let _ = writeln!(out, "key_pair_name = \"{key_pair}\"");
    }
    if let Some(ref template) = prov.template {
        let _ = writeln!(out, "template = \"{}\"", template.display());
    }
    let _ = writeln!(out, "output = \"{}\"", prov.output.display());
    let _ = writeln!(out, "lan_interface = \"{}\"", prov.lan_interface);
    let _ = writeln!(out, "wan_interfaces = {:?}", prov.wan_interfaces);
    let _ = writeln!(out, "lan_address = \"{}\"", prov.lan_address);
    let _ = write!(out, "first_wan_role = \"{}\"", prov.first_wan_role);

    out
}

/// Offer to store the token in the system keyring or return it for
/// plaintext config.
///
/// Returns `Some(token)` if the user chose plaintext, `None` if stored in keyring.
fn prompt_token_storage(token: &str, orchestrator: &str) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the API token?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        veloprov_config::store_token(orchestrator, token)?;
        eprintln!("   ✓ API token stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(token.to_owned()))
    }
}

fn prompt_token() -> Result<String, CliError> {
    let token = rpassword::prompt_password("API token: ").map_err(prompt_err)?;
    if token.trim().is_empty() {
        return Err(CliError::Validation {
            field: "token".into(),
            reason: "API token cannot be empty".into(),
        });
    }
    Ok(token.trim().to_owned())
}

fn optional(value: String) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("veloprov configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            // An unreadable file aborts here rather than being replaced.
            let mut cfg = config::load_config()?;
            if config_path.exists()
                && !util::confirm("A config file already exists. Update it?", global.yes)?
            {
                return Ok(());
            }

            // 1. Orchestrator profile
            let name: String = Input::new()
                .with_prompt("Orchestrator profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let hostname: String = Input::new()
                .with_prompt("Orchestrator hostname")
                .interact_text()
                .map_err(prompt_err)?;
            veloprov_config::orchestrator_url(&hostname)?;

            // 2. Token
            let token = prompt_token_storage(&prompt_token()?, &name)?;

            cfg.orchestrators.insert(
                name.clone(),
                OrchestratorProfile {
                    hostname,
                    token,
                    ..OrchestratorProfile::default()
                },
            );
            cfg.default_orchestrator = Some(name.clone());

            // 3. Provisioning defaults
            let prov = &mut cfg.provisioning;
            prov.profile_name = Input::new()
                .with_prompt("Hub configuration profile")
                .default(prov.profile_name.clone())
                .interact_text()
                .map_err(prompt_err)?;
            prov.contact_name = optional(
                Input::new()
                    .with_prompt("Site contact name")
                    .allow_empty(true)
                    .interact_text()
                    .map_err(prompt_err)?,
            );
            prov.contact_email = optional(
                Input::new()
                    .with_prompt("Site contact email")
                    .allow_empty(true)
                    .interact_text()
                    .map_err(prompt_err)?,
            );
            prov.key_pair_name = optional(
                Input::new()
                    .with_prompt("Cloud key pair name")
                    .allow_empty(true)
                    .interact_text()
                    .map_err(prompt_err)?,
            );

            let path = config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", path.display());
            eprintln!("  Active orchestrator: {name}");
            eprintln!("\n  Test it: veloprov profiles list");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let mut cfg = config::load_config()?;
            redact(&mut cfg);
            let out = output::render_single(&global.output, &cfg, format_config, |_| {
                "config".into()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        // ── SetToken ────────────────────────────────────────────────
        ConfigCommand::SetToken { profile } => {
            let cfg = config::load_config()?;
            let name = profile.unwrap_or_else(|| config::active_orchestrator_name(global, &cfg));

            if !cfg.orchestrators.contains_key(&name) {
                return Err(CliError::OrchestratorNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }

            veloprov_config::store_token(&name, &prompt_token()?)?;
            eprintln!("✓ API token stored in system keyring for '{name}'");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_masks_plaintext_tokens() {
        let mut cfg = Config::default();
        cfg.orchestrators.insert(
            "lab".into(),
            OrchestratorProfile {
                hostname: "vco.lab.example.net".into(),
                token: Some("secret-token".into()),
                ..OrchestratorProfile::default()
            },
        );

        redact(&mut cfg);
        let text = format_config(&cfg);

        assert!(!text.contains("secret-token"));
        assert!(text.contains("token = \"****\""));
        assert!(text.contains("[orchestrators.lab]"));
        assert!(text.contains("profile_name = \"AWS HUB Profile\""));
    }

    #[test]
    fn blank_answers_become_none() {
        assert_eq!(optional("  ".into()), None);
        assert_eq!(optional(" ops ".into()), Some("ops".into()));
    }
}
