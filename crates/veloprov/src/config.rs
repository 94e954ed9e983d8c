//! CLI configuration, a thin wrapper around `veloprov_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--orchestrator, --host, --token, --insecure, --timeout).

use std::time::Duration;

use secrecy::SecretString;

use veloprov_core::{OrchestratorConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use veloprov_config::{
    Config, Defaults, OrchestratorProfile, config_path, load_config, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active orchestrator profile name from flags and config.
pub fn active_orchestrator_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .orchestrator
        .clone()
        .or_else(|| config.default_orchestrator.clone())
        .unwrap_or_else(|| "default".into())
}

/// Available profile names, for error help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.orchestrators.keys().cloned().collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort();
    names.join(", ")
}

/// Build an `OrchestratorConfig` from config file, profile, and flags.
///
/// Flags take priority over the profile. Without a profile, `--host` and
/// `--token` (or their env vars) must supply everything.
pub fn resolve_orchestrator(
    global: &GlobalOpts,
    config: &Config,
) -> Result<OrchestratorConfig, CliError> {
    let name = active_orchestrator_name(global, config);

    let Some(profile) = config.orchestrators.get(&name) else {
        // An explicitly named profile must exist.
        if global.orchestrator.is_some() {
            return Err(CliError::OrchestratorNotFound {
                name,
                available: available_profiles(config),
            });
        }
        return resolve_from_flags(global, &config.defaults, &name);
    };

    // 1. Hostname (flag/env > profile)
    let host = global
        .host
        .clone()
        .unwrap_or_else(|| veloprov_config::resolve_hostname(profile));
    let url = veloprov_config::orchestrator_url(&host)?;

    // 2. Token (flag/env > token_env > keyring > plaintext)
    let token = match global.token {
        Some(ref token) => SecretString::from(token.clone()),
        None => veloprov_config::resolve_token(profile, &name)?,
    };

    // 3. TLS
    let tls = if global.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        veloprov_config::tls_for(profile, &config.defaults)
    };

    // 4. Timeout (flag > profile > defaults)
    let timeout = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(config.defaults.timeout);

    Ok(OrchestratorConfig {
        url,
        token,
        tls,
        timeout: Duration::from_secs(timeout),
    })
}

fn resolve_from_flags(
    global: &GlobalOpts,
    defaults: &Defaults,
    name: &str,
) -> Result<OrchestratorConfig, CliError> {
    let host = global.host.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;
    let url = veloprov_config::orchestrator_url(host)?;

    let token = global
        .token
        .clone()
        .map(SecretString::from)
        .ok_or_else(|| CliError::NoCredentials {
            orchestrator: name.into(),
        })?;

    let tls = if global.insecure || defaults.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(OrchestratorConfig {
        url,
        token,
        tls,
        timeout: Duration::from_secs(global.timeout.unwrap_or(defaults.timeout)),
    })
}

/// Orchestrator hostname for template rendering; no token required.
pub fn resolve_host_only(global: &GlobalOpts, config: &Config) -> Result<String, CliError> {
    let host = match global.host {
        Some(ref host) => host.clone(),
        None => {
            let name = active_orchestrator_name(global, config);
            let profile = config.orchestrators.get(&name).ok_or_else(|| CliError::NoConfig {
                path: config_path().display().to_string(),
            })?;
            veloprov_config::resolve_hostname(profile)
        }
    };
    let url = veloprov_config::orchestrator_url(&host)?;
    Ok(url.host_str().unwrap_or_default().to_owned())
}
