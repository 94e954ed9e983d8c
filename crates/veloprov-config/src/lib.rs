//! Configuration for the veloprov CLI.
//!
//! TOML orchestrator profiles, token resolution (env + keyring +
//! plaintext), and translation to `veloprov_core` records. The CLI adds
//! flag-aware wrappers on top.

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use veloprov_core::{ContactInfo, FirstWanRole, InterfaceLayout, ProvisioningConfig, TlsVerification};

/// Keyring service name tokens are stored under.
pub const KEYRING_SERVICE: &str = "veloprov";
/// Token override honoured ahead of every profile setting.
pub const TOKEN_ENV: &str = "VCO_TOKEN";
/// Hostname override honoured ahead of the profile's hostname.
pub const HOSTNAME_ENV: &str = "VCO_HOSTNAME";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no orchestrator profile named '{name}'")]
    UnknownOrchestrator { name: String },

    #[error("no API token configured for orchestrator '{orchestrator}'")]
    NoCredentials { orchestrator: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Orchestrator profile used when `--orchestrator` is not given.
    pub default_orchestrator: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named orchestrator profiles.
    #[serde(default)]
    pub orchestrators: HashMap<String, OrchestratorProfile>,

    #[serde(default)]
    pub provisioning: ProvisioningSection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_orchestrator: Some("default".into()),
            defaults: Defaults::default(),
            orchestrators: HashMap::new(),
            provisioning: ProvisioningSection::default(),
        }
    }
}

impl Config {
    /// Pick an orchestrator profile by name, falling back to
    /// `default_orchestrator`.
    pub fn orchestrator<'a>(
        &'a self,
        name: Option<&'a str>,
    ) -> Result<(&'a str, &'a OrchestratorProfile), ConfigError> {
        let name = name
            .or(self.default_orchestrator.as_deref())
            .unwrap_or("default");
        self.orchestrators
            .get(name)
            .map(|profile| (name, profile))
            .ok_or_else(|| ConfigError::UnknownOrchestrator { name: name.into() })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named orchestrator profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OrchestratorProfile {
    /// Orchestrator hostname or URL (e.g., "vco.example.net").
    pub hostname: String,

    /// API token (plaintext, prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the API token.
    pub token_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,
}

/// The `[provisioning]` table.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProvisioningSection {
    /// Must match the token's enterprise when set.
    pub enterprise_name: Option<String>,
    #[serde(default = "default_profile_name")]
    pub profile_name: String,
    #[serde(default = "default_edge_name_prefix")]
    pub edge_name_prefix: String,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    /// Key pair written into the stack template.
    pub key_pair_name: Option<String>,
    /// Stack template to populate; the bundled one when unset.
    pub template: Option<PathBuf>,
    #[serde(default = "default_template_output")]
    pub output: PathBuf,
    #[serde(default = "default_lan_interface")]
    pub lan_interface: String,
    #[serde(default = "default_wan_interfaces")]
    pub wan_interfaces: Vec<String>,
    #[serde(default = "default_lan_address")]
    pub lan_address: Ipv4Addr,
    #[serde(default)]
    pub first_wan_role: FirstWanRole,
}

impl Default for ProvisioningSection {
    fn default() -> Self {
        Self {
            enterprise_name: None,
            profile_name: default_profile_name(),
            edge_name_prefix: default_edge_name_prefix(),
            contact_name: None,
            contact_email: None,
            key_pair_name: None,
            template: None,
            output: default_template_output(),
            lan_interface: default_lan_interface(),
            wan_interfaces: default_wan_interfaces(),
            lan_address: default_lan_address(),
            first_wan_role: FirstWanRole::default(),
        }
    }
}

fn default_profile_name() -> String {
    ProvisioningConfig::default().profile_name
}
fn default_edge_name_prefix() -> String {
    ProvisioningConfig::default().edge_name_prefix
}
fn default_template_output() -> PathBuf {
    PathBuf::from("new-velo-cf.json")
}
fn default_lan_interface() -> String {
    InterfaceLayout::default().lan_interface
}
fn default_wan_interfaces() -> Vec<String> {
    InterfaceLayout::default().wan_interfaces.to_vec()
}
fn default_lan_address() -> Ipv4Addr {
    InterfaceLayout::default().lan_address
}

impl ProvisioningSection {
    /// Interface layout described by this section.
    pub fn layout(&self) -> Result<InterfaceLayout, ConfigError> {
        let wan_interfaces: [String; 2] =
            self.wan_interfaces
                .clone()
                .try_into()
                .map_err(|names: Vec<String>| ConfigError::Validation {
                    field: "provisioning.wan_interfaces".into(),
                    reason: format!("expected exactly 2 interfaces, got {}", names.len()),
                })?;

        let layout = InterfaceLayout {
            lan_interface: self.lan_interface.clone(),
            wan_interfaces,
            lan_address: self.lan_address,
            first_wan_role: self.first_wan_role,
        };
        layout.validate().map_err(|e| ConfigError::Validation {
            field: "provisioning".into(),
            reason: e.to_string(),
        })?;
        Ok(layout)
    }

    /// Translate into the record the provisioning driver runs with.
    pub fn to_provisioning_config(&self) -> Result<ProvisioningConfig, ConfigError> {
        Ok(ProvisioningConfig {
            enterprise_name: self.enterprise_name.clone(),
            profile_name: self.profile_name.clone(),
            edge_name_prefix: self.edge_name_prefix.clone(),
            edge_name: None,
            contact: ContactInfo {
                name: self.contact_name.clone(),
                email: self.contact_email.clone(),
            },
            layout: self.layout()?,
        })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("net", "veloprov", "veloprov").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("veloprov");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path`, layered over defaults and under `VELOPROV_`
/// environment variables (`VELOPROV_PROVISIONING__PROFILE_NAME=...`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("VELOPROV_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Token resolution (without CLI flags) ────────────────────────────

fn keyring_entry(orchestrator: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{orchestrator}/token"))
}

/// Resolve an API token from the credential chain (no CLI flag step).
pub fn resolve_token(
    profile: &OrchestratorProfile,
    orchestrator: &str,
) -> Result<SecretString, ConfigError> {
    // 1. Global override
    if let Ok(val) = std::env::var(TOKEN_ENV) {
        return Ok(SecretString::from(val));
    }

    // 2. Profile's token_env → env var lookup
    if let Some(ref env_name) = profile.token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 3. System keyring
    if let Ok(entry) = keyring_entry(orchestrator) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 4. Plaintext in config
    if let Some(ref token) = profile.token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        orchestrator: orchestrator.into(),
    })
}

/// Store a token in the system keyring for `orchestrator`.
pub fn store_token(orchestrator: &str, token: &str) -> Result<(), ConfigError> {
    keyring_entry(orchestrator)?.set_password(token)?;
    Ok(())
}

/// Resolve the orchestrator hostname: `VCO_HOSTNAME`, then the profile.
pub fn resolve_hostname(profile: &OrchestratorProfile) -> String {
    std::env::var(HOSTNAME_ENV).unwrap_or_else(|_| profile.hostname.clone())
}

/// Turn a bare hostname or a full URL into the orchestrator root URL.
pub fn orchestrator_url(host: &str) -> Result<Url, ConfigError> {
    let host = host.trim();
    if host.is_empty() {
        return Err(ConfigError::Validation {
            field: "hostname".into(),
            reason: "orchestrator hostname is empty".into(),
        });
    }
    let candidate = if host.contains("://") {
        host.to_owned()
    } else {
        format!("https://{host}")
    };
    let url: Url = candidate.parse().map_err(|_| ConfigError::Validation {
        field: "hostname".into(),
        reason: format!("invalid URL: {host}"),
    })?;
    if url.host_str().is_none() {
        return Err(ConfigError::Validation {
            field: "hostname".into(),
            reason: format!("no host in {host}"),
        });
    }
    Ok(url)
}

/// TLS mode for a profile; `insecure` wins over a custom CA.
pub fn tls_for(profile: &OrchestratorProfile, defaults: &Defaults) -> TlsVerification {
    if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    const SAMPLE: &str = r#"
default_orchestrator = "lab"

[defaults]
timeout = 45

[orchestrators.lab]
hostname = "vco.lab.example.net"
token = "plain-token"
insecure = true

[orchestrators.prod]
hostname = "https://vco.example.net"
ca_cert = "/etc/veloprov/ca.pem"

[provisioning]
profile_name = "Hub West"
contact_email = "netops@example.net"
wan_interfaces = ["GE1", "GE2"]
first_wan_role = "underlay"
"#;

    fn load(text: &str) -> Config {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, text).unwrap();
        load_config_from(&path).unwrap()
    }

    #[test]
    fn loads_profiles_and_sections() {
        let cfg = load(SAMPLE);

        assert_eq!(cfg.defaults.timeout, 45);
        assert_eq!(cfg.defaults.output, "table");
        let (name, lab) = cfg.orchestrator(None).unwrap();
        assert_eq!(name, "lab");
        assert_eq!(lab.hostname, "vco.lab.example.net");
        assert_eq!(cfg.provisioning.profile_name, "Hub West");
        assert_eq!(cfg.provisioning.edge_name_prefix, "AWS-VCE-");
        assert_eq!(cfg.provisioning.first_wan_role, FirstWanRole::Underlay);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_orchestrator.as_deref(), Some("default"));
        assert_eq!(cfg.provisioning.profile_name, "AWS HUB Profile");
        assert_eq!(cfg.provisioning.output, PathBuf::from("new-velo-cf.json"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "default_orchestrator = [\n").unwrap();

        assert!(matches!(
            load_config_from(&path),
            Err(ConfigError::Figment(_))
        ));
    }

    #[test]
    fn unknown_orchestrator_is_an_error() {
        let cfg = load(SAMPLE);
        assert!(matches!(
            cfg.orchestrator(Some("staging")),
            Err(ConfigError::UnknownOrchestrator { .. })
        ));
    }

    #[test]
    fn provisioning_section_translates() {
        let cfg = load(SAMPLE);
        let prov = cfg.provisioning.to_provisioning_config().unwrap();

        assert_eq!(prov.profile_name, "Hub West");
        assert_eq!(prov.contact.email.as_deref(), Some("netops@example.net"));
        assert_eq!(prov.layout.lan_interface, "GE3");
        assert_eq!(prov.layout.first_wan_role, FirstWanRole::Underlay);
        assert_eq!(prov.edge_name, None);
    }

    #[test]
    fn wrong_wan_interface_count_is_rejected() {
        let section = ProvisioningSection {
            wan_interfaces: vec!["GE1".into()],
            ..ProvisioningSection::default()
        };
        let err = section.layout().unwrap_err();
        assert!(err.to_string().contains("exactly 2"));
    }

    #[test]
    fn duplicate_interface_names_are_rejected() {
        let section = ProvisioningSection {
            wan_interfaces: vec!["GE3".into(), "GE2".into()],
            ..ProvisioningSection::default()
        };
        assert!(matches!(
            section.layout(),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn orchestrator_url_accepts_bare_host_and_url() {
        assert_eq!(
            orchestrator_url("vco.example.net").unwrap().as_str(),
            "https://vco.example.net/"
        );
        assert_eq!(
            orchestrator_url("http://10.0.0.5:8080").unwrap().as_str(),
            "http://10.0.0.5:8080/"
        );
        assert!(orchestrator_url("  ").is_err());
    }

    #[test]
    fn tls_mode_follows_profile() {
        let cfg = load(SAMPLE);
        assert_eq!(
            tls_for(&cfg.orchestrators["lab"], &cfg.defaults),
            TlsVerification::DangerAcceptInvalid
        );
        assert_eq!(
            tls_for(&cfg.orchestrators["prod"], &cfg.defaults),
            TlsVerification::CustomCa("/etc/veloprov/ca.pem".into())
        );
    }

    #[test]
    fn save_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.orchestrators.insert(
            "default".into(),
            OrchestratorProfile {
                hostname: "vco.example.net".into(),
                ..OrchestratorProfile::default()
            },
        );

        save_config_to(&cfg, &path).unwrap();
        let reloaded = load_config_from(&path).unwrap();

        assert_eq!(reloaded.orchestrators["default"].hostname, "vco.example.net");
        assert_eq!(reloaded.provisioning.lan_address, Ipv4Addr::new(127, 0, 0, 10));
    }

    #[test]
    fn plaintext_token_is_last_resort() {
        // Only meaningful when no override is present in the test env.
        if std::env::var(TOKEN_ENV).is_ok() {
            return;
        }
        let profile = OrchestratorProfile {
            hostname: "vco.example.net".into(),
            token: Some("plain-token".into()),
            ..OrchestratorProfile::default()
        };
        let token = resolve_token(&profile, "veloprov-test-no-keyring-entry").unwrap();
        assert_eq!(token.expose_secret(), "plain-token");
    }
}
