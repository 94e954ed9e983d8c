// ── Runtime configuration ──
//
// These types describe *how* to reach the orchestrator and *what* to
// provision. They are built by the CLI (or a test) and passed in at call
// time; core never reads config files or the environment.

use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::time::Duration;

use rand::Rng;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use url::Url;

use crate::error::CoreError;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (lab orchestrators with self-signed certs).
    DangerAcceptInvalid,
}

/// Connection settings for one orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Orchestrator root URL (e.g., `https://vco.example.net`).
    pub url: Url,
    /// Portal API token.
    pub token: SecretString,
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
}

impl OrchestratorConfig {
    /// Hostname passed to the cloud template's `VCO` parameter.
    pub fn hostname(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }
}

// ── Provisioning ─────────────────────────────────────────────────────

/// Contact details attached to the provisioned edge's site record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Role given to the first synthesized WAN interface.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum FirstWanRole {
    /// Keep the LAN-facing settings it was copied from. Matches the
    /// layout existing orchestrator deployments were built with.
    #[default]
    MirrorLan,
    /// Plain underlay uplink: NAT on, not advertised, no overlay.
    Underlay,
}

/// Interface naming and addressing the cloud template assumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceLayout {
    /// Routed interface wired to the private LAN subnet.
    pub lan_interface: String,
    /// Interfaces synthesized ahead of the LAN interface, in order.
    pub wan_interfaces: [String; 2],
    /// Edge address inside the LAN /30.
    pub lan_address: Ipv4Addr,
    pub first_wan_role: FirstWanRole,
}

impl Default for InterfaceLayout {
    fn default() -> Self {
        Self {
            lan_interface: "GE3".into(),
            wan_interfaces: ["GE1".into(), "GE2".into()],
            lan_address: Ipv4Addr::new(127, 0, 0, 10),
            first_wan_role: FirstWanRole::default(),
        }
    }
}

impl InterfaceLayout {
    /// Names must be non-empty and pairwise distinct.
    pub fn validate(&self) -> Result<(), CoreError> {
        let [first, second] = &self.wan_interfaces;
        let names = [self.lan_interface.as_str(), first.as_str(), second.as_str()];

        if names.iter().any(|n| n.trim().is_empty()) {
            return Err(CoreError::ValidationFailed {
                message: "interface names cannot be empty".into(),
            });
        }
        if first == second || names[1..].contains(&names[0]) {
            return Err(CoreError::ValidationFailed {
                message: format!(
                    "interface names must be distinct (lan {}, wan {first}, {second})",
                    self.lan_interface
                ),
            });
        }
        Ok(())
    }
}

/// What one provisioning run creates.
#[derive(Debug, Clone)]
pub struct ProvisioningConfig {
    /// When set, the token's enterprise must carry this name.
    pub enterprise_name: Option<String>,
    /// Configuration profile the edge is attached to (found or created).
    pub profile_name: String,
    /// Prefix for generated edge names.
    pub edge_name_prefix: String,
    /// Explicit edge name; overrides the generated one.
    pub edge_name: Option<String>,
    pub contact: ContactInfo,
    pub layout: InterfaceLayout,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            enterprise_name: None,
            profile_name: "AWS HUB Profile".into(),
            edge_name_prefix: "AWS-VCE-".into(),
            edge_name: None,
            contact: ContactInfo::default(),
            layout: InterfaceLayout::default(),
        }
    }
}

impl ProvisioningConfig {
    /// The explicit edge name, or the prefix plus a random suffix in
    /// `1..=10000`.
    pub fn edge_name(&self) -> String {
        match &self.edge_name {
            Some(name) => name.clone(),
            None => {
                let suffix: u32 = rand::thread_rng().gen_range(1..=10_000);
                format!("{}{suffix}", self.edge_name_prefix)
            }
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.profile_name.is_empty() {
            return Err(CoreError::ValidationFailed {
                message: "profile name cannot be empty".into(),
            });
        }
        if self.edge_name.as_deref().is_some_and(str::is_empty) {
            return Err(CoreError::ValidationFailed {
                message: "edge name cannot be empty".into(),
            });
        }
        self.layout.validate()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn generated_edge_name_uses_prefix() {
        let config = ProvisioningConfig::default();
        let name = config.edge_name();
        let suffix: u32 = name.strip_prefix("AWS-VCE-").unwrap().parse().unwrap();
        assert!((1..=10_000).contains(&suffix));
    }

    #[test]
    fn explicit_edge_name_wins() {
        let config = ProvisioningConfig {
            edge_name: Some("hub-west".into()),
            ..ProvisioningConfig::default()
        };
        assert_eq!(config.edge_name(), "hub-west");
    }

    #[test]
    fn layout_rejects_duplicate_names() {
        let layout = InterfaceLayout {
            wan_interfaces: ["GE1".into(), "GE3".into()],
            ..InterfaceLayout::default()
        };
        assert!(matches!(
            layout.validate(),
            Err(CoreError::ValidationFailed { .. })
        ));
    }

    #[test]
    fn empty_profile_name_is_rejected() {
        let config = ProvisioningConfig {
            profile_name: String::new(),
            ..ProvisioningConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn first_wan_role_parses_kebab_case() {
        assert_eq!(
            "underlay".parse::<FirstWanRole>().unwrap(),
            FirstWanRole::Underlay
        );
        assert_eq!(FirstWanRole::MirrorLan.to_string(), "mirror-lan");
    }

    #[test]
    fn hostname_from_url() {
        let config = OrchestratorConfig {
            url: "https://vco.example.net:8443".parse().unwrap(),
            token: SecretString::from("t".to_string()),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        };
        assert_eq!(config.hostname(), "vco.example.net");
    }
}
