// Portal API request and response types
//
// The portal returns bare JSON (no envelope) on success. Fields the
// provisioning flow does not read are kept in `extra` so that documents
// fetched from the orchestrator survive a round trip untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Enterprise ───────────────────────────────────────────────────────

/// Enterprise of the authenticated API user (`enterprise/getEnterprise`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enterprise {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Configuration profiles ───────────────────────────────────────────

/// One entry of `enterprise/getEnterpriseConfigurationsPolicies`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigurationProfile {
    pub id: i64,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Minimal `{ "id": N }` acknowledgement returned by create calls.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CreatedObject {
    pub id: i64,
}

// ── Edges ────────────────────────────────────────────────────────────

/// Result of `edge/edgeProvision`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionedEdge {
    pub id: i64,
    pub activation_key: String,
}

/// Site and contact record sent with a new edge.
///
/// Only the contact fields are populated by default; the orchestrator
/// expects every other key to be present, even when null.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeSite {
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub street_address: Option<String>,
    pub street_address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub timezone: Option<String>,
    pub locale: Option<String>,
    pub shipping_same_as_location: u8,
    pub shipping_contact_name: Option<String>,
    pub shipping_address: Option<String>,
    pub shipping_address2: Option<String>,
    pub shipping_city: Option<String>,
    pub shipping_state: Option<String>,
    pub shipping_postal_code: Option<String>,
    pub shipping_country: Option<String>,
    pub modified: Option<String>,
}

impl EdgeSite {
    /// Site with only contact information set and shipping to the
    /// same location.
    pub fn with_contact(name: Option<String>, email: Option<String>) -> Self {
        Self {
            contact_name: name,
            contact_email: email,
            shipping_same_as_location: 1,
            ..Self::default()
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProvisionEdgeParams<'a> {
    /// Enterprise id.
    pub id: i64,
    pub name: &'a str,
    pub model_number: &'a str,
    pub configuration_id: i64,
    pub site: &'a EdgeSite,
}

// ── Configuration stack ──────────────────────────────────────────────

/// One configuration of an edge's stack (`edge/getEdgeConfigurationStack`).
///
/// The first entry is the edge-specific configuration, followed by the
/// profile it inherits from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigurationStackEntry {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub modules: Vec<ConfigurationModule>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A named configuration module (`deviceSettings`, `QOS`, `WAN`, ...).
///
/// `data` is kept as raw JSON; only the caller knows its shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigurationModule {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub data: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateModuleParams<'a> {
    pub id: i64,
    pub return_data: bool,
    #[serde(rename = "_update")]
    pub update: ModuleUpdateBody<'a>,
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ModuleUpdateBody<'a> {
    pub data: &'a Value,
}

/// Acknowledgement of `configuration/updateConfigurationModule`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleUpdate {
    #[serde(default)]
    pub rows: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn edge_site_serializes_every_key() {
        let site = EdgeSite::with_contact(Some("Netops".into()), Some("netops@example.net".into()));
        let value = serde_json::to_value(&site).unwrap();
        let obj = value.as_object().unwrap();

        assert_eq!(obj["contactName"], "Netops");
        assert_eq!(obj["shippingSameAsLocation"], 1);
        assert!(obj["streetAddress"].is_null());
        assert!(obj.contains_key("modified"));
        assert_eq!(obj.len(), 21);
    }

    #[test]
    fn stack_entry_keeps_unknown_fields() {
        let raw = json!({
            "id": 7,
            "name": "Edge Specific Profile",
            "effective": "2024-01-01",
            "modules": [
                { "id": 70, "name": "deviceSettings", "data": { "lan": {} }, "version": "3" }
            ]
        });
        let entry: ConfigurationStackEntry = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(entry.modules[0].name, "deviceSettings");
        assert_eq!(entry.modules[0].extra["version"], "3");
        assert_eq!(serde_json::to_value(&entry).unwrap(), raw);
    }
}
