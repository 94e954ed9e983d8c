// ── Device settings document ──
//
// Typed view of the `deviceSettings` configuration module. The document
// skeleton is typed; individual LAN networks and routed interfaces stay as
// raw JSON objects with typed accessors, so keys the transform never edits
// (explicit nulls, string prefixes, unknown modes) are written back
// exactly as they were read.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use veloprov_api::ConfigurationStackEntry;

use crate::error::CoreError;

/// Name of the configuration module holding interface and LAN topology.
pub const DEVICE_SETTINGS_MODULE: &str = "deviceSettings";

/// Overlay discovery mode of a routed interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WanOverlay {
    AutoDiscovered,
    UserDefined,
    Disabled,
}

impl WanOverlay {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AutoDiscovered => "AUTO_DISCOVERED",
            Self::UserDefined => "USER_DEFINED",
            Self::Disabled => "DISABLED",
        }
    }
}

/// The `data` object of a `deviceSettings` module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSettingsData {
    #[serde(default)]
    pub lan: LanSettings,
    #[serde(default)]
    pub routed_interfaces: Vec<RoutedInterface>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanSettings {
    #[serde(default)]
    pub networks: Vec<LanNetwork>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One LAN network (VLAN) of the edge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanNetwork(Map<String, Value>);

impl LanNetwork {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_owned(), value.into());
    }

    pub fn cidr_ip(&self) -> Option<&str> {
        self.0.get("cidrIp").and_then(Value::as_str)
    }

    /// The orchestrator has shipped the prefix both as a number and a string.
    pub fn cidr_prefix(&self) -> Option<u8> {
        match self.0.get("cidrPrefix")? {
            Value::Number(n) => n.as_u64().and_then(|n| u8::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn netmask(&self) -> Option<&str> {
        self.0.get("netmask").and_then(Value::as_str)
    }

    pub fn advertise(&self) -> Option<bool> {
        self.0.get("advertise").and_then(Value::as_bool)
    }

    pub fn dhcp_enabled(&self) -> Option<bool> {
        self.0
            .get("dhcp")
            .and_then(|d| d.get("enabled"))
            .and_then(Value::as_bool)
    }

    /// Turn DHCP off, creating the `dhcp` record when it is absent or null.
    pub fn disable_dhcp(&mut self) {
        if let Some(Value::Object(dhcp)) = self.0.get_mut("dhcp") {
            dhcp.insert("enabled".into(), Value::Bool(false));
        } else {
            let mut dhcp = Map::new();
            dhcp.insert("enabled".into(), Value::Bool(false));
            self.0.insert("dhcp".into(), Value::Object(dhcp));
        }
    }
}

/// One routed interface (`GE1`..`GEn`). Must carry a string `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct RoutedInterface(Map<String, Value>);

impl TryFrom<Map<String, Value>> for RoutedInterface {
    type Error = String;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        match map.get("name") {
            Some(Value::String(_)) => Ok(Self(map)),
            _ => Err("routed interface without a string `name`".into()),
        }
    }
}

impl From<RoutedInterface> for Map<String, Value> {
    fn from(iface: RoutedInterface) -> Self {
        iface.0
    }
}

impl RoutedInterface {
    pub fn name(&self) -> &str {
        self.0.get("name").and_then(Value::as_str).unwrap_or_default()
    }

    pub fn set_name(&mut self, name: &str) {
        self.set("name", name);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_owned(), value.into());
    }

    pub fn override_enabled(&self) -> Option<bool> {
        self.0.get("override").and_then(Value::as_bool)
    }

    pub fn advertise(&self) -> Option<bool> {
        self.0.get("advertise").and_then(Value::as_bool)
    }

    pub fn nat_direct(&self) -> Option<bool> {
        self.0.get("natDirect").and_then(Value::as_bool)
    }

    /// `None` when absent, null, or a mode this crate does not know.
    pub fn wan_overlay(&self) -> Option<WanOverlay> {
        self.0
            .get("wanOverlay")
            .and_then(|v| WanOverlay::deserialize(v).ok())
    }

    pub fn set_wan_overlay(&mut self, overlay: WanOverlay) {
        self.set("wanOverlay", overlay.as_str());
    }
}

// ── Module extraction ────────────────────────────────────────────────

/// The `deviceSettings` module of an edge, ready to transform.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSettingsModule {
    pub module_id: i64,
    pub data: DeviceSettingsData,
}

impl DeviceSettingsModule {
    /// Pick the device settings out of an edge configuration stack.
    ///
    /// The edge-specific configuration is the first stack entry; its
    /// `deviceSettings` module is the one that gets rewritten.
    pub fn from_stack(stack: &[ConfigurationStackEntry]) -> Result<Self, CoreError> {
        let edge_specific = stack
            .first()
            .ok_or_else(|| CoreError::malformed("configuration stack is empty"))?;

        let module = edge_specific
            .modules
            .iter()
            .find(|m| m.name == DEVICE_SETTINGS_MODULE)
            .ok_or_else(|| {
                CoreError::malformed(format!(
                    "configuration {} has no {DEVICE_SETTINGS_MODULE} module",
                    edge_specific.id
                ))
            })?;

        let data = serde_json::from_value(module.data.clone()).map_err(|e| {
            CoreError::malformed(format!("{DEVICE_SETTINGS_MODULE} data: {e}"))
        })?;

        Ok(Self {
            module_id: module.id,
            data,
        })
    }
}

impl DeviceSettingsData {
    /// Serialize back into the JSON written to the orchestrator.
    pub fn to_value(&self) -> Result<Value, CoreError> {
        serde_json::to_value(self).map_err(|source| CoreError::Json {
            context: DEVICE_SETTINGS_MODULE.into(),
            source,
        })
    }

    /// Names of the routed interfaces, in document order.
    pub fn interface_names(&self) -> Vec<&str> {
        self.routed_interfaces
            .iter()
            .map(RoutedInterface::name)
            .collect()
    }
}
