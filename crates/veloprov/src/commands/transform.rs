//! Offline device settings transform.

use serde_json::Value;

use veloprov_api::ConfigurationStackEntry;
use veloprov_core::{
    CoreError, DEVICE_SETTINGS_MODULE, DeviceSettingsData, DeviceSettingsModule,
    apply_wan_topology,
};

use crate::cli::{GlobalOpts, TransformArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

/// Accepts a configuration stack (array), a single `deviceSettings`
/// module, or a bare module `data` object.
fn extract_data(doc: Value) -> Result<DeviceSettingsData, CliError> {
    let malformed = |e: serde_json::Error| CliError::MalformedDocument {
        reason: e.to_string(),
    };

    match doc {
        Value::Array(_) => {
            let stack: Vec<ConfigurationStackEntry> =
                serde_json::from_value(doc).map_err(malformed)?;
            Ok(DeviceSettingsModule::from_stack(&stack)?.data)
        }
        Value::Object(mut obj)
            if obj.get("name").and_then(Value::as_str) == Some(DEVICE_SETTINGS_MODULE) =>
        {
            let data = obj.remove("data").unwrap_or(Value::Null);
            serde_json::from_value(data).map_err(malformed)
        }
        Value::Object(_) => serde_json::from_value(doc).map_err(malformed),
        _ => Err(CoreError::MalformedConfigurationDocument {
            reason: "expected a JSON object or configuration stack array".into(),
        }
        .into()),
    }
}

pub fn handle(args: TransformArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config()?;
    let mut layout = cfg.provisioning.layout()?;
    if let Some(role) = args.first_wan_role {
        layout.first_wan_role = role.into();
    }

    let data = extract_data(util::read_json(&args.input)?)?;
    let updated = apply_wan_topology(&data, &layout)?;
    let text = output::render_json_pretty(&updated.to_value()?);

    match args.out {
        Some(path) => {
            util::write_text(&path, &text)?;
            if !global.quiet {
                eprintln!(
                    "✓ Wrote {} ({})",
                    path.display(),
                    updated.interface_names().join(", ")
                );
            }
        }
        None => output::print_output(&text, global.quiet),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn data_obj() -> Value {
        json!({
            "lan": { "networks": [{ "cidrIp": "10.0.1.1" }] },
            "routedInterfaces": [{ "name": "GE3" }]
        })
    }

    #[test]
    fn accepts_bare_data() {
        let data = extract_data(data_obj()).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(data.interface_names(), vec!["GE3"]);
    }

    #[test]
    fn accepts_single_module() {
        let doc = json!({ "id": 902, "name": "deviceSettings", "data": data_obj() });
        let data = extract_data(doc).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(data.lan.networks.len(), 1);
    }

    #[test]
    fn accepts_stack() {
        let doc = json!([{ "id": 900, "modules": [
            { "id": 902, "name": "deviceSettings", "data": data_obj() }
        ]}]);
        let data = extract_data(doc).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(data.interface_names(), vec!["GE3"]);
    }

    #[test]
    fn rejects_scalars() {
        assert!(matches!(
            extract_data(json!(42)),
            Err(CliError::MalformedDocument { .. })
        ));
    }
}
