// ── Cloud stack template ──
//
// The stack template is an opaque JSON document; only the `Default` values
// of a handful of `Parameters` entries are filled in from the provisioning
// result before it is written out for deployment.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::CoreError;

pub const ACTIVATION_KEY_PARAM: &str = "ActivationKey";
pub const KEY_PAIR_PARAM: &str = "VeloCloudKeyPairName";
pub const ORCHESTRATOR_PARAM: &str = "VCO";
pub const EDGE_NAME_PARAM: &str = "VeloCloudEdgeName";

/// Values written into the template's parameter defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateParameters {
    pub activation_key: String,
    /// Left at the template's own default when unset.
    pub key_pair_name: Option<String>,
    pub orchestrator_host: String,
    pub edge_name: String,
}

impl TemplateParameters {
    fn assignments(&self) -> Vec<(&'static str, &str)> {
        let mut out = vec![
            (ACTIVATION_KEY_PARAM, self.activation_key.as_str()),
            (ORCHESTRATOR_PARAM, self.orchestrator_host.as_str()),
            (EDGE_NAME_PARAM, self.edge_name.as_str()),
        ];
        if let Some(key_pair) = &self.key_pair_name {
            out.push((KEY_PAIR_PARAM, key_pair.as_str()));
        }
        out
    }
}

/// A cloud stack template document.
#[derive(Debug, Clone, PartialEq)]
pub struct StackTemplate(Value);

impl StackTemplate {
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Parse template text; `origin` names the source in errors.
    pub fn parse(text: &str, origin: &str) -> Result<Self, CoreError> {
        serde_json::from_str(text)
            .map(Self)
            .map_err(|source| CoreError::Json {
                context: origin.to_owned(),
                source,
            })
    }

    pub fn from_path(path: &Path) -> Result<Self, CoreError> {
        let text = fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, &path.display().to_string())
    }

    /// Current `Parameters.<name>.Default` value.
    pub fn parameter_default(&self, name: &str) -> Option<&Value> {
        self.0.get("Parameters")?.get(name)?.get("Default")
    }

    /// Set the parameter defaults. Every targeted parameter must already
    /// exist; nothing is written unless all of them do.
    pub fn populate(&mut self, params: &TemplateParameters) -> Result<(), CoreError> {
        let assignments = params.assignments();

        let parameters = self
            .0
            .get_mut("Parameters")
            .and_then(Value::as_object_mut)
            .ok_or_else(|| CoreError::TemplateParameterMissing {
                name: "Parameters".into(),
            })?;

        if let Some((name, _)) = assignments
            .iter()
            .find(|(name, _)| !parameters.get(*name).is_some_and(Value::is_object))
        {
            return Err(CoreError::TemplateParameterMissing {
                name: (*name).to_owned(),
            });
        }

        for (name, value) in assignments {
            if let Some(Value::Object(param)) = parameters.get_mut(name) {
                param.insert("Default".into(), Value::String(value.to_owned()));
                debug!(parameter = name, "template parameter set");
            }
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.0).map_err(|source| CoreError::Json {
            context: "stack template".into(),
            source,
        })
    }

    pub fn write_to(&self, path: &Path) -> Result<(), CoreError> {
        let mut text = self.to_json_pretty()?;
        text.push('\n');
        fs::write(path, text).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}
