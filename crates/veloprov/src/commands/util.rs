//! Shared helpers for command handlers.

use std::fs;
use std::path::Path;

use dialoguer::Confirm;
use serde_json::Value;

use veloprov_core::{FirstWanRole, StackTemplate};

use crate::cli::WanRole;
use crate::error::CliError;

/// Greenfield stack template shipped with the binary.
pub const BUNDLED_TEMPLATE: &str = include_str!("../../templates/greenfield-stack.json");

impl From<WanRole> for FirstWanRole {
    fn from(role: WanRole) -> Self {
        match role {
            WanRole::MirrorLan => Self::MirrorLan,
            WanRole::Underlay => Self::Underlay,
        }
    }
}

/// Load the template at `path`, or the bundled one.
pub fn load_template(path: Option<&Path>) -> Result<StackTemplate, CliError> {
    Ok(match path {
        Some(path) => StackTemplate::from_path(path)?,
        None => StackTemplate::parse(BUNDLED_TEMPLATE, "bundled template")?,
    })
}

/// Read and parse a JSON file.
pub fn read_json(path: &Path) -> Result<Value, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::IoAt {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Json {
        context: path.display().to_string(),
        source,
    })
}

/// Write text to `path`, with a trailing newline.
pub fn write_text(path: &Path, text: &str) -> Result<(), CliError> {
    fs::write(path, format!("{text}\n")).map_err(|source| CliError::IoAt {
        path: path.display().to_string(),
        source,
    })
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(crate::error::prompt_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_template_declares_populated_parameters() {
        let tpl = load_template(None).unwrap_or_else(|e| panic!("{e}"));
        for name in ["ActivationKey", "VeloCloudKeyPairName", "VCO", "VeloCloudEdgeName"] {
            assert!(tpl.parameter_default(name).is_some(), "missing {name}");
        }
    }
}
