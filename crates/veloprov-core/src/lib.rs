// veloprov-core: Edge provisioning flow between veloprov-api and the CLI.

pub mod config;
pub mod device_settings;
pub mod error;
pub mod orchestrator;
pub mod profile;
pub mod provision;
pub mod template;
pub mod transform;

#[cfg(test)]
mod fake;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{
    ContactInfo, FirstWanRole, InterfaceLayout, OrchestratorConfig, ProvisioningConfig,
    TlsVerification,
};
pub use device_settings::{DEVICE_SETTINGS_MODULE, DeviceSettingsData, DeviceSettingsModule};
pub use error::{CoreError, Step};
pub use orchestrator::{Orchestrator, connect};
pub use profile::{ResolvedProfile, resolve_or_create_profile};
pub use provision::{Provisioner, ProvisioningReport};
pub use template::{StackTemplate, TemplateParameters};
pub use transform::apply_wan_topology;
