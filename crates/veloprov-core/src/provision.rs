// ── Provisioning driver ──
//
// Runs the whole edge provisioning sequence against one orchestrator:
// enterprise lookup, profile find-or-create, edge creation, and the
// device settings rewrite. Steps run strictly in order and the first
// failure aborts the run. Nothing created before the failure is undone.

use serde::Serialize;
use tracing::{info, instrument};
use veloprov_api::EdgeSite;

use crate::config::{ContactInfo, ProvisioningConfig};
use crate::device_settings::{DEVICE_SETTINGS_MODULE, DeviceSettingsModule};
use crate::error::{CoreError, Step};
use crate::orchestrator::Orchestrator;
use crate::profile::resolve_or_create_profile;
use crate::transform::apply_wan_topology;

/// What a successful run created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisioningReport {
    pub enterprise_id: i64,
    pub profile_id: i64,
    pub profile_created: bool,
    pub edge_id: i64,
    pub edge_name: String,
    pub activation_key: String,
    pub module_id: i64,
}

/// Drives a provisioning run through an [`Orchestrator`].
pub struct Provisioner<'a, O> {
    orchestrator: &'a O,
}

impl<'a, O: Orchestrator> Provisioner<'a, O> {
    pub fn new(orchestrator: &'a O) -> Self {
        Self { orchestrator }
    }

    #[instrument(skip_all, fields(profile = %config.profile_name))]
    pub async fn run(&self, config: &ProvisioningConfig) -> Result<ProvisioningReport, CoreError> {
        config.validate()?;

        // 1. Enterprise
        let enterprise = self
            .orchestrator
            .get_enterprise()
            .await
            .map_err(CoreError::call(Step::GetEnterprise))?;
        if let Some(expected) = &config.enterprise_name {
            let actual = enterprise.name.clone().unwrap_or_default();
            if &actual != expected {
                return Err(CoreError::EnterpriseMismatch {
                    expected: expected.clone(),
                    actual,
                });
            }
        }
        info!(
            enterprise_id = enterprise.id,
            name = enterprise.name.as_deref().unwrap_or("-"),
            "enterprise resolved"
        );

        // 2. Profile
        let profile =
            resolve_or_create_profile(self.orchestrator, enterprise.id, &config.profile_name)
                .await?;

        // 3. Edge
        let edge_name = config.edge_name();
        let site = edge_site(&config.contact);
        let edge = self
            .orchestrator
            .provision_edge(enterprise.id, profile.id, &edge_name, &site)
            .await
            .map_err(CoreError::call(Step::ProvisionEdge))?;
        info!(edge_id = edge.id, edge_name = %edge_name, "edge provisioned");

        // 4. Device settings
        let stack = self
            .orchestrator
            .get_edge_configuration_stack(edge.id)
            .await
            .map_err(CoreError::call(Step::FetchConfiguration))?;
        let module = DeviceSettingsModule::from_stack(&stack)?;
        info!(
            module_id = module.module_id,
            interfaces = ?module.data.interface_names(),
            "device settings fetched"
        );

        // 5. Transform
        let updated = apply_wan_topology(&module.data, &config.layout)?;
        let data = updated.to_value()?;

        // 6. Write back
        self.orchestrator
            .update_configuration_module(module.module_id, DEVICE_SETTINGS_MODULE, &data)
            .await
            .map_err(CoreError::call(Step::UpdateConfiguration))?;
        info!(
            module_id = module.module_id,
            interfaces = ?updated.interface_names(),
            "device settings updated"
        );

        Ok(ProvisioningReport {
            enterprise_id: enterprise.id,
            profile_id: profile.id,
            profile_created: profile.created,
            edge_id: edge.id,
            edge_name,
            activation_key: edge.activation_key,
            module_id: module.module_id,
        })
    }
}

fn edge_site(contact: &ContactInfo) -> EdgeSite {
    EdgeSite::with_contact(contact.name.clone(), contact.email.clone())
}
