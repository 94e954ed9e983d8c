// Edge portal methods
//
// Provisioning a virtual edge and reading its configuration stack.

use serde_json::json;
use tracing::debug;

use crate::client::OrchestratorClient;
use crate::error::Error;
use crate::models::{ConfigurationStackEntry, EdgeSite, ProvisionEdgeParams, ProvisionedEdge};

/// Model number of a virtual edge appliance.
pub const VIRTUAL_EDGE_MODEL: &str = "virtual";

impl OrchestratorClient {
    /// Provision a new virtual edge against a configuration profile.
    ///
    /// `POST edge/edgeProvision`
    pub async fn provision_edge(
        &self,
        enterprise_id: i64,
        profile_id: i64,
        name: &str,
        site: &EdgeSite,
    ) -> Result<ProvisionedEdge, Error> {
        debug!(enterprise_id, profile_id, name, "provisioning edge");
        let params = ProvisionEdgeParams {
            id: enterprise_id,
            name,
            model_number: VIRTUAL_EDGE_MODEL,
            configuration_id: profile_id,
            site,
        };
        self.call("edge/edgeProvision", &params).await
    }

    /// Configuration stack of an edge, edge-specific entry first.
    ///
    /// `POST edge/getEdgeConfigurationStack` with `{"edgeId": N}`
    pub async fn get_edge_configuration_stack(
        &self,
        edge_id: i64,
    ) -> Result<Vec<ConfigurationStackEntry>, Error> {
        debug!(edge_id, "fetching edge configuration stack");
        self.call(
            "edge/getEdgeConfigurationStack",
            &json!({ "edgeId": edge_id }),
        )
        .await
    }
}
