// Enterprise-scoped portal methods
//
// Enterprise lookup plus the configuration profile listing and cloning
// used to find or create the hub profile.

use serde_json::json;
use tracing::debug;

use crate::client::OrchestratorClient;
use crate::error::Error;
use crate::models::{ConfigurationProfile, CreatedObject, Enterprise};

impl OrchestratorClient {
    /// Enterprise of the user owning the API token.
    ///
    /// `POST enterprise/getEnterprise`
    pub async fn get_enterprise(&self) -> Result<Enterprise, Error> {
        debug!("fetching enterprise");
        self.call("enterprise/getEnterprise", &json!({})).await
    }

    /// All configuration profiles of an enterprise, in orchestrator order.
    ///
    /// `POST enterprise/getEnterpriseConfigurationsPolicies`
    pub async fn list_configuration_profiles(
        &self,
        enterprise_id: i64,
    ) -> Result<Vec<ConfigurationProfile>, Error> {
        debug!(enterprise_id, "listing configuration profiles");
        self.call(
            "enterprise/getEnterpriseConfigurationsPolicies",
            &json!({ "enterpriseId": enterprise_id }),
        )
        .await
    }

    /// Create a profile by cloning the enterprise template.
    ///
    /// `POST configuration/cloneEnterpriseTemplate` with `{"id": eid, "name": ...}`
    pub async fn clone_enterprise_template(
        &self,
        enterprise_id: i64,
        name: &str,
    ) -> Result<CreatedObject, Error> {
        debug!(enterprise_id, name, "cloning enterprise template");
        self.call(
            "configuration/cloneEnterpriseTemplate",
            &json!({ "id": enterprise_id, "name": name }),
        )
        .await
    }
}
