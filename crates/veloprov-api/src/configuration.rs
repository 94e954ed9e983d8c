// Configuration module portal methods

use serde_json::Value;
use tracing::debug;

use crate::client::OrchestratorClient;
use crate::error::Error;
use crate::models::{ModuleUpdate, ModuleUpdateBody, UpdateModuleParams};

impl OrchestratorClient {
    /// Replace the `data` of a configuration module in full.
    ///
    /// `POST configuration/updateConfigurationModule` with
    /// `{"id": N, "returnData": true, "_update": {"data": ...}, "name": ...}`
    pub async fn update_configuration_module(
        &self,
        module_id: i64,
        module_name: &str,
        data: &Value,
    ) -> Result<ModuleUpdate, Error> {
        debug!(module_id, module_name, "updating configuration module");
        let params = UpdateModuleParams {
            id: module_id,
            return_data: true,
            update: ModuleUpdateBody { data },
            name: module_name,
        };
        self.call("configuration/updateConfigurationModule", &params)
            .await
    }
}
