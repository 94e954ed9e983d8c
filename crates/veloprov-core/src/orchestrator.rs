// ── Orchestrator collaborator ──
//
// The provisioning flow talks to the orchestrator through this trait so it
// can run against the portal client or an in-memory fake.

use std::future::Future;

use serde_json::Value;
use tracing::debug;
use veloprov_api::{
    ConfigurationProfile, ConfigurationStackEntry, CreatedObject, EdgeSite, Enterprise,
    ModuleUpdate, OrchestratorClient, ProvisionedEdge, TlsMode, TransportConfig,
};

use crate::config::{OrchestratorConfig, TlsVerification};
use crate::error::{CoreError, Step};

type ApiResult<T> = Result<T, veloprov_api::Error>;

/// The six orchestrator operations provisioning depends on.
pub trait Orchestrator: Send + Sync {
    fn get_enterprise(&self) -> impl Future<Output = ApiResult<Enterprise>> + Send;

    fn list_configuration_profiles(
        &self,
        enterprise_id: i64,
    ) -> impl Future<Output = ApiResult<Vec<ConfigurationProfile>>> + Send;

    /// Create a configuration profile named `name`; returns its id.
    fn create_configuration_profile(
        &self,
        enterprise_id: i64,
        name: &str,
    ) -> impl Future<Output = ApiResult<CreatedObject>> + Send;

    fn provision_edge(
        &self,
        enterprise_id: i64,
        profile_id: i64,
        name: &str,
        site: &EdgeSite,
    ) -> impl Future<Output = ApiResult<ProvisionedEdge>> + Send;

    fn get_edge_configuration_stack(
        &self,
        edge_id: i64,
    ) -> impl Future<Output = ApiResult<Vec<ConfigurationStackEntry>>> + Send;

    fn update_configuration_module(
        &self,
        module_id: i64,
        module_name: &str,
        data: &Value,
    ) -> impl Future<Output = ApiResult<ModuleUpdate>> + Send;
}

impl Orchestrator for OrchestratorClient {
    fn get_enterprise(&self) -> impl Future<Output = ApiResult<Enterprise>> + Send {
        OrchestratorClient::get_enterprise(self)
    }

    fn list_configuration_profiles(
        &self,
        enterprise_id: i64,
    ) -> impl Future<Output = ApiResult<Vec<ConfigurationProfile>>> + Send {
        OrchestratorClient::list_configuration_profiles(self, enterprise_id)
    }

    fn create_configuration_profile(
        &self,
        enterprise_id: i64,
        name: &str,
    ) -> impl Future<Output = ApiResult<CreatedObject>> + Send {
        self.clone_enterprise_template(enterprise_id, name)
    }

    fn provision_edge(
        &self,
        enterprise_id: i64,
        profile_id: i64,
        name: &str,
        site: &EdgeSite,
    ) -> impl Future<Output = ApiResult<ProvisionedEdge>> + Send {
        OrchestratorClient::provision_edge(self, enterprise_id, profile_id, name, site)
    }

    fn get_edge_configuration_stack(
        &self,
        edge_id: i64,
    ) -> impl Future<Output = ApiResult<Vec<ConfigurationStackEntry>>> + Send {
        OrchestratorClient::get_edge_configuration_stack(self, edge_id)
    }

    fn update_configuration_module(
        &self,
        module_id: i64,
        module_name: &str,
        data: &Value,
    ) -> impl Future<Output = ApiResult<ModuleUpdate>> + Send {
        OrchestratorClient::update_configuration_module(self, module_id, module_name, data)
    }
}

/// Build a portal client from connection settings.
pub fn connect(config: &OrchestratorConfig) -> Result<OrchestratorClient, CoreError> {
    debug!(host = config.hostname(), "building orchestrator client");
    OrchestratorClient::new(&config.url, &config.token, &build_transport(config))
        .map_err(CoreError::call(Step::Connect))
}

// ── Helpers ──────────────────────────────────────────────────────

fn build_transport(config: &OrchestratorConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use secrecy::SecretString;

    use super::*;

    #[test]
    fn connect_builds_client_for_host() {
        let config = OrchestratorConfig {
            url: "https://vco.example.net".parse().unwrap(),
            token: SecretString::from("abc".to_string()),
            tls: TlsVerification::DangerAcceptInvalid,
            timeout: Duration::from_secs(5),
        };
        let client = connect(&config).unwrap();
        assert_eq!(client.hostname(), Some("vco.example.net"));
    }

    #[test]
    fn connect_rejects_unreadable_ca() {
        let config = OrchestratorConfig {
            url: "https://vco.example.net".parse().unwrap(),
            token: SecretString::from("abc".to_string()),
            tls: TlsVerification::CustomCa("/nonexistent/ca.pem".into()),
            timeout: Duration::from_secs(5),
        };
        let err = connect(&config).unwrap_err();
        assert_eq!(err.step(), Some(Step::Connect));
    }
}
