// In-memory orchestrator for unit tests.
#![allow(clippy::unwrap_used)]

use std::sync::Mutex;

use serde_json::{Value, json};
use veloprov_api::{
    ConfigurationProfile, ConfigurationStackEntry, CreatedObject, EdgeSite, Enterprise, Error,
    ModuleUpdate, ProvisionedEdge,
};

use crate::orchestrator::Orchestrator;

#[derive(Debug, Default)]
pub(crate) struct FakeState {
    pub profiles: Vec<(i64, String)>,
    pub next_profile_id: i64,
    pub calls: Vec<&'static str>,
    pub provisioned: Vec<(i64, String, EdgeSite)>,
    pub updated: Vec<(i64, String, Value)>,
}

pub(crate) struct FakeOrchestrator {
    pub enterprise: Value,
    pub stack: Value,
    pub fail_on: Option<&'static str>,
    pub state: Mutex<FakeState>,
}

impl FakeOrchestrator {
    pub fn new() -> Self {
        Self {
            enterprise: json!({ "id": 42, "name": "Lab Corp" }),
            stack: json!([{
                "id": 900,
                "name": "Edge Specific Profile",
                "modules": [{
                    "id": 902,
                    "name": "deviceSettings",
                    "data": {
                        "lan": { "networks": [{ "cidrIp": "10.0.1.1", "cidrPrefix": 24 }] },
                        "routedInterfaces": [{ "name": "GE3" }]
                    }
                }]
            }]),
            fail_on: None,
            state: Mutex::new(FakeState {
                next_profile_id: 100,
                ..FakeState::default()
            }),
        }
    }

    pub fn with_profiles(self, profiles: &[(i64, &str)]) -> Self {
        self.state.lock().unwrap().profiles =
            profiles.iter().map(|(id, n)| (*id, (*n).to_owned())).collect();
        self
    }

    pub fn failing_on(mut self, call: &'static str) -> Self {
        self.fail_on = Some(call);
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    fn enter(&self, call: &'static str) -> Result<(), Error> {
        self.state.lock().unwrap().calls.push(call);
        if self.fail_on == Some(call) {
            return Err(Error::Api {
                method: call.into(),
                message: "injected failure".into(),
                code: Some(-32000),
                status: None,
            });
        }
        Ok(())
    }
}

impl Orchestrator for FakeOrchestrator {
    async fn get_enterprise(&self) -> Result<Enterprise, Error> {
        self.enter("get_enterprise")?;
        Ok(serde_json::from_value(self.enterprise.clone()).unwrap())
    }

    async fn list_configuration_profiles(
        &self,
        _enterprise_id: i64,
    ) -> Result<Vec<ConfigurationProfile>, Error> {
        self.enter("list_configuration_profiles")?;
        let profiles = self
            .state
            .lock()
            .unwrap()
            .profiles
            .iter()
            .map(|(id, name)| serde_json::from_value(json!({ "id": id, "name": name })).unwrap())
            .collect();
        Ok(profiles)
    }

    async fn create_configuration_profile(
        &self,
        _enterprise_id: i64,
        name: &str,
    ) -> Result<CreatedObject, Error> {
        self.enter("create_configuration_profile")?;
        let mut state = self.state.lock().unwrap();
        let id = state.next_profile_id;
        state.next_profile_id += 1;
        state.profiles.push((id, name.to_owned()));
        Ok(CreatedObject { id })
    }

    async fn provision_edge(
        &self,
        _enterprise_id: i64,
        profile_id: i64,
        name: &str,
        site: &EdgeSite,
    ) -> Result<ProvisionedEdge, Error> {
        self.enter("provision_edge")?;
        self.state
            .lock()
            .unwrap()
            .provisioned
            .push((profile_id, name.to_owned(), site.clone()));
        Ok(ProvisionedEdge {
            id: 501,
            activation_key: "ABCD-EFGH-IJKL-MNOP".into(),
        })
    }

    async fn get_edge_configuration_stack(
        &self,
        _edge_id: i64,
    ) -> Result<Vec<ConfigurationStackEntry>, Error> {
        self.enter("get_edge_configuration_stack")?;
        Ok(serde_json::from_value(self.stack.clone()).unwrap())
    }

    async fn update_configuration_module(
        &self,
        module_id: i64,
        module_name: &str,
        data: &Value,
    ) -> Result<ModuleUpdate, Error> {
        self.enter("update_configuration_module")?;
        self.state
            .lock()
            .unwrap()
            .updated
            .push((module_id, module_name.to_owned(), data.clone()));
        Ok(serde_json::from_value(json!({ "rows": 1 })).unwrap())
    }
}
