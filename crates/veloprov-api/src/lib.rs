// veloprov-api: Async Rust client for the SD-WAN orchestrator portal REST API

pub mod client;
pub mod configuration;
pub mod edge;
pub mod enterprise;
pub mod error;
pub mod models;
pub mod transport;

pub use client::OrchestratorClient;
pub use error::Error;
pub use models::{
    ConfigurationModule, ConfigurationProfile, ConfigurationStackEntry, CreatedObject, EdgeSite,
    Enterprise, ModuleUpdate, ProvisionedEdge,
};
pub use transport::{TlsMode, TransportConfig};
