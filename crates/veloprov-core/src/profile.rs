// ── Configuration profile resolution ──

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{CoreError, Step};
use crate::orchestrator::Orchestrator;

/// Outcome of [`resolve_or_create_profile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedProfile {
    pub id: i64,
    /// `true` when the profile did not exist and was created by this call.
    pub created: bool,
}

/// Find the enterprise's configuration profile named `name`, creating it
/// when absent.
///
/// Names match exactly; when several profiles share the name, the first
/// one listed wins. At most one create call is made.
pub async fn resolve_or_create_profile<O: Orchestrator>(
    orchestrator: &O,
    enterprise_id: i64,
    name: &str,
) -> Result<ResolvedProfile, CoreError> {
    if name.is_empty() {
        return Err(CoreError::ValidationFailed {
            message: "profile name cannot be empty".into(),
        });
    }

    let profiles = orchestrator
        .list_configuration_profiles(enterprise_id)
        .await
        .map_err(CoreError::call(Step::ListProfiles))?;

    let mut by_name: HashMap<&str, i64> = HashMap::with_capacity(profiles.len());
    for profile in &profiles {
        by_name.entry(profile.name.as_str()).or_insert(profile.id);
    }
    debug!(count = profiles.len(), "configuration profiles listed");

    if let Some(&id) = by_name.get(name) {
        info!(profile_id = id, name, "using existing configuration profile");
        return Ok(ResolvedProfile { id, created: false });
    }

    let created = orchestrator
        .create_configuration_profile(enterprise_id, name)
        .await
        .map_err(CoreError::call(Step::CreateProfile))?;
    info!(profile_id = created.id, name, "created configuration profile");

    Ok(ResolvedProfile {
        id: created.id,
        created: true,
    })
}
