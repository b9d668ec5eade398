//! Deployment lookup
//!
//! Maps a model name (e.g. `gpt-4o`) to the URL of a running deployment by
//! querying `GET {base}/lm/deployments`.

use serde::Deserialize;

/// Response of `GET /lm/deployments`
#[derive(Debug, Deserialize)]
pub struct DeploymentList {
    #[serde(default)]
    pub resources: Vec<Deployment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub id: String,
    #[serde(default)]
    pub deployment_url: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub details: Option<DeploymentDetails>,
}

#[derive(Debug, Deserialize)]
pub struct DeploymentDetails {
    #[serde(default)]
    pub resources: Option<DeploymentResources>,
}

#[derive(Debug, Deserialize)]
pub struct DeploymentResources {
    #[serde(default)]
    pub backend_details: Option<BackendDetails>,
}

#[derive(Debug, Deserialize)]
pub struct BackendDetails {
    #[serde(default)]
    pub model: Option<BackendModel>,
}

#[derive(Debug, Deserialize)]
pub struct BackendModel {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}

impl Deployment {
    /// Name of the foundation model served by this deployment
    pub fn model_name(&self) -> Option<&str> {
        self.details
            .as_ref()?
            .resources
            .as_ref()?
            .backend_details
            .as_ref()?
            .model
            .as_ref()
            .map(|m| m.name.as_str())
    }

    fn is_running(&self) -> bool {
        self.status
            .as_deref()
            .map_or(true, |s| s.eq_ignore_ascii_case("RUNNING"))
    }
}

impl DeploymentList {
    /// First running deployment serving `model` that exposes a URL
    pub fn find(&self, model: &str) -> Option<&Deployment> {
        self.resources.iter().find(|d| {
            d.is_running() && !d.deployment_url.is_empty() && d.model_name() == Some(model)
        })
    }
}
