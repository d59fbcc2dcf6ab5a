use std::fmt;

use serde::Serialize;

use crate::config::RunwayConfig;

/// Region used when neither the command line nor runway.toml names one.
pub const DEFAULT_REGION: &str = "us-central1";

/// Value `gcloud config get-value` prints for an unset property.
const GCLOUD_UNSET: &str = "(unset)";

/// Positional overrides from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetArgs {
    pub project: Option<String>,
    pub region: Option<String>,
}

impl TargetArgs {
    pub fn new(project: Option<String>, region: Option<String>) -> Self {
        Self { project, region }
    }

    /// Whether resolution has to fall back to the active gcloud project.
    pub fn needs_active_project(&self, config: &RunwayConfig) -> bool {
        explicit_project(self, config).is_none()
    }
}

/// `value` when it names a project: not blank and not gcloud's `(unset)`.
fn usable(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty() && trimmed != GCLOUD_UNSET).then_some(value)
}

/// Project from the positional argument or `[project].gcp_project_id`.
fn explicit_project<'a>(args: &'a TargetArgs, config: &'a RunwayConfig) -> Option<&'a str> {
    args.project
        .as_deref()
        .and_then(usable)
        .or_else(|| config.project.gcp_project_id.as_deref().and_then(usable))
}

/// Cloud SQL instance connection name, `project:region:instance`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloudSqlInstance {
    pub project: String,
    pub region: String,
    pub name: String,
}

impl CloudSqlInstance {
    pub fn connection_name(&self) -> String {
        format!("{}:{}:{}", self.project, self.region, self.name)
    }
}

impl fmt::Display for CloudSqlInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.project, self.region, self.name)
    }
}

/// The resolved (project, region, service, database instance) of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentTarget {
    pub project_id: String,
    pub region: String,
    pub service_name: String,
    pub instance: CloudSqlInstance,
}

impl DeploymentTarget {
    /// Resolve the target.
    ///
    /// Project: positional arg, then `[project].gcp_project_id`, then
    /// `active_project` (the caller's gcloud configuration). A blank or
    /// `(unset)` value at any level falls through to the next.
    /// Region: positional arg, then `[project].region`.
    /// Positional values are used verbatim.
    pub fn resolve(
        args: &TargetArgs,
        config: &RunwayConfig,
        active_project: Option<&str>,
    ) -> crate::Result<Self> {
        let project_id = explicit_project(args, config)
            .or_else(|| active_project.map(str::trim).and_then(usable))
            .ok_or(crate::Error::ProjectUnresolved)?
            .to_owned();

        let region = args
            .region
            .clone()
            .unwrap_or_else(|| config.project.region.clone());
        if region.trim().is_empty() {
            return Err(crate::Error::EmptyRegion);
        }

        let instance = CloudSqlInstance {
            project: project_id.clone(),
            region: region.clone(),
            name: config.database.instance.clone(),
        };

        tracing::debug!(
            project = %project_id,
            region = %region,
            instance = %instance,
            "deployment target resolved"
        );

        Ok(Self {
            project_id,
            region,
            service_name: config.project.service.clone(),
            instance,
        })
    }
}
