use std::path::PathBuf;

use serde::Serialize;

use crate::bindings::{BindingProfile, EnvVars, SecretBindings};
use crate::config::RunwayConfig;
use crate::target::DeploymentTarget;

/// Everything one `gcloud run deploy --source` invocation needs.
///
/// Built once per run and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct DeployPlan {
    pub target: DeploymentTarget,
    /// Build context directory handed to Cloud Build.
    pub source: PathBuf,
    pub profile: BindingProfile,
    pub env: EnvVars,
    pub secrets: SecretBindings,
    pub allow_unauthenticated: bool,
    pub port: u16,
}

impl DeployPlan {
    /// Assemble the plan for `target`.
    ///
    /// `profile` and `source` override `[secrets].profile` and
    /// `[service].source` when given.
    pub fn new(
        target: DeploymentTarget,
        config: &RunwayConfig,
        profile: Option<BindingProfile>,
        source: Option<PathBuf>,
    ) -> crate::Result<Self> {
        let profile = profile.unwrap_or(config.secrets.profile);
        let env = EnvVars::for_target(&target, config);
        let secrets = SecretBindings::from_config(config, profile)?;

        Ok(Self {
            source: source.unwrap_or_else(|| config.service.source.clone()),
            profile,
            env,
            secrets,
            allow_unauthenticated: config.service.allow_unauthenticated,
            port: config.image.port,
            target,
        })
    }
}
