mod deploy;
mod deploy_pipeline;
mod destroy;
mod doctor;
mod eject;
mod init;
mod logs;
mod plan;
mod secret;
mod status;

use runway_cloud::{GcloudClient, GcloudExecutor};
use runway_core::{DeploymentTarget, RunwayConfig, TargetArgs};
use std::path::Path;

pub use deploy::deploy;
pub use destroy::destroy;
pub use doctor::doctor;
pub use eject::eject;
pub use init::init_project;
pub use logs::logs;
pub use plan::plan;
pub use secret::{secret_check, secret_list, secret_set};
pub use status::status;

/// Load `--config` if given, otherwise `./runway.toml` or defaults.
pub(crate) fn load_config(path: Option<&Path>) -> anyhow::Result<RunwayConfig> {
    let config = match path {
        Some(path) => RunwayConfig::load_file(path)?,
        None => RunwayConfig::load(Path::new("."))?,
    };
    Ok(config)
}

/// Resolve the deployment target, asking gcloud for the active project
/// only when neither the arguments nor the config name one.
pub(crate) async fn resolve_target<E: GcloudExecutor>(
    client: &GcloudClient<E>,
    args: &TargetArgs,
    config: &RunwayConfig,
) -> anyhow::Result<DeploymentTarget> {
    let active = if args.needs_active_project(config) {
        client.active_project().await?
    } else {
        None
    };

    Ok(DeploymentTarget::resolve(args, config, active.as_deref())?)
}

/// Project ID for commands that need no region or service.
pub(crate) async fn resolve_project<E: GcloudExecutor>(
    client: &GcloudClient<E>,
    project: Option<String>,
    config: &RunwayConfig,
) -> anyhow::Result<String> {
    let target = resolve_target(client, &TargetArgs::new(project, None), config).await?;
    Ok(target.project_id)
}
