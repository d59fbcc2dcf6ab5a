use super::deploy_pipeline::{self, DeployOptions};
use runway_cloud::GcloudClient;
use runway_core::{BindingProfile, TargetArgs};
use std::path::{Path, PathBuf};

/// Execute the full deploy pipeline.
pub async fn deploy(
    config_path: Option<&Path>,
    target: TargetArgs,
    source: Option<PathBuf>,
    profile: Option<BindingProfile>,
) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let client = GcloudClient::new();
    let opts = DeployOptions {
        target,
        source,
        profile,
    };

    let mut stdout = std::io::stdout();
    let outcome = deploy_pipeline::run(&client, &config, &opts, &mut stdout).await?;

    tracing::debug!(
        url = %outcome.url,
        service = %outcome.plan.target.service_name,
        "deploy finished"
    );
    Ok(())
}
