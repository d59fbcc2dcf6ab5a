use runway_cloud::GcloudClient;
use runway_core::TargetArgs;
use std::path::Path;

const DEFAULT_LOG_LIMIT: u32 = 100;

pub async fn logs(
    config_path: Option<&Path>,
    target: TargetArgs,
    follow: bool,
    tail: Option<u32>,
) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let client = GcloudClient::new();
    let target = super::resolve_target(&client, &target, &config).await?;

    if follow {
        client
            .tail_logs(&target.service_name, &target.project_id, &target.region)
            .await?;
    } else {
        client
            .read_logs(
                &target.service_name,
                &target.project_id,
                &target.region,
                tail.unwrap_or(DEFAULT_LOG_LIMIT),
            )
            .await?;
    }

    Ok(())
}
