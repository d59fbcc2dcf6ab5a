use runway_cloud::GcloudClient;
use runway_core::TargetArgs;
use std::path::Path;

pub async fn status(config_path: Option<&Path>, target: TargetArgs) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let client = GcloudClient::new();
    let target = super::resolve_target(&client, &target, &config).await?;

    let output = client
        .describe_service(&target.service_name, &target.project_id, &target.region)
        .await?;

    println!("{output}");
    Ok(())
}
