use runway_cloud::GcloudClient;
use runway_core::TargetArgs;
use std::io::Write;
use std::path::Path;

/// Delete the Cloud Run service. The Cloud SQL instance and secrets are kept.
pub async fn destroy(
    config_path: Option<&Path>,
    target: TargetArgs,
    skip_confirm: bool,
) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let client = GcloudClient::new();
    let target = super::resolve_target(&client, &target, &config).await?;

    if !skip_confirm {
        println!("This will delete:");
        println!(
            "  - Cloud Run service '{}' in {} ({})",
            target.service_name, target.region, target.project_id
        );
        println!("Cloud SQL instance {} and secrets are not touched.", target.instance);
        println!();
        print!("Are you sure? [y/N] ");
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !confirmed(&input) {
            println!("Aborted.");
            return Ok(());
        }
    }

    println!("Deleting Cloud Run service '{}'...", target.service_name);
    client
        .delete_service(&target.service_name, &target.project_id, &target.region)
        .await?;

    println!("Destroy complete.");
    Ok(())
}

fn confirmed(input: &str) -> bool {
    matches!(input.trim(), "y" | "Y" | "yes" | "YES")
}
