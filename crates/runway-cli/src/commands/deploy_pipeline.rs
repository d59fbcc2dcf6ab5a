use runway_build::context;
use runway_cloud::{GcloudClient, GcloudExecutor};
use runway_core::{BindingProfile, DeployPlan, RunwayConfig, TargetArgs, follow_up};
use std::io::Write;
use std::path::PathBuf;

/// Command-line inputs of one deploy run.
#[derive(Debug, Default)]
pub(crate) struct DeployOptions {
    pub target: TargetArgs,
    pub source: Option<PathBuf>,
    pub profile: Option<BindingProfile>,
}

/// Result of a successful deploy pipeline run.
#[derive(Debug)]
pub(crate) struct DeployOutcome {
    pub url: String,
    pub plan: DeployPlan,
}

/// Run the deploy pipeline: target → context → preflight → deploy → report.
///
/// Every step must succeed before the next starts; the first failure is
/// returned as-is and nothing after it runs, so the completion banner and
/// URL are only written on success.
pub(crate) async fn run<E: GcloudExecutor>(
    client: &GcloudClient<E>,
    config: &RunwayConfig,
    opts: &DeployOptions,
    out: &mut dyn Write,
) -> anyhow::Result<DeployOutcome> {
    // Target
    writeln!(out, "=== Resolving deployment target ===")?;
    let target = super::resolve_target(client, &opts.target, config).await?;
    writeln!(out, "Project:   {}", target.project_id)?;
    writeln!(out, "Region:    {}", target.region)?;
    writeln!(out, "Service:   {}", target.service_name)?;
    writeln!(out, "Cloud SQL: {}", target.instance)?;

    let plan = DeployPlan::new(target, config, opts.profile, opts.source.clone())?;

    // Build context
    writeln!(out, "=== Checking build context ===")?;
    context::validate(&plan.source, &config.image)?;
    writeln!(out, "Source:    {}", plan.source.display())?;

    // Pre-flight checks
    writeln!(out, "=== Running pre-flight checks ===")?;
    let project_id = plan.target.project_id.as_str();
    let report = client.check_prerequisites(project_id).await?;
    if report.has_warnings() {
        let disabled = report.disabled_apis.join(", ");
        anyhow::bail!(
            "required APIs not enabled: {disabled}. \
             Enable them with: gcloud services enable <api> --project {project_id}"
        );
    }

    // Build + deploy
    writeln!(
        out,
        "=== Deploying {} to Cloud Run ({}) ===",
        plan.target.service_name, plan.target.region
    )?;
    writeln!(
        out,
        "Secrets:   {} binding(s), profile {}",
        plan.secrets.len(),
        plan.profile
    )?;
    out.flush()?;
    client.deploy_from_source(&plan).await?;

    // Report
    let target = &plan.target;
    let url = client
        .service_url(&target.service_name, &target.project_id, &target.region)
        .await?;
    tracing::info!(%url, "deployment complete");

    writeln!(out)?;
    writeln!(out, "=== Deployment complete ===")?;
    writeln!(out, "Service URL: {url}")?;
    writeln!(out)?;
    writeln!(out, "=== Next steps ===")?;
    for note in follow_up::notes(config, plan.profile, target) {
        writeln!(out, "{note}")?;
    }

    Ok(DeployOutcome { url, plan })
}
