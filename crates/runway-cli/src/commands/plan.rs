use runway_cloud::{GcloudClient, deploy_args};
use runway_core::{BindingProfile, DeployPlan, TargetArgs};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct PlanOutput<'a> {
    plan: &'a DeployPlan,
    command: Vec<String>,
}

/// Print the deploy invocation without executing it.
pub async fn plan(
    config_path: Option<&Path>,
    target: TargetArgs,
    source: Option<PathBuf>,
    profile: Option<BindingProfile>,
    json: bool,
) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let client = GcloudClient::new();

    let target = super::resolve_target(&client, &target, &config).await?;
    let plan = DeployPlan::new(target, &config, profile, source)?;

    let mut command = vec!["gcloud".to_owned()];
    command.extend(deploy_args(&plan)?);

    if json {
        let output = PlanOutput {
            plan: &plan,
            command,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Project:   {}", plan.target.project_id);
    println!("Region:    {}", plan.target.region);
    println!("Service:   {}", plan.target.service_name);
    println!("Cloud SQL: {}", plan.target.instance);
    println!("Profile:   {}", plan.profile);
    println!();
    println!("{}", display_command(&command));
    Ok(())
}

/// Render argv for copy-paste into a POSIX shell.
fn display_command(argv: &[String]) -> String {
    argv.iter()
        .map(|arg| quote(arg))
        .collect::<Vec<_>>()
        .join(" \\\n    ")
}

fn quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"-_./:=,@^%+".contains(&b));
    if plain {
        arg.to_owned()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}
