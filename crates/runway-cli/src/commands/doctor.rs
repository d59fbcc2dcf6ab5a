use runway_build::context;
use runway_cloud::{CheckResult, GcloudClient};
use runway_core::{CONFIG_FILE_NAME, TargetArgs};
use std::path::Path;

pub async fn doctor(config_path: Option<&Path>, project: Option<String>) -> anyhow::Result<()> {
    let config = super::load_config(config_path);
    let client = GcloudClient::new();

    let project_id = match &config {
        Ok(config) => super::resolve_target(&client, &TargetArgs::new(project, None), config)
            .await
            // arch-lint: allow(no-silent-result-drop) reason="doctor reports a missing project as a failed check"
            .ok()
            .map(|t| t.project_id),
        Err(_) => project,
    };

    let mut report = client.doctor(project_id.as_deref()).await;

    let config_file = config_path.unwrap_or(Path::new(CONFIG_FILE_NAME));
    report.config_file = match &config {
        Ok(_) if config_file.exists() => CheckResult::ok("Found"),
        Ok(_) => CheckResult::ok("Not found, using defaults"),
        Err(e) => CheckResult::fail(&format!("{e:#}")),
    };

    report.build_context = match &config {
        Ok(config) => match context::validate(&config.service.source, &config.image) {
            Ok(()) => CheckResult::ok(&format!("{} ready", config.service.source.display())),
            Err(e) => CheckResult::fail(&e.to_string()),
        },
        Err(_) => CheckResult::fail("config not loaded"),
    };

    println!();
    println!("{report}");

    if !report.all_passed() {
        anyhow::bail!("some checks failed; see above for details");
    }

    Ok(())
}
