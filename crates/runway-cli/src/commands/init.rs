use anyhow::Context;
use runway_core::CONFIG_FILE_NAME;
use std::path::Path;

const STARTER_CONFIG: &str = r#"[project]
# service = "makearjowork"
# region = "us-central1"
# gcp_project_id = "your-project-id"   # default: active gcloud project

[database]
# instance = "makearjowork-db"
# user = "appuser"
# name = "makearjowork"

[service]
# domain = "https://makearjowork.com"
# source = "."

[image]
# base_image = "python:3.11-slim"
# system_packages = ["gcc", "libpq-dev"]
# workers = 2
# timeout_secs = 120

[secrets]
# profile = "extended"   # or "base"

[secrets.bindings]
# EXTRA_KEY = "extra-key:latest"
"#;

/// Write a commented starter config to `--config PATH`, or `./runway.toml`.
pub async fn init_project(config_path: Option<&Path>) -> anyhow::Result<()> {
    let config_path = config_path.unwrap_or(Path::new(CONFIG_FILE_NAME));
    let shown = config_path.display();
    if config_path.exists() {
        println!("{shown} already exists, nothing to do.");
        return Ok(());
    }

    std::fs::write(config_path, STARTER_CONFIG)
        .with_context(|| format!("failed to write {shown}"))?;
    println!("Created {shown}");

    println!();
    println!("Next steps:");
    println!("  1. Write the Dockerfile:       runway eject");
    println!("  2. Create the secrets:         runway secret set secret-key=...");
    println!("  3. Check the setup:            runway doctor");
    println!("  4. Deploy:                     runway deploy [PROJECT] [REGION]");

    Ok(())
}
