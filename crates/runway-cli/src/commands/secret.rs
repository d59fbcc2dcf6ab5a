use runway_cloud::GcloudClient;
use runway_core::bindings::validate_secret_name;
use runway_core::{BindingProfile, SecretBindings};
use secrecy::SecretString;
use std::path::Path;

pub async fn secret_set(
    config_path: Option<&Path>,
    project: Option<String>,
    key_value: &str,
) -> anyhow::Result<()> {
    let (key, value) = key_value
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("expected NAME=VALUE format"))?;

    validate_secret_name(key)?;
    let value = SecretString::from(value.to_owned());

    let config = super::load_config(config_path)?;
    let client = GcloudClient::new();
    let project_id = super::resolve_project(&client, project, &config).await?;

    client.set_secret(&project_id, key, &value).await?;

    println!("Secret '{key}' set successfully");
    Ok(())
}

pub async fn secret_list(config_path: Option<&Path>, project: Option<String>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let client = GcloudClient::new();
    let project_id = super::resolve_project(&client, project, &config).await?;

    let secrets = client.list_secrets(&project_id).await?;

    if secrets.is_empty() {
        println!("No secrets found");
    } else {
        for name in &secrets {
            println!("{name}");
        }
    }
    Ok(())
}

/// Fail when a secret the deployment binds does not exist yet.
pub async fn secret_check(
    config_path: Option<&Path>,
    project: Option<String>,
    profile: Option<BindingProfile>,
) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let profile = profile.unwrap_or(config.secrets.profile);
    let bindings = SecretBindings::from_config(&config, profile)?;

    let client = GcloudClient::new();
    let project_id = super::resolve_project(&client, project, &config).await?;
    let missing = client
        .missing_secrets(&project_id, &bindings.secret_names())
        .await?;

    for (env, reference) in bindings.iter() {
        let mark = if missing.contains(&reference.secret) {
            "MISSING"
        } else {
            "OK"
        };
        println!("{mark:<8} {env} -> {reference}");
    }

    if !missing.is_empty() {
        anyhow::bail!(
            "{} secret(s) missing in project {project_id}; create them with: runway secret set NAME=VALUE",
            missing.len()
        );
    }
    Ok(())
}
