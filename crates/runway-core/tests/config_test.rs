use runway_core::{BindingProfile, RunwayConfig};
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn load_returns_defaults_when_no_config_file() {
    let tmp = TempDir::new().unwrap();
    let config = RunwayConfig::load(tmp.path()).unwrap();

    assert_eq!(config.project.service, "makearjowork");
    assert_eq!(config.project.region, "us-central1");
    assert!(config.project.gcp_project_id.is_none());
    assert_eq!(config.database.instance, "makearjowork-db");
    assert_eq!(config.database.user, "appuser");
    assert_eq!(config.database.name, "makearjowork");
    assert_eq!(config.service.domain, "https://makearjowork.com");
    assert_eq!(config.service.source, PathBuf::from("."));
    assert!(config.service.allow_unauthenticated);
    assert_eq!(config.image.base_image, "python:3.11-slim");
    assert_eq!(config.image.system_packages, vec!["gcc", "libpq-dev"]);
    assert_eq!(config.image.manifest, "requirements.txt");
    assert_eq!(config.image.app_module, "app:app");
    assert_eq!(config.image.workers, 2);
    assert_eq!(config.image.timeout_secs, 120);
    assert_eq!(config.image.port, 8080);
    assert!(config.image.env.is_empty());
    assert_eq!(config.secrets.profile, BindingProfile::Extended);
    assert!(config.secrets.bindings.is_empty());
    assert!(config.follow_up.notes.is_none());
}

#[test]
fn load_parses_full_config() {
    let tmp = TempDir::new().unwrap();
    let toml = r#"
[project]
service = "staging-app"
region = "europe-west1"
gcp_project_id = "my-gcp-project"

[database]
instance = "staging-db"
user = "stage"
name = "stagedb"

[service]
domain = "https://staging.example.com"
source = "app"
allow_unauthenticated = false

[image]
base_image = "python:3.12-slim"
system_packages = ["libpq-dev"]
manifest = "requirements/prod.txt"
app_module = "wsgi:application"
workers = 4
timeout_secs = 60
port = 9000

[image.env]
TZ = "UTC"

[secrets]
profile = "base"

[secrets.bindings]
STRIPE_KEY = "stripe-key:3"

[follow_up]
notes = ["Run migrations"]
"#;
    std::fs::write(tmp.path().join("runway.toml"), toml).unwrap();

    let config = RunwayConfig::load(tmp.path()).unwrap();

    assert_eq!(config.project.service, "staging-app");
    assert_eq!(config.project.region, "europe-west1");
    assert_eq!(
        config.project.gcp_project_id.as_deref(),
        Some("my-gcp-project")
    );
    assert_eq!(config.database.instance, "staging-db");
    assert_eq!(config.database.user, "stage");
    assert_eq!(config.database.name, "stagedb");
    assert_eq!(config.service.domain, "https://staging.example.com");
    assert_eq!(config.service.source, PathBuf::from("app"));
    assert!(!config.service.allow_unauthenticated);
    assert_eq!(config.image.base_image, "python:3.12-slim");
    assert_eq!(config.image.system_packages, vec!["libpq-dev"]);
    assert_eq!(config.image.manifest, "requirements/prod.txt");
    assert_eq!(config.image.app_module, "wsgi:application");
    assert_eq!(config.image.workers, 4);
    assert_eq!(config.image.timeout_secs, 60);
    assert_eq!(config.image.port, 9000);
    assert_eq!(config.image.env["TZ"], "UTC");
    assert_eq!(config.secrets.profile, BindingProfile::Base);
    assert_eq!(config.secrets.bindings["STRIPE_KEY"], "stripe-key:3");
    assert_eq!(
        config.follow_up.notes.as_deref(),
        Some(&["Run migrations".to_owned()][..])
    );
}

#[test]
fn load_partial_config_fills_defaults() {
    let tmp = TempDir::new().unwrap();
    let toml = r#"
[project]
gcp_project_id = "partial-project"
"#;
    std::fs::write(tmp.path().join("runway.toml"), toml).unwrap();

    let config = RunwayConfig::load(tmp.path()).unwrap();

    assert_eq!(
        config.project.gcp_project_id.as_deref(),
        Some("partial-project")
    );
    // Defaults preserved
    assert_eq!(config.project.region, "us-central1");
    assert_eq!(config.database.instance, "makearjowork-db");
    assert_eq!(config.image.workers, 2);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("runway.toml"), "not valid {{{{ toml").unwrap();

    let result = RunwayConfig::load(tmp.path());
    assert!(result.is_err());

    let err = result.unwrap_err().to_string();
    assert!(err.contains("parse"));
    assert!(err.contains("runway.toml"));
}

#[test]
fn load_unknown_profile_is_parse_error() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("runway.toml"),
        "[secrets]\nprofile = \"everything\"\n",
    )
    .unwrap();

    let result = RunwayConfig::load(tmp.path());
    assert!(matches!(
        result,
        Err(runway_core::Error::ConfigParse { .. })
    ));
}

#[test]
fn load_empty_config_returns_defaults() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("runway.toml"), "").unwrap();

    let config = RunwayConfig::load(tmp.path()).unwrap();
    assert_eq!(config.project.region, "us-central1");
}

#[test]
fn load_file_missing_is_error() {
    let tmp = TempDir::new().unwrap();
    let result = RunwayConfig::load_file(&tmp.path().join("elsewhere.toml"));

    assert!(matches!(
        result,
        Err(runway_core::Error::ConfigLoad { .. })
    ));
}

#[test]
fn load_file_explicit_path() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("prod.toml");
    std::fs::write(&path, "[project]\nregion = \"asia-northeast1\"\n").unwrap();

    let config = RunwayConfig::load_file(&path).unwrap();
    assert_eq!(config.project.region, "asia-northeast1");
}

#[test]
fn secret_bindings_keep_file_order() {
    let tmp = TempDir::new().unwrap();
    let toml = r#"
[secrets.bindings]
ZED = "zed"
ALPHA = "alpha"
MIDDLE = "middle:2"
"#;
    std::fs::write(tmp.path().join("runway.toml"), toml).unwrap();

    let config = RunwayConfig::load(tmp.path()).unwrap();
    let keys: Vec<&str> = config.secrets.bindings.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["ZED", "ALPHA", "MIDDLE"]);
}
