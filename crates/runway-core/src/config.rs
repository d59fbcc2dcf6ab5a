use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::bindings::BindingProfile;

/// File name looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "runway.toml";

/// runway.toml configuration
///
/// Every field has a default, and the defaults reproduce the single-tenant
/// deployment exactly, so an empty or missing file is a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunwayConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub image: ImageConfig,
    #[serde(default)]
    pub secrets: SecretsConfig,
    #[serde(default)]
    pub follow_up: FollowUpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Cloud Run service name
    #[serde(default = "default_service_name")]
    pub service: String,
    /// GCP region (defaults to us-central1)
    #[serde(default = "default_region")]
    pub region: String,
    /// GCP project ID (defaults to the active gcloud project)
    pub gcp_project_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Cloud SQL instance name, the last segment of the connection name
    #[serde(default = "default_instance")]
    pub instance: String,
    #[serde(default = "default_db_user")]
    pub user: String,
    #[serde(default = "default_db_name")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Public origin of the application, exported as `DOMAIN`
    #[serde(default = "default_domain")]
    pub domain: String,
    /// Application directory used as the build context
    #[serde(default = "default_source")]
    pub source: PathBuf,
    #[serde(default = "default_true")]
    pub allow_unauthenticated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Python runtime image
    #[serde(default = "default_base_image")]
    pub base_image: String,
    /// Native libraries installed via apt-get
    #[serde(default = "default_system_packages")]
    pub system_packages: Vec<String>,
    /// Dependency manifest installed with pip
    #[serde(default = "default_manifest")]
    pub manifest: String,
    /// WSGI application object, as `module:attribute`
    #[serde(default = "default_app_module")]
    pub app_module: String,
    #[serde(default = "default_workers")]
    pub workers: u32,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// Port the application server binds to
    #[serde(default = "default_port")]
    pub port: u16,
    /// Static environment variables baked into the image as ENV directives.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecretsConfig {
    /// Built-in binding set to start from
    #[serde(default)]
    pub profile: BindingProfile,
    /// Extra bindings appended after the profile, `ENV_VAR = "secret[:version]"`.
    #[serde(default)]
    pub bindings: IndexMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FollowUpConfig {
    /// Replaces the profile's printed follow-up notes when set.
    pub notes: Option<Vec<String>>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            service: default_service_name(),
            region: default_region(),
            gcp_project_id: None,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            instance: default_instance(),
            user: default_db_user(),
            name: default_db_name(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            source: default_source(),
            allow_unauthenticated: true,
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            base_image: default_base_image(),
            system_packages: default_system_packages(),
            manifest: default_manifest(),
            app_module: default_app_module(),
            workers: default_workers(),
            timeout_secs: default_timeout(),
            port: default_port(),
            env: BTreeMap::new(),
        }
    }
}

impl RunwayConfig {
    /// Load from runway.toml in the given directory, or return defaults if not found.
    pub fn load(dir: &Path) -> crate::Result<Self> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Self::load_file(&config_path)
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from an explicit path. Unlike [`RunwayConfig::load`], a missing
    /// file is an error.
    pub fn load_file(config_path: &Path) -> crate::Result<Self> {
        let content =
            std::fs::read_to_string(config_path).map_err(|e| crate::Error::ConfigLoad {
                path: config_path.to_path_buf(),
                source: e,
            })?;
        toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
            path: config_path.to_path_buf(),
            source: e,
        })
    }
}

fn default_service_name() -> String {
    "makearjowork".to_owned()
}

fn default_region() -> String {
    crate::target::DEFAULT_REGION.to_owned()
}

fn default_instance() -> String {
    "makearjowork-db".to_owned()
}

fn default_db_user() -> String {
    "appuser".to_owned()
}

fn default_db_name() -> String {
    "makearjowork".to_owned()
}

fn default_domain() -> String {
    "https://makearjowork.com".to_owned()
}

fn default_source() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

fn default_base_image() -> String {
    "python:3.11-slim".to_owned()
}

fn default_system_packages() -> Vec<String> {
    vec!["gcc".to_owned(), "libpq-dev".to_owned()]
}

fn default_manifest() -> String {
    "requirements.txt".to_owned()
}

fn default_app_module() -> String {
    "app:app".to_owned()
}

fn default_workers() -> u32 {
    2
}

fn default_timeout() -> u32 {
    120
}

fn default_port() -> u16 {
    8080
}
