use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    // ── Target resolution ──
    #[error(
        "no GCP project resolved; pass one as the first argument, set [project].gcp_project_id \
         in runway.toml, or run: gcloud config set project <id>"
    )]
    ProjectUnresolved,

    #[error("region must not be empty")]
    EmptyRegion,

    // ── Bindings ──
    #[error("invalid binding {name:?}: {reason}")]
    InvalidBinding { name: String, reason: &'static str },

    #[error("invalid secret reference {value:?}: {reason}")]
    InvalidSecretRef { value: String, reason: &'static str },

    #[error(
        "cannot pass {names:?} to gcloud: values contain a comma and every \
         alternate delimiter (@ # | ; ~ !)"
    )]
    UnrepresentableList { names: Vec<String> },

    #[error("unknown binding profile {0:?}; expected one of: base, extended")]
    UnknownProfile(String),
}
