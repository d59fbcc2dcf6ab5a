use std::io;

/// Program name resolved on `PATH` for every invocation.
pub const GCLOUD: &str = "gcloud";

/// Failure of a single gcloud invocation.
#[derive(Debug, thiserror::Error)]
pub enum GcloudError {
    #[error("gcloud CLI not found on PATH; install: https://cloud.google.com/sdk/docs/install")]
    NotFound { source: io::Error },

    /// Non-zero exit. `stderr` is gcloud's own diagnostic text, trimmed.
    #[error("`gcloud {}` failed:\n{stderr}", .args.join(" "))]
    CommandFailed { args: Vec<String>, stderr: String },

    #[error("gcloud output was not valid UTF-8")]
    InvalidUtf8 { source: std::string::FromUtf8Error },

    #[error("I/O error while talking to gcloud")]
    Io { source: io::Error },
}

impl GcloudError {
    /// Map a spawn failure: a missing binary is reported as [`GcloudError::NotFound`].
    pub(crate) fn spawn(source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound { source }
        } else {
            Self::Io { source }
        }
    }

    /// The text worth showing a user: gcloud's stderr for a failed command,
    /// the error message otherwise.
    pub fn diagnostic(&self) -> String {
        match self {
            Self::CommandFailed { stderr, .. } => stderr.clone(),
            other => other.to_string(),
        }
    }
}
