use std::path::{Path, PathBuf};

use runway_core::ImageConfig;

/// Name of the image definition Cloud Build looks for in the context root.
pub const DOCKERFILE: &str = "Dockerfile";

/// Checks that `source_dir` can be handed to `gcloud run deploy --source`.
///
/// The directory must exist and contain both the dependency manifest and
/// a Dockerfile. Without a Dockerfile gcloud would fall back to buildpacks,
/// which install neither the native database libraries nor gunicorn's
/// launch command.
pub fn validate(source_dir: &Path, config: &ImageConfig) -> Result<(), ContextError> {
    if !source_dir.is_dir() {
        return Err(ContextError::NotADirectory(source_dir.to_path_buf()));
    }

    let manifest = source_dir.join(&config.manifest);
    if !manifest.is_file() {
        return Err(ContextError::MissingManifest(manifest));
    }

    let dockerfile = source_dir.join(DOCKERFILE);
    if !dockerfile.is_file() {
        return Err(ContextError::MissingDockerfile(dockerfile));
    }

    tracing::debug!(source = %source_dir.display(), "build context validated");
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("build context {0} is not a directory")]
    NotADirectory(PathBuf),
    #[error("dependency manifest not found at {0}")]
    MissingManifest(PathBuf),
    #[error("no Dockerfile at {0}; run `runway eject` to write one")]
    MissingDockerfile(PathBuf),
}
