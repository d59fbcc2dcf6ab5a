use std::path::Path;

use crate::context::DOCKERFILE;

/// Writes the rendered Dockerfile into the application directory.
///
/// Once written the file belongs to the user: `runway deploy` builds from
/// whatever Dockerfile is in the source directory.
pub fn eject(source_dir: &Path, dockerfile_content: &str) -> Result<(), EjectError> {
    if !source_dir.is_dir() {
        return Err(EjectError::MissingSource(source_dir.to_path_buf()));
    }

    let dockerfile_path = source_dir.join(DOCKERFILE);
    if is_ejected(source_dir) {
        return Err(EjectError::AlreadyEjected(dockerfile_path));
    }

    std::fs::write(&dockerfile_path, dockerfile_content).map_err(|e| EjectError::Write {
        path: dockerfile_path,
        source: e,
    })?;

    Ok(())
}

/// Check if the application directory already has a Dockerfile.
pub fn is_ejected(source_dir: &Path) -> bool {
    source_dir.join(DOCKERFILE).exists()
}

#[derive(Debug, thiserror::Error)]
pub enum EjectError {
    #[error("source directory {0} does not exist")]
    MissingSource(std::path::PathBuf),
    #[error("Dockerfile already exists at {0}; edit it directly or delete it to re-eject")]
    AlreadyEjected(std::path::PathBuf),
    #[error("failed to write {path}")]
    Write {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
}
