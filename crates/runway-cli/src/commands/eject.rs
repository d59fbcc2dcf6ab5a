use runway_build::dockerfile::DockerfileGenerator;
use std::path::{Path, PathBuf};

pub async fn eject(config_path: Option<&Path>, source: Option<PathBuf>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let source = source.unwrap_or_else(|| config.service.source.clone());

    let dockerfile = DockerfileGenerator::new(&config.image).render()?;
    runway_build::eject::eject(&source, &dockerfile)?;

    println!(
        "Ejected Dockerfile to {}",
        source.join(runway_build::context::DOCKERFILE).display()
    );
    println!("You can now edit it directly. runway deploy builds from this file.");
    Ok(())
}
