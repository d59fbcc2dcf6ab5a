mod commands;

use clap::{Args, Parser, Subcommand};
use runway_core::{BindingProfile, TargetArgs};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "runway",
    about = "Deploy the makearjowork web app to Cloud Run with Cloud SQL"
)]
#[command(version)]
struct Cli {
    /// Path to runway.toml (default: ./runway.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Positional project/region overrides shared by service commands.
#[derive(Args)]
struct TargetOpts {
    /// GCP project ID (default: active gcloud project)
    project: Option<String>,
    /// Region (default: us-central1)
    region: Option<String>,
}

impl From<TargetOpts> for TargetArgs {
    fn from(opts: TargetOpts) -> Self {
        TargetArgs::new(opts.project, opts.region)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter runway.toml (or the --config path)
    Init,
    /// Build from source and deploy to Cloud Run
    Deploy {
        #[command(flatten)]
        target: TargetOpts,
        /// Application directory used as build context
        #[arg(long)]
        source: Option<PathBuf>,
        /// Secret binding set (base or extended)
        #[arg(long)]
        profile: Option<BindingProfile>,
    },
    /// Print the deploy command without running it
    Plan {
        #[command(flatten)]
        target: TargetOpts,
        #[arg(long)]
        source: Option<PathBuf>,
        #[arg(long)]
        profile: Option<BindingProfile>,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the Dockerfile into the application directory
    Eject {
        #[arg(long)]
        source: Option<PathBuf>,
    },
    /// Show Cloud Run service status
    Status {
        #[command(flatten)]
        target: TargetOpts,
    },
    /// Read Cloud Run logs
    Logs {
        #[command(flatten)]
        target: TargetOpts,
        /// Tail logs in real-time
        #[arg(long, short = 'f')]
        follow: bool,
        /// Number of log entries to show (default: 100)
        #[arg(long, short = 'n')]
        tail: Option<u32>,
    },
    /// Manage Secret Manager secrets
    Secret {
        #[command(subcommand)]
        action: SecretAction,
    },
    /// Check gcloud setup and readiness
    Doctor {
        /// GCP project ID (default: active gcloud project)
        project: Option<String>,
    },
    /// Delete the Cloud Run service
    Destroy {
        #[command(flatten)]
        target: TargetOpts,
        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum SecretAction {
    /// Create a secret or add a new version (NAME=VALUE)
    Set {
        /// Secret in NAME=VALUE format
        key_value: String,
        #[arg(long)]
        project: Option<String>,
    },
    /// List all secrets
    List {
        #[arg(long)]
        project: Option<String>,
    },
    /// Report bound secrets missing from Secret Manager
    Check {
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        profile: Option<BindingProfile>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Init => commands::init_project(config).await?,
        Commands::Deploy {
            target,
            source,
            profile,
        } => commands::deploy(config, target.into(), source, profile).await?,
        Commands::Plan {
            target,
            source,
            profile,
            json,
        } => commands::plan(config, target.into(), source, profile, json).await?,
        Commands::Eject { source } => commands::eject(config, source).await?,
        Commands::Status { target } => commands::status(config, target.into()).await?,
        Commands::Logs {
            target,
            follow,
            tail,
        } => commands::logs(config, target.into(), follow, tail).await?,
        Commands::Secret { action } => match action {
            SecretAction::Set { key_value, project } => {
                commands::secret_set(config, project, &key_value).await?
            }
            SecretAction::List { project } => commands::secret_list(config, project).await?,
            SecretAction::Check { project, profile } => {
                commands::secret_check(config, project, profile).await?
            }
        },
        Commands::Doctor { project } => commands::doctor(config, project).await?,
        Commands::Destroy { target, yes } => commands::destroy(config, target.into(), yes).await?,
    }

    Ok(())
}
