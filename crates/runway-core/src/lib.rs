//! Core types and configuration for runway.
//!
//! This crate defines the `runway.toml` schema ([`RunwayConfig`]),
//! deployment target resolution ([`DeploymentTarget`]), the plain and
//! secret-backed environment of the deployed service ([`EnvVars`],
//! [`SecretBindings`]), and the assembled [`DeployPlan`].

pub mod bindings;
pub mod config;
pub mod error;
pub mod follow_up;
pub mod plan;
pub mod target;

pub use bindings::{BindingProfile, EnvVars, SecretBindings, SecretRef};
pub use config::{
    CONFIG_FILE_NAME, DatabaseConfig, FollowUpConfig, ImageConfig, ProjectConfig, RunwayConfig,
    SecretsConfig, ServiceConfig,
};
pub use error::{Error, Result};
pub use plan::DeployPlan;
pub use target::{CloudSqlInstance, DEFAULT_REGION, DeploymentTarget, TargetArgs};
