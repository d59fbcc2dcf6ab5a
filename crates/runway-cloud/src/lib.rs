pub mod client;
pub mod executor;
pub mod gcloud;

pub use client::{
    ApiCheck, CheckResult, DeployError, DoctorReport, GcloudClient, PreflightError,
    PreflightReport, REQUIRED_APIS, SecretError, deploy_args,
};
pub use executor::{GcloudExecutor, RealExecutor};
