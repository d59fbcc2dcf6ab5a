use crate::executor::{GcloudExecutor, RealExecutor};
use crate::gcloud::GcloudError;
use runway_core::DeployPlan;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// APIs `gcloud run deploy --source` with Cloud SQL and secrets depends on.
pub const REQUIRED_APIS: [(&str, &str); 5] = [
    ("Cloud Run", "run.googleapis.com"),
    ("Cloud Build", "cloudbuild.googleapis.com"),
    ("Artifact Registry", "artifactregistry.googleapis.com"),
    ("Cloud SQL Admin", "sqladmin.googleapis.com"),
    ("Secret Manager", "secretmanager.googleapis.com"),
];

/// GCP operations client, parameterized over the executor for testability.
pub struct GcloudClient<E: GcloudExecutor = RealExecutor> {
    executor: E,
}

impl GcloudClient<RealExecutor> {
    pub fn new() -> Self {
        Self {
            executor: RealExecutor,
        }
    }
}

impl Default for GcloudClient<RealExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: GcloudExecutor> GcloudClient<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    // ── Configuration ──

    /// The caller's active gcloud project, `None` when unset.
    pub async fn active_project(&self) -> Result<Option<String>, GcloudError> {
        let output = self
            .executor
            .exec(&args(["config", "get-value", "project"]))
            .await?;

        let project = output.trim();
        if project.is_empty() || project == "(unset)" {
            Ok(None)
        } else {
            Ok(Some(project.to_owned()))
        }
    }

    // ── Preflight ──

    pub async fn check_prerequisites(
        &self,
        project_id: &str,
    ) -> Result<PreflightReport, PreflightError> {
        let mut report = PreflightReport::default();

        // 1. gcloud CLI available
        let version = self
            .executor
            .exec(&args(["version"]))
            .await
            .map_err(|e| PreflightError::GcloudNotInstalled { source: e })?;
        report.gcloud_version = Some(sdk_version(&version).to_owned());

        // 2. Authenticated
        self.executor
            .exec(&args(["auth", "print-access-token", "--quiet"]))
            .await
            .map_err(|e| PreflightError::NotAuthenticated { source: e })?;
        report.authenticated = true;

        // 3. Project accessible
        let name = self
            .executor
            .exec(&args([
                "projects",
                "describe",
                project_id,
                "--format",
                "value(name)",
            ]))
            .await
            .map_err(|e| PreflightError::ProjectNotAccessible {
                project: project_id.to_owned(),
                source: e,
            })?;
        report.project_name = Some(name.trim().to_owned());

        // 4. Required APIs enabled. A failed query is not a disabled API.
        for (_, api) in &REQUIRED_APIS {
            let enabled = self
                .api_enabled(project_id, api)
                .await
                .map_err(|e| PreflightError::ApiQuery {
                    api: (*api).to_owned(),
                    source: e,
                })?;
            if !enabled {
                report.disabled_apis.push((*api).to_owned());
            }
        }

        Ok(report)
    }

    async fn api_enabled(&self, project_id: &str, api: &str) -> Result<bool, GcloudError> {
        let output = self
            .executor
            .exec(&args([
                "services",
                "list",
                "--project",
                project_id,
                "--filter",
                &format!("config.name={api}"),
                "--format",
                "value(config.name)",
            ]))
            .await?;
        Ok(!output.trim().is_empty())
    }

    // ── Doctor ──

    /// Run all diagnostic checks without early return.
    /// Returns a report with pass/fail for each check item.
    pub async fn doctor(&self, project_id: Option<&str>) -> DoctorReport {
        let mut report = DoctorReport::default();

        // 1. gcloud CLI
        match self.executor.exec(&args(["version"])).await {
            Ok(v) => report.gcloud = CheckResult::ok(sdk_version(&v)),
            Err(e) => report.gcloud = CheckResult::fail(&e.to_string()),
        }

        // 2. Active account
        match self
            .executor
            .exec(&args(["config", "get-value", "account"]))
            .await
        {
            Ok(a) if !a.trim().is_empty() && a.trim() != "(unset)" => {
                report.account = CheckResult::ok(a.trim())
            }
            _ => report.account = CheckResult::fail("no active account"),
        }

        // 3. Project
        let Some(pid) = project_id else {
            report.project =
                CheckResult::fail("no project; pass one or run: gcloud config set project <id>");
            return report;
        };

        match self
            .executor
            .exec(&args([
                "projects",
                "describe",
                pid,
                "--format",
                "value(name)",
            ]))
            .await
        {
            Ok(name) => {
                report.project = CheckResult::ok(&format!("{pid} ({name})", name = name.trim()))
            }
            Err(_) => {
                report.project = CheckResult::fail(&format!("{pid}: not accessible"));
                return report;
            }
        }

        // 4. Billing
        match self
            .executor
            .exec(&args([
                "billing",
                "projects",
                "describe",
                pid,
                "--format",
                "value(billingEnabled)",
            ]))
            .await
        {
            Ok(v) if v.trim().eq_ignore_ascii_case("true") => {
                report.billing = CheckResult::ok("Enabled");
            }
            _ => report.billing = CheckResult::fail("Billing not enabled"),
        }

        // 5. Required APIs
        for (label, api) in &REQUIRED_APIS {
            let result = match self.api_enabled(pid, api).await {
                Ok(true) => CheckResult::ok("Enabled"),
                Ok(false) => CheckResult::fail("Not enabled"),
                Err(e) => CheckResult::fail(&format!("query failed: {}", e.diagnostic())),
            };
            report.apis.push(ApiCheck {
                name: (*label).to_owned(),
                result,
            });
        }

        report
    }

    // ── Cloud Run Deploy ──

    /// Build from source with Cloud Build and roll out to Cloud Run.
    /// Build and deploy output is streamed to the terminal.
    pub async fn deploy_from_source(&self, plan: &DeployPlan) -> Result<(), DeployError> {
        let cmd = deploy_args(plan)?;

        tracing::info!(
            service = %plan.target.service_name,
            project = %plan.target.project_id,
            region = %plan.target.region,
            "deploying from source"
        );

        self.executor
            .exec_streaming(&cmd)
            .await
            .map_err(|e| DeployError::Deploy { source: e })
    }

    /// The public URL Cloud Run assigned to the service.
    pub async fn service_url(
        &self,
        service_name: &str,
        project_id: &str,
        region: &str,
    ) -> Result<String, DeployError> {
        let output = self
            .executor
            .exec(&args([
                "run",
                "services",
                "describe",
                service_name,
                "--project",
                project_id,
                "--region",
                region,
                "--format",
                "value(status.url)",
            ]))
            .await
            .map_err(|e| DeployError::Describe { source: e })?;

        let url = output.trim();
        if url.is_empty() {
            return Err(DeployError::NoServiceUrl(service_name.to_owned()));
        }
        Ok(url.to_owned())
    }

    pub async fn describe_service(
        &self,
        service_name: &str,
        project_id: &str,
        region: &str,
    ) -> Result<String, DeployError> {
        self.executor
            .exec(&args([
                "run",
                "services",
                "describe",
                service_name,
                "--project",
                project_id,
                "--region",
                region,
                "--format",
                "yaml(status)",
            ]))
            .await
            .map_err(|e| DeployError::Describe { source: e })
    }

    pub async fn delete_service(
        &self,
        service_name: &str,
        project_id: &str,
        region: &str,
    ) -> Result<(), DeployError> {
        self.executor
            .exec(&args([
                "run",
                "services",
                "delete",
                service_name,
                "--project",
                project_id,
                "--region",
                region,
                "--quiet",
            ]))
            .await
            .map_err(|e| DeployError::Delete { source: e })?;

        Ok(())
    }

    pub async fn read_logs(
        &self,
        service_name: &str,
        project_id: &str,
        region: &str,
        limit: u32,
    ) -> Result<(), DeployError> {
        let limit = limit.to_string();
        self.executor
            .exec_streaming(&args([
                "run",
                "services",
                "logs",
                "read",
                service_name,
                "--project",
                project_id,
                "--region",
                region,
                "--limit",
                &limit,
            ]))
            .await
            .map_err(|e| DeployError::Logs { source: e })
    }

    /// Stream new log entries until interrupted.
    pub async fn tail_logs(
        &self,
        service_name: &str,
        project_id: &str,
        region: &str,
    ) -> Result<(), DeployError> {
        self.executor
            .exec_streaming(&args([
                "beta",
                "run",
                "services",
                "logs",
                "tail",
                service_name,
                "--project",
                project_id,
                "--region",
                region,
            ]))
            .await
            .map_err(|e| DeployError::Logs { source: e })
    }

    // ── Secret Manager ──

    /// Create the secret if needed, then add `secret_value` as a new version.
    pub async fn set_secret(
        &self,
        project_id: &str,
        secret_name: &str,
        secret_value: &SecretString,
    ) -> Result<(), SecretError> {
        let secret_exists = self
            .executor
            .exec(&args([
                "secrets",
                "describe",
                secret_name,
                "--project",
                project_id,
            ]))
            .await
            .is_ok();

        if !secret_exists {
            self.executor
                .exec(&args([
                    "secrets",
                    "create",
                    secret_name,
                    "--project",
                    project_id,
                    "--replication-policy",
                    "automatic",
                ]))
                .await
                .map_err(|e| SecretError::Create { source: e })?;
        }

        self.executor
            .exec_with_stdin(
                &args([
                    "secrets",
                    "versions",
                    "add",
                    secret_name,
                    "--project",
                    project_id,
                    "--data-file",
                    "-",
                ]),
                secret_value.expose_secret().as_bytes(),
            )
            .await
            .map_err(|e| SecretError::AddVersion { source: e })?;

        Ok(())
    }

    /// Short names of all secrets in the project.
    pub async fn list_secrets(&self, project_id: &str) -> Result<Vec<String>, SecretError> {
        let output = self
            .executor
            .exec(&args([
                "secrets",
                "list",
                "--project",
                project_id,
                "--format",
                "value(name)",
            ]))
            .await
            .map_err(|e| SecretError::List { source: e })?;

        Ok(output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            // projects/<n>/secrets/<name> → <name>
            .map(|line| line.rsplit('/').next().unwrap_or(line).to_owned())
            .collect())
    }

    /// Names from `wanted` that do not exist in Secret Manager.
    pub async fn missing_secrets(
        &self,
        project_id: &str,
        wanted: &[&str],
    ) -> Result<Vec<String>, SecretError> {
        let existing = self.list_secrets(project_id).await?;
        Ok(wanted
            .iter()
            .filter(|name| !existing.iter().any(|e| e == *name))
            .map(|name| (*name).to_owned())
            .collect())
    }
}

/// The exact argv of the deploy step, without the leading `gcloud`.
pub fn deploy_args(plan: &DeployPlan) -> Result<Vec<String>, DeployError> {
    let target = &plan.target;
    let source = plan
        .source
        .to_str()
        .ok_or_else(|| DeployError::InvalidPath(plan.source.clone()))?;

    let mut cmd = args([
        "run",
        "deploy",
        &target.service_name,
        "--source",
        source,
        "--project",
        &target.project_id,
        "--region",
        &target.region,
        "--platform",
        "managed",
        "--port",
        &plan.port.to_string(),
    ]);

    cmd.push(if plan.allow_unauthenticated {
        "--allow-unauthenticated".to_owned()
    } else {
        "--no-allow-unauthenticated".to_owned()
    });

    cmd.push("--add-cloudsql-instances".to_owned());
    cmd.push(target.instance.connection_name());

    cmd.push("--set-env-vars".to_owned());
    cmd.push(
        plan.env
            .render()
            .map_err(|e| DeployError::Arguments { source: e })?,
    );

    if !plan.secrets.is_empty() {
        cmd.push("--set-secrets".to_owned());
        cmd.push(
            plan.secrets
                .render()
                .map_err(|e| DeployError::Arguments { source: e })?,
        );
    }

    cmd.push("--quiet".to_owned());
    Ok(cmd)
}

// ── Helper ──

/// Parse "Google Cloud SDK X.Y.Z" from the first line of `gcloud version`.
fn sdk_version(output: &str) -> &str {
    output
        .lines()
        .next()
        .and_then(|line| line.strip_prefix("Google Cloud SDK "))
        .unwrap_or(output)
        .trim()
}

fn args<const N: usize>(a: [&str; N]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}

// ── Preflight types ──

#[derive(Debug, Default)]
pub struct PreflightReport {
    pub gcloud_version: Option<String>,
    pub authenticated: bool,
    pub project_name: Option<String>,
    pub disabled_apis: Vec<String>,
}

impl PreflightReport {
    pub fn has_warnings(&self) -> bool {
        !self.disabled_apis.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PreflightError {
    #[error("gcloud CLI is not usable; see https://cloud.google.com/sdk/docs/install")]
    GcloudNotInstalled { source: GcloudError },

    #[error("not authenticated; run: gcloud auth login")]
    NotAuthenticated { source: GcloudError },

    #[error("GCP project '{project}' is not accessible; check project ID and permissions")]
    ProjectNotAccessible {
        project: String,
        source: GcloudError,
    },

    #[error("could not check whether {api} is enabled")]
    ApiQuery { api: String, source: GcloudError },
}

// ── Doctor types ──

#[derive(Debug, Default)]
pub struct DoctorReport {
    pub gcloud: CheckResult,
    pub account: CheckResult,
    pub project: CheckResult,
    pub billing: CheckResult,
    pub apis: Vec<ApiCheck>,
    pub config_file: CheckResult,
    pub build_context: CheckResult,
}

impl DoctorReport {
    pub fn all_passed(&self) -> bool {
        self.gcloud.passed
            && self.account.passed
            && self.project.passed
            && self.billing.passed
            && self.config_file.passed
            && self.build_context.passed
            && self.apis.iter().all(|a| a.result.passed)
    }
}

impl fmt::Display for DoctorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = [
            ("gcloud CLI", &self.gcloud),
            ("Account", &self.account),
            ("Project", &self.project),
            ("Billing", &self.billing),
            ("Config file", &self.config_file),
            ("Build context", &self.build_context),
        ];

        for (label, result) in rows {
            writeln!(f, "  {:<20} {}  {}", label, result.icon(), result.detail)?;
        }
        for api in &self.apis {
            writeln!(
                f,
                "  {:<20} {}  {}",
                api.name,
                api.result.icon(),
                api.result.detail
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct CheckResult {
    pub passed: bool,
    pub detail: String,
}

impl CheckResult {
    pub fn ok(detail: &str) -> Self {
        Self {
            passed: true,
            detail: detail.to_owned(),
        }
    }

    pub fn fail(detail: &str) -> Self {
        Self {
            passed: false,
            detail: detail.to_owned(),
        }
    }

    pub fn icon(&self) -> &'static str {
        if self.passed { "OK" } else { "NG" }
    }
}

#[derive(Debug, Clone)]
pub struct ApiCheck {
    pub name: String,
    pub result: CheckResult,
}

// ── Error types ──

#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("source path is not valid UTF-8: {0}")]
    InvalidPath(std::path::PathBuf),

    #[error("cannot build deploy arguments")]
    Arguments { source: runway_core::Error },

    #[error("cloud run deployment failed")]
    Deploy { source: GcloudError },

    #[error("failed to describe cloud run service")]
    Describe { source: GcloudError },

    #[error("service '{0}' reported no URL after deploy")]
    NoServiceUrl(String),

    #[error("failed to delete cloud run service")]
    Delete { source: GcloudError },

    #[error("failed to read service logs")]
    Logs { source: GcloudError },
}

#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("failed to create secret")]
    Create { source: GcloudError },

    #[error("failed to add secret version")]
    AddVersion { source: GcloudError },

    #[error("failed to list secrets")]
    List { source: GcloudError },
}
