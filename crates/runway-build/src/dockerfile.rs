use runway_core::ImageConfig;
use runway_core::bindings::validate_env_name;

/// Renders the Dockerfile for a Python web application served by gunicorn.
pub struct DockerfileGenerator<'a> {
    config: &'a ImageConfig,
}

impl<'a> DockerfileGenerator<'a> {
    pub fn new(config: &'a ImageConfig) -> Self {
        Self { config }
    }

    /// Render the Dockerfile.
    ///
    /// `[image.env]` keys must be plain environment variable names and values
    /// must fit on one line, so neither can start a new directive.
    pub fn render(&self) -> runway_core::Result<String> {
        let system_packages = if self.config.system_packages.is_empty() {
            String::new()
        } else {
            format!(
                "RUN apt-get update \\\n    && apt-get install -y --no-install-recommends {} \\\n    && rm -rf /var/lib/apt/lists/*\n\n",
                self.config.system_packages.join(" ")
            )
        };

        let mut env_lines = String::new();
        for (k, v) in &self.config.env {
            validate_env_name(k)?;
            if v.contains(['\n', '\r']) {
                return Err(runway_core::Error::InvalidBinding {
                    name: k.clone(),
                    reason: "image env value must not contain a line break",
                });
            }
            env_lines.push_str(&format!("ENV {k}=\"{}\"\n", escape_env_value(v)));
        }

        Ok(format!(
            r#"FROM {base}

ENV PYTHONDONTWRITEBYTECODE=1
ENV PYTHONUNBUFFERED=1
{env_lines}
WORKDIR /app

{system_packages}COPY {manifest} .
RUN pip install --no-cache-dir -r {manifest}

COPY . .

EXPOSE {port}

CMD exec gunicorn --bind 0.0.0.0:{port} --workers {workers} --timeout {timeout} {app}
"#,
            base = self.config.base_image,
            manifest = self.config.manifest,
            port = self.config.port,
            workers = self.config.workers,
            timeout = self.config.timeout_secs,
            app = self.config.app_module,
        ))
    }
}

fn escape_env_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
