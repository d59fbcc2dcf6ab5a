//! Environment of the deployed service.
//!
//! Two ordered maps are passed to `gcloud run deploy`:
//!
//! - [`EnvVars`]: plain values (`--set-env-vars`)
//! - [`SecretBindings`]: env var name → Secret Manager reference (`--set-secrets`)
//!
//! Both keep first-insertion order and let a later insert of the same
//! name replace the value in place, so the rendered flag is deterministic.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::RunwayConfig;
use crate::target::DeploymentTarget;

/// Version selector used when a reference names no version.
pub const LATEST: &str = "latest";

/// Delimiters tried, in order, when a value contains a comma.
/// gcloud accepts `^D^` as a prefix that switches the list separator to `D`.
const ALT_DELIMITERS: [char; 6] = ['@', '#', '|', ';', '~', '!'];

// ── Binding profiles ──

/// Built-in secret binding sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingProfile {
    /// Application secret key and database password.
    Base,
    /// `Base` plus SMTP credentials and the Gemini API key.
    #[default]
    Extended,
}

impl BindingProfile {
    /// `(env var, secret name)` pairs bound at `latest`.
    pub fn entries(self) -> &'static [(&'static str, &'static str)] {
        const BASE: &[(&str, &str)] = &[("SECRET_KEY", "secret-key"), ("DB_PASS", "db-pass")];
        const EXTENDED: &[(&str, &str)] = &[
            ("SECRET_KEY", "secret-key"),
            ("DB_PASS", "db-pass"),
            ("SMTP_USER", "smtp-user"),
            ("SMTP_PASS", "smtp-pass"),
            ("GEMINI_API_KEY", "gemini-api-key"),
        ];

        match self {
            Self::Base => BASE,
            Self::Extended => EXTENDED,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Extended => "extended",
        }
    }
}

impl fmt::Display for BindingProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BindingProfile {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base" => Ok(Self::Base),
            "extended" => Ok(Self::Extended),
            other => Err(crate::Error::UnknownProfile(other.to_owned())),
        }
    }
}

// ── Secret references ──

/// A versioned Secret Manager secret, rendered as `name:version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretRef {
    pub secret: String,
    pub version: String,
}

impl SecretRef {
    /// Reference to the `latest` version of `secret`.
    pub fn latest(secret: &str) -> crate::Result<Self> {
        validate_secret_name(secret)?;
        Ok(Self {
            secret: secret.to_owned(),
            version: LATEST.to_owned(),
        })
    }
}

impl fmt::Display for SecretRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.secret, self.version)
    }
}

impl FromStr for SecretRef {
    type Err = crate::Error;

    /// Parses `name` or `name:version`; version is `latest` or a positive integer.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (secret, version) = match s.split_once(':') {
            Some((name, version)) => (name, version),
            None => (s, LATEST),
        };

        validate_secret_name(secret)?;

        let version_ok = version == LATEST
            || (!version.is_empty()
                && version.bytes().all(|b| b.is_ascii_digit())
                && !version.starts_with('0'));
        if !version_ok {
            return Err(crate::Error::InvalidSecretRef {
                value: s.to_owned(),
                reason: "version must be `latest` or a positive integer",
            });
        }

        Ok(Self {
            secret: secret.to_owned(),
            version: version.to_owned(),
        })
    }
}

/// Checks `name` is a valid Secret Manager secret id.
pub fn validate_secret_name(name: &str) -> crate::Result<()> {
    if name.is_empty() || name.len() > 255 {
        return Err(crate::Error::InvalidSecretRef {
            value: name.to_owned(),
            reason: "secret name must be 1 to 255 characters",
        });
    }
    if !name
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        return Err(crate::Error::InvalidSecretRef {
            value: name.to_owned(),
            reason: "secret name may only contain letters, digits, `-` and `_`",
        });
    }
    Ok(())
}

/// Checks `name` is a portable environment variable name.
pub fn validate_env_name(name: &str) -> crate::Result<()> {
    let mut bytes = name.bytes();
    let Some(first) = bytes.next() else {
        return Err(crate::Error::InvalidBinding {
            name: name.to_owned(),
            reason: "name must not be empty",
        });
    };
    if !(first.is_ascii_alphabetic() || first == b'_') {
        return Err(crate::Error::InvalidBinding {
            name: name.to_owned(),
            reason: "name must start with a letter or `_`",
        });
    }
    if !bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_') {
        return Err(crate::Error::InvalidBinding {
            name: name.to_owned(),
            reason: "name may only contain letters, digits and `_`",
        });
    }
    Ok(())
}

// ── Secret binding set ──

/// Ordered env var → secret reference map passed as `--set-secrets`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SecretBindings(IndexMap<String, SecretRef>);

impl SecretBindings {
    /// The built-in set of `profile`.
    pub fn from_profile(profile: BindingProfile) -> Self {
        let map = profile
            .entries()
            .iter()
            .map(|(env, secret)| {
                (
                    (*env).to_owned(),
                    SecretRef {
                        secret: (*secret).to_owned(),
                        version: LATEST.to_owned(),
                    },
                )
            })
            .collect();
        Self(map)
    }

    /// The profile set followed by the extra bindings from `[secrets]`.
    pub fn from_config(config: &RunwayConfig, profile: BindingProfile) -> crate::Result<Self> {
        let mut set = Self::from_profile(profile);
        for (env, reference) in &config.secrets.bindings {
            set.bind(env, reference.parse()?)?;
        }
        Ok(set)
    }

    /// Bind `env` to `secret`. Re-binding a name replaces its reference.
    pub fn bind(&mut self, env: &str, secret: SecretRef) -> crate::Result<()> {
        validate_env_name(env)?;
        if let Some(previous) = self.0.insert(env.to_owned(), secret) {
            tracing::debug!(env, %previous, "secret binding replaced");
        }
        Ok(())
    }

    pub fn get(&self, env: &str) -> Option<&SecretRef> {
        self.0.get(env)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SecretRef)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Distinct secret names, in binding order.
    pub fn secret_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::with_capacity(self.0.len());
        for reference in self.0.values() {
            if !names.contains(&reference.secret.as_str()) {
                names.push(&reference.secret);
            }
        }
        names
    }

    /// `NAME=secret:version,...`
    pub fn render(&self) -> crate::Result<String> {
        render_pairs(self.0.iter().map(|(k, v)| format!("{k}={v}")))
    }
}

// ── Plain environment ──

/// Ordered env var → value map passed as `--set-env-vars`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnvVars(IndexMap<String, String>);

impl EnvVars {
    /// The five plain variables every deployment carries.
    ///
    /// `DOMAIN` comes from configuration only; it is not derived from the
    /// target project or region.
    pub fn for_target(target: &DeploymentTarget, config: &RunwayConfig) -> Self {
        let mut vars = IndexMap::with_capacity(5);
        vars.insert("USE_CLOUD_SQL".to_owned(), "true".to_owned());
        vars.insert(
            "CLOUD_SQL_CONNECTION".to_owned(),
            target.instance.connection_name(),
        );
        vars.insert("DB_USER".to_owned(), config.database.user.clone());
        vars.insert("DB_NAME".to_owned(), config.database.name.clone());
        vars.insert("DOMAIN".to_owned(), config.service.domain.clone());
        Self(vars)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `NAME=value,...`
    pub fn render(&self) -> crate::Result<String> {
        render_pairs(self.0.iter().map(|(k, v)| format!("{k}={v}")))
    }
}

/// Joins `KEY=VALUE` items with commas, switching to gcloud's alternate
/// delimiter syntax when an item itself contains a comma.
///
/// Fails when no alternate delimiter is free, since any choice would split
/// an item.
fn render_pairs(items: impl Iterator<Item = String>) -> crate::Result<String> {
    let items: Vec<String> = items.collect();
    if !items.iter().any(|item| item.contains(',')) {
        return Ok(items.join(","));
    }

    let delimiter = ALT_DELIMITERS
        .into_iter()
        .find(|d| !items.iter().any(|item| item.contains(*d)))
        .ok_or_else(|| crate::Error::UnrepresentableList {
            names: items
                .iter()
                .filter(|item| item.contains(','))
                .map(|item| item.split('=').next().unwrap_or(item).to_owned())
                .collect(),
        })?;
    let separator = delimiter.to_string();
    Ok(format!("^{delimiter}^{}", items.join(separator.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_plain_pairs() {
        let out = render_pairs(["A=1".to_owned(), "B=2".to_owned()].into_iter()).unwrap();
        assert_eq!(out, "A=1,B=2");
    }

    #[test]
    fn render_pairs_with_comma_uses_alt_delimiter() {
        let out = render_pairs(["A=1,2".to_owned(), "B=3".to_owned()].into_iter()).unwrap();
        assert_eq!(out, "^@^A=1,2@B=3");
    }

    #[test]
    fn render_pairs_skips_delimiters_in_use() {
        let out = render_pairs(["A=x@y,z".to_owned(), "B=3".to_owned()].into_iter()).unwrap();
        assert_eq!(out, "^#^A=x@y,z#B=3");
    }

    #[test]
    fn render_empty() {
        assert_eq!(render_pairs(std::iter::empty()).unwrap(), "");
    }

    #[test]
    fn render_pairs_fails_when_every_delimiter_is_taken() {
        let result = render_pairs(["A=1,@#|;~!".to_owned(), "B=2".to_owned()].into_iter());
        match result {
            Err(crate::Error::UnrepresentableList { names }) => assert_eq!(names, vec!["A"]),
            other => panic!("expected UnrepresentableList, got {other:?}"),
        }
    }

    #[test]
    fn delimiters_spread_across_items_still_block() {
        let result = render_pairs(
            ["A=1,@#".to_owned(), "B=|;".to_owned(), "C=~!".to_owned()].into_iter(),
        );
        assert!(matches!(
            result,
            Err(crate::Error::UnrepresentableList { .. })
        ));
    }
}
