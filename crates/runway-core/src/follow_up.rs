//! Manual steps printed after a successful deploy. Nothing here is executed.

use crate::bindings::BindingProfile;
use crate::config::RunwayConfig;
use crate::target::DeploymentTarget;

/// Notes for `profile`, or the `[follow_up].notes` override when configured.
pub fn notes(
    config: &RunwayConfig,
    profile: BindingProfile,
    target: &DeploymentTarget,
) -> Vec<String> {
    if let Some(custom) = &config.follow_up.notes {
        return custom.clone();
    }

    let mut notes = vec![dns_note(config, target)];

    match profile {
        BindingProfile::Base => {
            notes.push("Optional: create SMTP secrets for outgoing email:".to_owned());
            for secret in ["smtp-user", "smtp-pass"] {
                notes.push(format!(
                    "  echo -n 'VALUE' | gcloud secrets create {secret} --data-file=- --project {}",
                    target.project_id
                ));
            }
        }
        BindingProfile::Extended => {
            notes.push(
                "Tip: update a secret with `runway secret set NAME=VALUE`, then redeploy."
                    .to_owned(),
            );
        }
    }

    notes
}

fn dns_note(config: &RunwayConfig, target: &DeploymentTarget) -> String {
    let host = domain_host(&config.service.domain);
    format!(
        "Configure DNS: map {host} to the service with \
         `gcloud beta run domain-mappings create --service {} --domain {host} --region {}` \
         and add the records it prints at your DNS provider.",
        target.service_name, target.region
    )
}

/// Host part of an origin such as `https://example.com/`.
fn domain_host(domain: &str) -> &str {
    let rest = domain
        .split_once("://")
        .map_or(domain, |(_, rest)| rest);
    rest.split('/').next().unwrap_or(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_host_strips_scheme_and_path() {
        assert_eq!(domain_host("https://makearjowork.com"), "makearjowork.com");
        assert_eq!(domain_host("https://example.com/app/"), "example.com");
        assert_eq!(domain_host("example.org"), "example.org");
    }
}
