use proptest::prelude::*;
use runway_core::{
    BindingProfile, DeployPlan, DeploymentTarget, EnvVars, Error, RunwayConfig, SecretBindings,
    SecretRef, TargetArgs, follow_up,
};
use runway_core::bindings::validate_secret_name;

fn target(project: &str, region: &str, config: &RunwayConfig) -> DeploymentTarget {
    DeploymentTarget::resolve(
        &TargetArgs::new(Some(project.to_owned()), Some(region.to_owned())),
        config,
        None,
    )
    .unwrap()
}

// ── Plain env ──

#[test]
fn env_vars_are_the_fixed_five() {
    let config = RunwayConfig::default();
    let env = EnvVars::for_target(&target("acme-project", "europe-west1", &config), &config);

    let names: Vec<&str> = env.names().collect();
    assert_eq!(
        names,
        vec![
            "USE_CLOUD_SQL",
            "CLOUD_SQL_CONNECTION",
            "DB_USER",
            "DB_NAME",
            "DOMAIN"
        ]
    );
    assert_eq!(env.get("USE_CLOUD_SQL"), Some("true"));
    assert_eq!(
        env.get("CLOUD_SQL_CONNECTION"),
        Some("acme-project:europe-west1:makearjowork-db")
    );
    assert_eq!(env.get("DB_USER"), Some("appuser"));
    assert_eq!(env.get("DB_NAME"), Some("makearjowork"));
    assert_eq!(env.get("DOMAIN"), Some("https://makearjowork.com"));
}

#[test]
fn env_vars_render() {
    let config = RunwayConfig::default();
    let env = EnvVars::for_target(&target("p", "r", &config), &config);

    assert_eq!(
        env.render().unwrap(),
        "USE_CLOUD_SQL=true,CLOUD_SQL_CONNECTION=p:r:makearjowork-db,DB_USER=appuser,\
         DB_NAME=makearjowork,DOMAIN=https://makearjowork.com"
    );
}

#[test]
fn env_value_with_comma_switches_delimiter() {
    let mut config = RunwayConfig::default();
    config.database.name = "a,b".to_owned();
    let env = EnvVars::for_target(&target("p", "r", &config), &config);

    let rendered = env.render().unwrap();
    assert!(rendered.starts_with("^@^USE_CLOUD_SQL=true@"));
    assert!(rendered.contains("@DB_NAME=a,b@"));
}

// ── Secret bindings ──

#[test]
fn base_profile_has_two_bindings() {
    let set = SecretBindings::from_profile(BindingProfile::Base);

    assert_eq!(set.len(), 2);
    assert_eq!(set.render().unwrap(), "SECRET_KEY=secret-key:latest,DB_PASS=db-pass:latest");
}

#[test]
fn extended_profile_has_five_bindings() {
    let set = SecretBindings::from_profile(BindingProfile::Extended);

    assert_eq!(set.len(), 5);
    assert_eq!(
        set.render().unwrap(),
        "SECRET_KEY=secret-key:latest,DB_PASS=db-pass:latest,SMTP_USER=smtp-user:latest,\
         SMTP_PASS=smtp-pass:latest,GEMINI_API_KEY=gemini-api-key:latest"
    );
}

#[test]
fn extended_is_superset_of_base() {
    let base = SecretBindings::from_profile(BindingProfile::Base);
    let extended = SecretBindings::from_profile(BindingProfile::Extended);

    for (env, reference) in base.iter() {
        assert_eq!(extended.get(env), Some(reference));
    }
}

#[test]
fn config_bindings_append_after_profile() {
    let mut config = RunwayConfig::default();
    config
        .secrets
        .bindings
        .insert("STRIPE_KEY".to_owned(), "stripe-key:4".to_owned());

    let set = SecretBindings::from_config(&config, BindingProfile::Base).unwrap();

    assert_eq!(set.len(), 3);
    assert!(set.render().unwrap().ends_with(",STRIPE_KEY=stripe-key:4"));
}

#[test]
fn rebinding_replaces_in_place() {
    let mut config = RunwayConfig::default();
    config
        .secrets
        .bindings
        .insert("SECRET_KEY".to_owned(), "rotated-key".to_owned());

    let set = SecretBindings::from_config(&config, BindingProfile::Base).unwrap();

    assert_eq!(set.len(), 2);
    assert_eq!(
        set.render().unwrap(),
        "SECRET_KEY=rotated-key:latest,DB_PASS=db-pass:latest"
    );
}

#[test]
fn invalid_env_name_rejected() {
    let mut set = SecretBindings::default();
    let result = set.bind("1BAD", SecretRef::latest("ok").unwrap());
    assert!(matches!(result, Err(Error::InvalidBinding { .. })));

    let result = set.bind("HAS-DASH", SecretRef::latest("ok").unwrap());
    assert!(matches!(result, Err(Error::InvalidBinding { .. })));
}

#[test]
fn secret_ref_parsing() {
    let r: SecretRef = "secret-key".parse().unwrap();
    assert_eq!(r.to_string(), "secret-key:latest");

    let r: SecretRef = "db-pass:7".parse().unwrap();
    assert_eq!(r.version, "7");

    assert!("".parse::<SecretRef>().is_err());
    assert!("bad name".parse::<SecretRef>().is_err());
    assert!("name:0".parse::<SecretRef>().is_err());
    assert!("name:newest".parse::<SecretRef>().is_err());
}

#[test]
fn env_values_blocking_every_delimiter_are_rejected() {
    let mut config = RunwayConfig::default();
    config.service.domain = "https://a.com/?q=1,2@#|;~!".to_owned();
    let env = EnvVars::for_target(&target("p", "r", &config), &config);

    match env.render() {
        Err(Error::UnrepresentableList { names }) => assert_eq!(names, vec!["DOMAIN"]),
        other => panic!("expected UnrepresentableList, got {other:?}"),
    }
}

#[test]
fn secret_name_validation() {
    assert!(validate_secret_name("smtp-pass").is_ok());
    assert!(validate_secret_name("GEMINI_API_KEY").is_ok());
    assert!(validate_secret_name(&"a".repeat(255)).is_ok());

    for bad in ["", "bad name", "a/b", "key=value"] {
        assert!(
            matches!(validate_secret_name(bad), Err(Error::InvalidSecretRef { .. })),
            "{bad:?} accepted"
        );
    }
    assert!(validate_secret_name(&"a".repeat(256)).is_err());
}

#[test]
fn secret_names_are_distinct() {
    let mut set = SecretBindings::from_profile(BindingProfile::Base);
    set.bind("OLD_SECRET_KEY", SecretRef::latest("secret-key").unwrap())
        .unwrap();

    assert_eq!(set.secret_names(), vec!["secret-key", "db-pass"]);
}

#[test]
fn profile_from_str() {
    assert_eq!("base".parse::<BindingProfile>().unwrap(), BindingProfile::Base);
    assert_eq!(
        "extended".parse::<BindingProfile>().unwrap(),
        BindingProfile::Extended
    );
    assert!(matches!(
        "full".parse::<BindingProfile>(),
        Err(Error::UnknownProfile(_))
    ));
}

// ── Plan ──

#[test]
fn plan_domain_is_not_derived_from_target() {
    let config = RunwayConfig::default();
    let plan = DeployPlan::new(
        target("acme-project", "europe-west1", &config),
        &config,
        None,
        None,
    )
    .unwrap();

    assert_eq!(
        plan.target.instance.connection_name(),
        "acme-project:europe-west1:makearjowork-db"
    );
    assert_eq!(plan.env.get("DOMAIN"), Some("https://makearjowork.com"));
    assert_eq!(plan.profile, BindingProfile::Extended);
    assert_eq!(plan.secrets.len(), 5);
    assert_eq!(plan.port, 8080);
}

#[test]
fn plan_profile_and_source_overrides() {
    let config = RunwayConfig::default();
    let plan = DeployPlan::new(
        target("p", "r", &config),
        &config,
        Some(BindingProfile::Base),
        Some("webapp".into()),
    )
    .unwrap();

    assert_eq!(plan.secrets.len(), 2);
    assert_eq!(plan.source, std::path::PathBuf::from("webapp"));
}

#[test]
fn plan_serializes_to_json() {
    let config = RunwayConfig::default();
    let plan = DeployPlan::new(target("p", "r", &config), &config, None, None).unwrap();
    let json = serde_json::to_value(&plan).unwrap();

    assert_eq!(json["target"]["project_id"], "p");
    assert_eq!(json["profile"], "extended");
    assert_eq!(json["env"]["DOMAIN"], "https://makearjowork.com");
    assert_eq!(json["secrets"]["SECRET_KEY"]["secret"], "secret-key");
}

// ── Follow-up ──

#[test]
fn base_follow_up_lists_smtp_secret_commands() {
    let config = RunwayConfig::default();
    let t = target("acme", "us-central1", &config);
    let notes = follow_up::notes(&config, BindingProfile::Base, &t);

    assert!(notes[0].contains("makearjowork.com"));
    assert!(notes.iter().any(|n| n.contains("gcloud secrets create smtp-user")));
    assert!(notes.iter().any(|n| n.contains("gcloud secrets create smtp-pass")));
}

#[test]
fn extended_follow_up_is_trimmed() {
    let config = RunwayConfig::default();
    let t = target("acme", "us-central1", &config);
    let notes = follow_up::notes(&config, BindingProfile::Extended, &t);

    assert_eq!(notes.len(), 2);
    assert!(notes[1].starts_with("Tip:"));
    assert!(!notes.iter().any(|n| n.contains("secrets create")));
}

#[test]
fn follow_up_override() {
    let mut config = RunwayConfig::default();
    config.follow_up.notes = Some(vec!["Check the dashboard".to_owned()]);
    let t = target("acme", "us-central1", &config);

    let notes = follow_up::notes(&config, BindingProfile::Base, &t);
    assert_eq!(notes, vec!["Check the dashboard"]);
}

proptest! {
    #[test]
    fn env_set_is_always_five_entries(
        project in "[a-z][a-z0-9-]{4,20}",
        region in "[a-z]{2,6}-[a-z]{4,8}[0-9]",
        profile in prop_oneof![Just(BindingProfile::Base), Just(BindingProfile::Extended)],
    ) {
        let config = RunwayConfig::default();
        let plan = DeployPlan::new(target(&project, &region, &config), &config, Some(profile), None)
            .unwrap();

        prop_assert_eq!(plan.env.len(), 5);
        prop_assert_eq!(plan.env.get("DOMAIN"), Some("https://makearjowork.com"));
        prop_assert_eq!(plan.secrets.len(), profile.entries().len());
    }
}
