use bootkit_actuator::{HealthContributorRegistry, Status};
use bootkit_autoconfigure::rabbit::{CHANNEL_CLASS, RABBIT_TEMPLATE_CLASS, RabbitTemplate};
use bootkit_core::{ClassPath, Environment};
use bootkit_runtime::{build_default_context, default_auto_configurations, load_environment};
use std::fs;

#[test]
fn test_health_endpoint_runs_last() {
    let names: Vec<String> = default_auto_configurations()
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    assert_eq!(names.len(), 5);
    assert_eq!(names.last().map(String::as_str), Some("HealthEndpointAutoConfiguration"));
}

#[test]
fn test_empty_classpath_only_has_health() {
    let context = build_default_context(Environment::new(), ClassPath::new()).unwrap();
    let report = context.report();
    assert!(report.negative_matches().contains(&"RabbitAutoConfiguration"));
    assert!(report.negative_matches().contains(&"HazelcastAutoConfiguration"));

    let registry = context.bean::<HealthContributorRegistry>().unwrap();
    assert_eq!(registry.names(), vec!["ping"]);
    assert_eq!(registry.health().status, Status::UP);
}

#[test]
fn test_rabbit_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("application.json"),
        r#"{"bootkit-test": {"rabbitmq-host": "from-file"}, "spring": {"rabbitmq": {"template": {"exchange": "events"}}}}"#,
    )
    .unwrap();
    let environment = load_environment(Some(dir.path())).unwrap();
    assert_eq!(
        environment.get_property("bootkit-test.rabbitmq-host").as_deref(),
        Some("from-file")
    );

    let classpath = ClassPath::new().with_classes([RABBIT_TEMPLATE_CLASS, CHANNEL_CLASS]);
    let context = build_default_context(environment, classpath).unwrap();
    let template = context.bean::<RabbitTemplate>().unwrap();
    assert_eq!(template.exchange, "events");
}

#[test]
fn test_malformed_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("application.json"), "{ not json").unwrap();
    assert!(load_environment(Some(dir.path())).is_err());
}
