use bootkit_autoconfigure::{
    ApplicationContext, AutoConfiguration, CouchbaseHealthContributorAutoConfiguration,
    CouchbaseRepositoriesAutoConfiguration, HazelcastAutoConfiguration,
    HealthEndpointAutoConfiguration, RabbitAutoConfiguration,
};
use bootkit_core::{ClassPath, ConfigFileLoader, Environment, Result};
use std::path::Path;

/// Every built-in auto-configuration, in the order they are applied.
///
/// The health endpoint comes last so that it sees the indicators the
/// integrations contribute.
pub fn default_auto_configurations() -> Vec<Box<dyn AutoConfiguration>> {
    vec![
        Box::new(RabbitAutoConfiguration),
        Box::new(HazelcastAutoConfiguration),
        Box::new(CouchbaseHealthContributorAutoConfiguration),
        Box::new(CouchbaseRepositoriesAutoConfiguration),
        Box::new(HealthEndpointAutoConfiguration),
    ]
}

/// Bootstraps an application context with all built-in auto-configurations.
pub fn build_default_context(environment: Environment, classpath: ClassPath) -> Result<ApplicationContext> {
    ApplicationContext::builder()
        .environment(environment)
        .classpath(classpath)
        .with_configurations(default_auto_configurations())
        .build()
}

/// The process environment, with `application.json` and its profile
/// variants from `config_dir` layered underneath when given.
pub fn load_environment(config_dir: Option<&Path>) -> Result<Environment> {
    let mut environment = Environment::from_process();
    if let Some(dir) = config_dir {
        tracing::debug!("Loading configuration from {}", dir.display());
        ConfigFileLoader::new(dir).load_into(&mut environment)?;
    }
    Ok(environment)
}

/// Initializes the logging system for a specific component.
/// This delegates to the core logging module.
pub fn init_logging(component: &str, to_stderr: bool) -> Option<impl Drop> {
    Some(bootkit_core::logging::init_logging(component, to_stderr))
}
