//! In-memory data grid auto-configuration.
//!
//! A client is configured when the client library is present and a client
//! configuration can be found. Otherwise a member is started, from (first
//! match wins) a user [`HazelcastConfig`] bean, `spring.hazelcast.config`,
//! the `hazelcast.config` property, a default `hazelcast.{xml,yaml,yml}`
//! resource, or the built-in defaults.

mod instance;

pub use instance::{
    HazelcastClientConfig, HazelcastConfig, HazelcastInstance, HazelcastInstanceRegistry,
    InstanceKind,
};

use crate::condition::{Condition, ConditionOutcome, CustomCondition};
use crate::context::{AutoConfiguration, ConfigurationContext};
use bootkit_core::{BeanOptions, BootError, Environment, Resource, ResourceLoader, Result};
use std::sync::Arc;
use tracing::debug;

pub const HAZELCAST_INSTANCE_CLASS: &str = "com.hazelcast.core.HazelcastInstance";
pub const HAZELCAST_CLIENT_CLASS: &str = "com.hazelcast.client.HazelcastClient";
pub const SPRING_MANAGED_CONTEXT_CLASS: &str = "com.hazelcast.spring.context.SpringManagedContext";

pub const CONFIG_PROPERTY: &str = "spring.hazelcast.config";
pub const CONFIG_SYSTEM_PROPERTY: &str = "hazelcast.config";
pub const CLIENT_CONFIG_SYSTEM_PROPERTY: &str = "hazelcast.client.config";

const SERVER_DEFAULT_LOCATIONS: [&str; 3] = [
    "classpath:hazelcast.xml",
    "classpath:hazelcast.yaml",
    "classpath:hazelcast.yml",
];
const CLIENT_DEFAULT_LOCATIONS: [&str; 3] = [
    "classpath:hazelcast-client.xml",
    "classpath:hazelcast-client.yaml",
    "classpath:hazelcast-client.yml",
];

/// Adjusts an auto-configured member config. Runs in bean order after the
/// config has been loaded.
pub trait HazelcastConfigCustomizer: Send + Sync {
    fn customize(&self, config: &mut HazelcastConfig);
}

/// Installs the Spring-managed context so grid tasks can be injected.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpringManagedContextCustomizer;

impl HazelcastConfigCustomizer for SpringManagedContextCustomizer {
    fn customize(&self, config: &mut HazelcastConfig) {
        config.managed_context = Some(SPRING_MANAGED_CONTEXT_CLASS.to_string());
    }
}

/// `spring.hazelcast.*` settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HazelcastProperties {
    pub config: Option<String>,
}

impl HazelcastProperties {
    pub fn bind(env: &Environment) -> Self {
        Self {
            config: env.get_property(CONFIG_PROPERTY).filter(|c| !c.trim().is_empty()),
        }
    }

    /// The configured location, which must exist when set.
    pub fn resolve_config_location(&self, loader: &ResourceLoader) -> Result<Option<Resource>> {
        match &self.config {
            None => Ok(None),
            Some(location) => resolve_required(loader, CONFIG_PROPERTY, location).map(Some),
        }
    }
}

fn resolve_required(loader: &ResourceLoader, key: &str, location: &str) -> Result<Resource> {
    loader.resolve(location).ok_or_else(|| {
        BootError::property(
            key,
            format!("Hazelcast configuration does not exist '{}'", location),
        )
    })
}

fn is_client_config(resource: &Resource) -> bool {
    std::fs::read_to_string(&resource.path)
        .map(|content| content.contains("hazelcast-client"))
        .unwrap_or(false)
}

fn client_config_location(env: &Environment, loader: &ResourceLoader) -> Option<Resource> {
    if let Some(location) = HazelcastProperties::bind(env).config {
        return loader.resolve(&location).filter(is_client_config);
    }
    if let Some(location) = env.get_property(CLIENT_CONFIG_SYSTEM_PROPERTY) {
        return loader.resolve(&location);
    }
    CLIENT_DEFAULT_LOCATIONS
        .iter()
        .find_map(|location| loader.resolve(location))
}

fn client_config_available() -> Condition {
    Condition::Custom(CustomCondition::new("HazelcastClientConfigAvailable", |ctx| {
        let loader = ctx.classpath.resource_loader();
        match client_config_location(ctx.environment, &loader) {
            Some(resource) => {
                ConditionOutcome::matched(format!("found client configuration {}", resource.location))
            }
            None => ConditionOutcome::no_match("did not find a Hazelcast client configuration"),
        }
    }))
}

fn server_config_location(env: &Environment, loader: &ResourceLoader) -> Result<Option<Resource>> {
    if let Some(resource) = HazelcastProperties::bind(env).resolve_config_location(loader)? {
        return Ok(Some(resource));
    }
    if let Some(location) = env.get_property(CONFIG_SYSTEM_PROPERTY) {
        return resolve_required(loader, CONFIG_SYSTEM_PROPERTY, &location).map(Some);
    }
    Ok(SERVER_DEFAULT_LOCATIONS
        .iter()
        .find_map(|location| loader.resolve(location)))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HazelcastAutoConfiguration;

impl AutoConfiguration for HazelcastAutoConfiguration {
    fn name(&self) -> &str {
        "HazelcastAutoConfiguration"
    }

    fn conditions(&self) -> Vec<Condition> {
        vec![
            Condition::on_class(HAZELCAST_INSTANCE_CLASS),
            Condition::on_missing_bean::<HazelcastInstance>(),
        ]
    }

    fn configure(&self, context: &mut ConfigurationContext<'_>) -> Result<()> {
        context.bean_with(
            "springManagedContextHazelcastConfigCustomizer",
            vec![Condition::on_class(SPRING_MANAGED_CONTEXT_CLASS)],
            BeanOptions::ordered(0),
            |_| Ok(Arc::new(SpringManagedContextCustomizer) as Arc<dyn HazelcastConfigCustomizer>),
        )?;

        context.nested("HazelcastClientConfiguration").bean_arc(
            "hazelcastInstance",
            vec![
                Condition::on_class(HAZELCAST_CLIENT_CLASS),
                client_config_available(),
            ],
            |ctx| {
                let loader = ctx.resource_loader();
                let resource = client_config_location(ctx.environment(), &loader).ok_or_else(|| {
                    BootError::Internal("Hazelcast client configuration disappeared".to_string())
                })?;
                debug!("Configuring Hazelcast client from {}", resource.location);
                Ok(HazelcastInstanceRegistry::global().new_client(HazelcastClientConfig {
                    configuration_url: resource.url(),
                }))
            },
        )?;

        context.nested("HazelcastServerConfiguration").bean_arc(
            "hazelcastInstance",
            vec![Condition::on_missing_bean::<HazelcastInstance>()],
            |ctx| {
                let registry = HazelcastInstanceRegistry::global();
                if let Some(config) = ctx.beans().single_candidate::<HazelcastConfig>() {
                    debug!("Using the application's Hazelcast config");
                    return Ok(registry.get_or_create((*config).clone()));
                }

                let loader = ctx.resource_loader();
                let mut config = match server_config_location(ctx.environment(), &loader)? {
                    Some(resource) => {
                        debug!("Configuring Hazelcast member from {}", resource.location);
                        HazelcastConfig::from_resource(&resource)
                    }
                    None => HazelcastConfig::default(),
                };
                for customizer in ctx
                    .beans()
                    .ordered_stream::<Arc<dyn HazelcastConfigCustomizer>>()
                {
                    customizer.customize(&mut config);
                }
                Ok(registry.get_or_create(config))
            },
        )?;
        Ok(())
    }
}
