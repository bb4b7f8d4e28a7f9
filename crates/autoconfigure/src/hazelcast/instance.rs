//! Data grid members and clients, and the process-wide instance registry.

use bootkit_core::Resource;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// Member configuration. File contents are not interpreted; a config loaded
/// from a file only records where it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HazelcastConfig {
    pub instance_name: Option<String>,
    pub configuration_url: Option<String>,
    /// Class name of the managed context that injects into grid tasks.
    pub managed_context: Option<String>,
}

impl HazelcastConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(instance_name: impl Into<String>) -> Self {
        Self {
            instance_name: Some(instance_name.into()),
            ..Self::default()
        }
    }

    pub fn from_resource(resource: &Resource) -> Self {
        Self {
            configuration_url: Some(resource.url()),
            ..Self::default()
        }
    }

    fn name(&self) -> Option<&str> {
        self.instance_name.as_deref().filter(|n| !n.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HazelcastClientConfig {
    pub configuration_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceKind {
    Member(HazelcastConfig),
    Client(HazelcastClientConfig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HazelcastInstance {
    name: String,
    kind: InstanceKind,
}

impl HazelcastInstance {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &InstanceKind {
        &self.kind
    }

    pub fn is_client(&self) -> bool {
        matches!(self.kind, InstanceKind::Client(_))
    }

    /// Member configuration, `None` for clients.
    pub fn config(&self) -> Option<&HazelcastConfig> {
        match &self.kind {
            InstanceKind::Member(config) => Some(config),
            InstanceKind::Client(_) => None,
        }
    }

    pub fn client_config(&self) -> Option<&HazelcastClientConfig> {
        match &self.kind {
            InstanceKind::Client(config) => Some(config),
            InstanceKind::Member(_) => None,
        }
    }
}

/// Running instances by name.
#[derive(Debug, Default)]
pub struct HazelcastInstanceRegistry {
    instances: DashMap<String, Arc<HazelcastInstance>>,
    counter: AtomicUsize,
}

static GLOBAL_INSTANCES: Lazy<HazelcastInstanceRegistry> = Lazy::new(HazelcastInstanceRegistry::new);

impl HazelcastInstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global() -> &'static HazelcastInstanceRegistry {
        &GLOBAL_INSTANCES
    }

    pub fn get(&self, name: &str) -> Option<Arc<HazelcastInstance>> {
        self.instances.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// The running member named by `config`, or a new one. Configs without
    /// a name always start a new member under a generated name.
    pub fn get_or_create(&self, config: HazelcastConfig) -> Arc<HazelcastInstance> {
        match config.name().map(str::to_string) {
            Some(name) => {
                let entry = self.instances.entry(name.clone()).or_insert_with(|| {
                    debug!("Starting Hazelcast member '{}'", name);
                    Arc::new(HazelcastInstance {
                        name: name.clone(),
                        kind: InstanceKind::Member(config),
                    })
                });
                Arc::clone(entry.value())
            }
            None => {
                let name = self.generate_name("member");
                self.start(name, InstanceKind::Member(config))
            }
        }
    }

    pub fn new_client(&self, config: HazelcastClientConfig) -> Arc<HazelcastInstance> {
        let name = self.generate_name("client");
        self.start(name, InstanceKind::Client(config))
    }

    /// Remove the instance; returns whether it was running.
    pub fn shutdown(&self, name: &str) -> bool {
        self.instances.remove(name).is_some()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.instances.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    fn generate_name(&self, kind: &str) -> String {
        let id = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("hz-{}-{}", kind, id)
    }

    fn start(&self, name: String, kind: InstanceKind) -> Arc<HazelcastInstance> {
        debug!("Starting Hazelcast instance '{}'", name);
        let instance = Arc::new(HazelcastInstance {
            name: name.clone(),
            kind,
        });
        self.instances.insert(name, Arc::clone(&instance));
        instance
    }
}
