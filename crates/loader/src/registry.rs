//! Name → layout factory mapping.
//!
//! Names are case-insensitive and registering a name again replaces the
//! previous factory. There is no removal. The process-wide registry is
//! created on first use, seeded with the four built-in layouts.

use crate::layouts::{Expanded, Jar, NoneLayout, War};
use bootkit_api::{BoxError, Layout, LayoutError, LayoutResult};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Zero-argument constructor for a layout.
pub type LayoutFactory = Arc<dyn Fn() -> Result<Box<dyn Layout>, BoxError> + Send + Sync>;

pub const JAR: &str = "JAR";
pub const WAR: &str = "WAR";
pub const NONE: &str = "NONE";
pub const EXPANDED: &str = "EXPANDED";

pub struct LayoutRegistry {
    factories: RwLock<HashMap<String, LayoutFactory>>,
}

impl LayoutRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            factories: RwLock::new(HashMap::new()),
        }
    }

    /// A registry holding `JAR`, `WAR`, `NONE` and `EXPANDED`.
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register_type::<Jar>(JAR);
        registry.register_type::<War>(WAR);
        registry.register_type::<NoneLayout>(NONE);
        registry.register_type::<Expanded>(EXPANDED);
        registry
    }

    /// Map `name` to `factory`, replacing any previous mapping.
    ///
    /// The factory is not called here; a factory that cannot build its
    /// layout fails later, at resolution time.
    pub fn register<F>(&self, name: &str, factory: F)
    where
        F: Fn() -> Result<Box<dyn Layout>, BoxError> + Send + Sync + 'static,
    {
        let key = normalize(name);
        let mut factories = self.factories.write().unwrap_or_else(PoisonError::into_inner);
        if factories.insert(key.clone(), Arc::new(factory)).is_some() {
            debug!("Replaced layout registration for {}", key);
        } else {
            debug!("Registered layout {}", key);
        }
    }

    /// Register a layout type built with `Default`.
    pub fn register_type<L>(&self, name: &str)
    where
        L: Layout + Default + 'static,
    {
        self.register(name, || Ok(Box::new(L::default()) as Box<dyn Layout>));
    }

    /// Build a fresh layout for `name`.
    pub fn resolve_by_name(&self, name: &str) -> LayoutResult<Box<dyn Layout>> {
        let key = normalize(name);
        let factory = {
            let factories = self.factories.read().unwrap_or_else(PoisonError::into_inner);
            factories
                .get(&key)
                .cloned()
                .ok_or_else(|| LayoutError::UnknownLayout(name.to_string()))?
        };
        // The lock is released before user code runs.
        factory().map_err(|source| LayoutError::Instantiation { name: key, source })
    }

    pub fn contains(&self, name: &str) -> bool {
        let factories = self.factories.read().unwrap_or_else(PoisonError::into_inner);
        factories.contains_key(&normalize(name))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let factories = self.factories.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = factories.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for LayoutRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for LayoutRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutRegistry")
            .field("names", &self.names())
            .finish()
    }
}

fn normalize(name: &str) -> String {
    name.to_uppercase()
}

static GLOBAL_REGISTRY: Lazy<LayoutRegistry> = Lazy::new(LayoutRegistry::with_defaults);

pub fn global_registry() -> &'static LayoutRegistry {
    &GLOBAL_REGISTRY
}

/// Register a layout in the process-wide registry.
pub fn register_layout<F>(name: &str, factory: F)
where
    F: Fn() -> Result<Box<dyn Layout>, BoxError> + Send + Sync + 'static,
{
    GLOBAL_REGISTRY.register(name, factory);
}

/// Resolve a layout by name from the process-wide registry.
pub fn for_name(name: &str) -> LayoutResult<Box<dyn Layout>> {
    GLOBAL_REGISTRY.resolve_by_name(name)
}
