//! Layered property access.
//!
//! An [`Environment`] is an ordered list of [`PropertySource`]s; the first
//! source that knows a property wins. Values may reference other properties
//! with `${name}` or `${name:default}` placeholders.

mod placeholder;
pub mod relaxed;
mod source;

pub use relaxed::canonical_name;
pub use source::{MapPropertySource, PropertySource, SystemEnvironmentPropertySource};

use crate::error::{BootError, Result};
use std::str::FromStr;
use std::sync::Arc;

pub const ACTIVE_PROFILES_PROPERTY: &str = "spring.profiles.active";

#[derive(Debug, Clone, Default)]
pub struct Environment {
    sources: Vec<Arc<dyn PropertySource>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Environment backed by the process environment only.
    pub fn from_process() -> Self {
        let mut env = Self::new();
        env.add_last(SystemEnvironmentPropertySource::from_process());
        env
    }

    /// Builder-style helper for inline `key=value` properties, which take
    /// precedence over everything already present.
    pub fn with_properties<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = format!("inline-{}", self.sources.len());
        self.add_first(MapPropertySource::from_key_values(name, entries));
        self
    }

    pub fn add_first(&mut self, source: impl PropertySource + 'static) {
        self.sources.insert(0, Arc::new(source));
    }

    pub fn add_last(&mut self, source: impl PropertySource + 'static) {
        self.sources.push(Arc::new(source));
    }

    pub fn sources(&self) -> &[Arc<dyn PropertySource>] {
        &self.sources
    }

    /// The first source flagged as the system environment, if any.
    pub fn system_environment(&self) -> Option<&Arc<dyn PropertySource>> {
        self.sources.iter().find(|s| s.is_system_environment())
    }

    /// Raw value without placeholder resolution.
    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.sources.iter().find_map(|s| s.get(key))
    }

    pub fn contains_property(&self, key: &str) -> bool {
        self.get_raw(key).is_some()
    }

    /// Value with placeholders resolved. Unresolvable placeholders are left
    /// in place.
    pub fn get_property(&self, key: &str) -> Option<String> {
        self.get_raw(key)
            .map(|raw| placeholder::resolve(&raw, |k| self.get_raw(k), false).unwrap_or(raw))
    }

    pub fn get_property_or(&self, key: &str, default: &str) -> String {
        self.get_property(key).unwrap_or_else(|| default.to_string())
    }

    /// Value with every placeholder resolved, failing otherwise.
    pub fn get_required_property(&self, key: &str) -> Result<String> {
        let raw = self
            .get_raw(key)
            .ok_or_else(|| BootError::property(key, "required property is not set"))?;
        placeholder::resolve(&raw, |k| self.get_raw(k), true)
    }

    pub fn get_parsed<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_property(key) {
            None => Ok(None),
            Some(value) => value
                .trim()
                .parse::<T>()
                .map(Some)
                .map_err(|e| BootError::property(key, e.to_string())),
        }
    }

    /// Boolean value; `true`/`false` in any case.
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        match self.get_property(key) {
            None => Ok(None),
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(Some(true)),
                "false" => Ok(Some(false)),
                other => Err(BootError::property(
                    key,
                    format!("'{}' is not a boolean", other),
                )),
            },
        }
    }

    /// Comma-separated list value, trimmed, empty entries dropped.
    pub fn get_list(&self, key: &str) -> Vec<String> {
        self.get_property(key)
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn resolve_placeholders(&self, text: &str) -> String {
        placeholder::resolve(text, |k| self.get_raw(k), false).unwrap_or_else(|_| text.to_string())
    }

    pub fn resolve_required_placeholders(&self, text: &str) -> Result<String> {
        placeholder::resolve(text, |k| self.get_raw(k), true)
    }

    pub fn active_profiles(&self) -> Vec<String> {
        self.get_list(ACTIVE_PROFILES_PROPERTY)
    }
}
