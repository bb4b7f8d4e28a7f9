use super::relaxed::{canonical_name, env_var_names};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fmt::Debug;
use tracing::debug;

/// A named set of properties. Environments consult sources in order.
pub trait PropertySource: Debug + Send + Sync {
    fn name(&self) -> &str;

    /// Look a property up by name. Implementations apply their own relaxed
    /// matching rules.
    fn get(&self, key: &str) -> Option<String>;

    /// All property names this source knows, as stored.
    fn keys(&self) -> Vec<String>;

    fn is_system_environment(&self) -> bool {
        false
    }
}

/// In-memory property source keyed by canonical property names.
#[derive(Debug, Clone, Default)]
pub struct MapPropertySource {
    name: String,
    properties: BTreeMap<String, String>,
}

impl MapPropertySource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn from_pairs<I, K, V>(name: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut source = Self::new(name);
        for (k, v) in pairs {
            source.insert(k.as_ref(), v);
        }
        source
    }

    /// Parse `key=value` strings, as accepted on command lines and in tests.
    /// Entries without `=` map to an empty value.
    pub fn from_key_values<I, S>(name: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut source = Self::new(name);
        for entry in entries {
            let entry = entry.as_ref();
            match entry.split_once('=') {
                Some((k, v)) => source.insert(k.trim(), v.trim().to_string()),
                None => source.insert(entry.trim(), String::new()),
            }
        }
        source
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.properties.insert(canonical_name(key), value.into());
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl PropertySource for MapPropertySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Option<String> {
        self.properties.get(&canonical_name(key)).cloned()
    }

    fn keys(&self) -> Vec<String> {
        self.properties.keys().cloned().collect()
    }
}

/// Process environment variables.
///
/// Keys are kept exactly as the operating system reports them. Lookups try
/// the key verbatim first, then its environment-variable spellings.
#[derive(Debug, Clone, Default)]
pub struct SystemEnvironmentPropertySource {
    variables: BTreeMap<String, String>,
}

impl SystemEnvironmentPropertySource {
    pub const NAME: &'static str = "systemEnvironment";

    /// Snapshot the current process environment. Variables whose name or
    /// value is not valid UTF-8 are skipped.
    pub fn from_process() -> Self {
        Self::from_os_vars(std::env::vars_os())
    }

    fn from_os_vars<I>(variables: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let variables = variables
            .into_iter()
            .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => Some((key, value)),
                (key, _) => {
                    debug!(
                        "Skipping non UTF-8 environment variable {}",
                        key.unwrap_or_else(|k| k.to_string_lossy().into_owned())
                    );
                    None
                }
            })
            .collect();
        Self { variables }
    }

    pub fn from_map<I, K, V>(variables: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            variables: variables
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl PropertySource for SystemEnvironmentPropertySource {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = self.variables.get(key) {
            return Some(value.clone());
        }
        env_var_names(key)
            .into_iter()
            .find_map(|candidate| self.variables.get(&candidate).cloned())
    }

    fn keys(&self) -> Vec<String> {
        self.variables.keys().cloned().collect()
    }

    fn is_system_environment(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_source_relaxed_lookup() {
        let source = MapPropertySource::from_pairs("test", [("spring.rabbitmq.virtualHost", "/vh")]);
        assert_eq!(source.get("spring.rabbitmq.virtual-host").as_deref(), Some("/vh"));
        assert_eq!(source.get("spring.rabbitmq.virtual_host").as_deref(), Some("/vh"));
        assert_eq!(source.get("spring.rabbitmq.host"), None);
    }

    #[test]
    fn test_key_value_parsing() {
        let source = MapPropertySource::from_key_values("inline", ["a.b=1", "c.d = two", "flag"]);
        assert_eq!(source.get("a.b").as_deref(), Some("1"));
        assert_eq!(source.get("c.d").as_deref(), Some("two"));
        assert_eq!(source.get("flag").as_deref(), Some(""));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_variables_are_skipped() {
        use std::os::unix::ffi::OsStringExt;

        let source = SystemEnvironmentPropertySource::from_os_vars([
            (OsString::from("DYNO"), OsString::from("web.1")),
            (OsString::from("BROKEN_VALUE"), OsString::from_vec(vec![0x66, 0xff, 0x6f])),
            (OsString::from_vec(vec![0xfe, 0x41]), OsString::from("x")),
        ]);
        assert_eq!(source.get("DYNO").as_deref(), Some("web.1"));
        assert_eq!(source.get("BROKEN_VALUE"), None);
        assert_eq!(source.keys(), vec!["DYNO".to_string()]);
    }

    #[test]
    fn test_system_environment_lookup() {
        let source = SystemEnvironmentPropertySource::from_map([
            ("SPRING_RABBITMQ_HOST", "broker"),
            ("SPRING_RABBITMQ_VIRTUALHOST", "/vh"),
            ("DYNO", "web.1"),
        ]);
        assert_eq!(source.get("DYNO").as_deref(), Some("web.1"));
        assert_eq!(source.get("spring.rabbitmq.host").as_deref(), Some("broker"));
        assert_eq!(source.get("spring.rabbitmq.virtual-host").as_deref(), Some("/vh"));
        assert!(source.is_system_environment());
    }
}
