//! Loading `application.json` style configuration files.

use crate::env::{Environment, MapPropertySource};
use crate::error::Result;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Flatten a JSON document into dotted property names.
///
/// Objects contribute `parent.child` keys, arrays `parent[index]` keys, and
/// scalars their string form. `null` values are skipped.
pub fn flatten_json(name: impl Into<String>, value: &Value) -> MapPropertySource {
    let mut source = MapPropertySource::new(name);
    flatten_into(&mut source, "", value);
    source
}

fn flatten_into(source: &mut MapPropertySource, prefix: &str, value: &Value) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_into(source, &path, child);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(source, &format!("{}[{}]", prefix, index), child);
            }
        }
        Value::Null => {}
        Value::String(s) => source.insert(prefix, s.clone()),
        other => source.insert(prefix, other.to_string()),
    }
}

/// Loads `application.json` and `application-{profile}.json` from a directory.
#[derive(Debug, Clone)]
pub struct ConfigFileLoader {
    dir: PathBuf,
    base_name: String,
}

impl ConfigFileLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            base_name: "application".to_string(),
        }
    }

    pub fn with_base_name(mut self, base_name: impl Into<String>) -> Self {
        self.base_name = base_name.into();
        self
    }

    /// Append the base file to `env`, then prepend one file per active
    /// profile so that later profiles win. Missing files are skipped.
    ///
    /// Profiles are read from `env` and from the base file itself.
    pub fn load_into(&self, env: &mut Environment) -> Result<()> {
        let base = self.dir.join(format!("{}.json", self.base_name));
        if let Some(source) = Self::load_file(&base)? {
            env.add_last(source);
        }

        for profile in env.active_profiles() {
            let path = self
                .dir
                .join(format!("{}-{}.json", self.base_name, profile));
            if let Some(source) = Self::load_file(&path)? {
                env.add_first(source);
            }
        }
        Ok(())
    }

    fn load_file(path: &Path) -> Result<Option<MapPropertySource>> {
        if !path.is_file() {
            debug!("Config file {} not present", path.display());
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&content)?;
        debug!("Loaded config file {}", path.display());
        Ok(Some(flatten_json(path.display().to_string(), &value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::PropertySource;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_flatten_nested_document() {
        let source = flatten_json(
            "doc",
            &json!({
                "spring": {
                    "rabbitmq": { "host": "broker", "port": 5673, "dynamic": false },
                    "profiles": { "active": "dev" }
                },
                "servers": ["a", "b"],
                "unset": null
            }),
        );
        assert_eq!(source.get("spring.rabbitmq.host").as_deref(), Some("broker"));
        assert_eq!(source.get("spring.rabbitmq.port").as_deref(), Some("5673"));
        assert_eq!(source.get("spring.rabbitmq.dynamic").as_deref(), Some("false"));
        assert_eq!(source.get("servers[1]").as_deref(), Some("b"));
        assert_eq!(source.get("unset"), None);
    }

    #[test]
    fn test_profile_files_override_base() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("application.json"),
            r#"{"spring":{"profiles":{"active":"dev"}},"app":{"name":"base","mode":"base"}}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("application-dev.json"),
            r#"{"app":{"mode":"dev"}}"#,
        )
        .unwrap();

        let mut env = Environment::new();
        ConfigFileLoader::new(dir.path()).load_into(&mut env).unwrap();

        assert_eq!(env.get_property("app.name").as_deref(), Some("base"));
        assert_eq!(env.get_property("app.mode").as_deref(), Some("dev"));
    }

    #[test]
    fn test_missing_directory_is_not_an_error() {
        let dir = tempdir().unwrap();
        let mut env = Environment::new();
        ConfigFileLoader::new(dir.path().join("nope"))
            .load_into(&mut env)
            .unwrap();
        assert!(env.sources().is_empty());
    }

    #[test]
    fn test_malformed_file_is_reported() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("application.json"), "{ not json").unwrap();
        let mut env = Environment::new();
        assert!(ConfigFileLoader::new(dir.path()).load_into(&mut env).is_err());
    }
}
