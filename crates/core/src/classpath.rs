//! Declared class availability and classpath resources.
//!
//! There is no class loader here: a [`ClassPath`] is simply the set of
//! fully qualified class names an application declares as present, plus the
//! directories its resources are read from.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct ClassPath {
    classes: BTreeSet<String>,
    resource_roots: Vec<PathBuf>,
}

impl ClassPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.classes.insert(class_name.into());
        self
    }

    pub fn with_classes<I, S>(mut self, class_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes.extend(class_names.into_iter().map(Into::into));
        self
    }

    pub fn with_resource_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.resource_roots.push(root.into());
        self
    }

    /// A copy that hides matching classes. A trailing `*` matches any
    /// suffix, so `com.hazelcast.client.*` hides the whole client package.
    pub fn without(&self, pattern: &str) -> Self {
        let mut filtered = self.clone();
        match pattern.strip_suffix('*') {
            Some(prefix) => filtered.classes.retain(|c| !c.starts_with(prefix)),
            None => {
                filtered.classes.remove(pattern);
            }
        }
        filtered
    }

    pub fn is_present(&self, class_name: &str) -> bool {
        self.classes.contains(class_name)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn resource_roots(&self) -> &[PathBuf] {
        &self.resource_roots
    }

    pub fn resource_loader(&self) -> ResourceLoader {
        ResourceLoader::new(self.resource_roots.clone())
    }
}

/// A resolved resource location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// The location as written by the user, e.g. `classpath:hazelcast.xml`.
    pub location: String,
    pub path: PathBuf,
}

impl Resource {
    /// `file:` URL form of the resolved path.
    pub fn url(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResourceLoader {
    roots: Vec<PathBuf>,
}

impl ResourceLoader {
    pub const CLASSPATH_PREFIX: &'static str = "classpath:";
    pub const FILE_PREFIX: &'static str = "file:";

    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// Resolve `location` to an existing file.
    ///
    /// `file:` locations are filesystem paths. `classpath:` locations and
    /// plain paths are searched in each resource root, in order.
    pub fn resolve(&self, location: &str) -> Option<Resource> {
        if let Some(path) = location.strip_prefix(Self::FILE_PREFIX) {
            let path = Path::new(path);
            return path.is_file().then(|| Resource {
                location: location.to_string(),
                path: path.to_path_buf(),
            });
        }

        let relative = location
            .strip_prefix(Self::CLASSPATH_PREFIX)
            .unwrap_or(location)
            .trim_start_matches('/');
        self.roots
            .iter()
            .map(|root| root.join(relative))
            .find(|candidate| candidate.is_file())
            .map(|path| Resource {
                location: location.to_string(),
                path,
            })
    }

    pub fn exists(&self, location: &str) -> bool {
        self.resolve(location).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_filtered_classpath() {
        let classpath = ClassPath::new().with_classes([
            "com.hazelcast.core.HazelcastInstance",
            "com.hazelcast.client.HazelcastClient",
            "com.hazelcast.client.config.ClientConfig",
        ]);
        let filtered = classpath.without("com.hazelcast.client.*");
        assert!(filtered.is_present("com.hazelcast.core.HazelcastInstance"));
        assert!(!filtered.is_present("com.hazelcast.client.HazelcastClient"));
        assert!(classpath.is_present("com.hazelcast.client.HazelcastClient"));

        let single = classpath.without("com.hazelcast.core.HazelcastInstance");
        assert!(!single.is_present("com.hazelcast.core.HazelcastInstance"));
        assert!(single.is_present("com.hazelcast.client.config.ClientConfig"));
    }

    #[test]
    fn test_resource_resolution_order() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        std::fs::create_dir_all(second.path().join("conf")).unwrap();
        std::fs::write(second.path().join("conf/grid.xml"), "<x/>").unwrap();
        std::fs::write(first.path().join("hazelcast.xml"), "<x/>").unwrap();
        std::fs::write(second.path().join("hazelcast.xml"), "<y/>").unwrap();

        let loader = ResourceLoader::new(vec![first.path().into(), second.path().into()]);

        let resource = loader.resolve("classpath:hazelcast.xml").unwrap();
        assert_eq!(resource.path, first.path().join("hazelcast.xml"));
        assert!(loader.exists("conf/grid.xml"));
        assert!(loader.exists("classpath:/conf/grid.xml"));
        assert!(!loader.exists("classpath:missing.xml"));
    }

    #[test]
    fn test_file_locations() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("grid.yaml");
        std::fs::write(&file, "hazelcast: {}").unwrap();
        let loader = ResourceLoader::default();

        let location = format!("file:{}", file.display());
        let resource = loader.resolve(&location).unwrap();
        assert_eq!(resource.path, file);
        assert!(resource.url().ends_with("grid.yaml"));
        assert!(loader.resolve("file:/definitely/not/here.xml").is_none());
    }
}
