use super::LibraryScope;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A third-party dependency to be placed into a packaged archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    pub name: String,
    pub file: PathBuf,
    pub scope: LibraryScope,
    /// The launcher must extract this library before it can be used.
    #[serde(default)]
    pub unpack_required: bool,
}

impl Library {
    /// Create a library named after its file.
    pub fn new(file: impl Into<PathBuf>, scope: LibraryScope) -> Self {
        let file = file.into();
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            file,
            scope,
            unpack_required: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn unpack_required(mut self, unpack: bool) -> Self {
        self.unpack_required = unpack;
        self
    }

    pub fn file(&self) -> &Path {
        &self.file
    }
}
