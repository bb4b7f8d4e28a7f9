use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Why a dependency was pulled in, and therefore where a layout places it.
///
/// The four well-known scopes are provided as constants. Any other name is a
/// custom scope; layouts that do not recognise it decide for themselves
/// whether the library is packaged at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LibraryScope(Cow<'static, str>);

impl LibraryScope {
    pub const COMPILE: LibraryScope = LibraryScope(Cow::Borrowed("compile"));
    pub const RUNTIME: LibraryScope = LibraryScope(Cow::Borrowed("runtime"));
    pub const PROVIDED: LibraryScope = LibraryScope(Cow::Borrowed("provided"));
    pub const CUSTOM: LibraryScope = LibraryScope(Cow::Borrowed("custom"));

    /// Create a scope from a name. Names are normalised to lowercase.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        let name = name.into();
        if name.chars().any(|c| c.is_ascii_uppercase()) {
            Self(Cow::Owned(name.to_ascii_lowercase()))
        } else {
            Self(name)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is one of the four scopes every layout knows about.
    pub fn is_well_known(&self) -> bool {
        matches!(self.as_str(), "compile" | "runtime" | "provided" | "custom")
    }
}

impl fmt::Display for LibraryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LibraryScope {
    fn from(s: &str) -> Self {
        Self::new(s.to_string())
    }
}

impl From<String> for LibraryScope {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for LibraryScope {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
