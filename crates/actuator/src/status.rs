use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Health status code. The set is open: any uppercase code is a status.
///
/// Two statuses are equal when their codes match; the description is only
/// informational.
#[derive(Debug, Clone)]
pub struct Status {
    code: Cow<'static, str>,
    description: Option<String>,
}

impl Status {
    pub const UP: Status = Status::from_static("UP");
    pub const DOWN: Status = Status::from_static("DOWN");
    pub const OUT_OF_SERVICE: Status = Status::from_static("OUT_OF_SERVICE");
    pub const UNKNOWN: Status = Status::from_static("UNKNOWN");

    const fn from_static(code: &'static str) -> Self {
        Self {
            code: Cow::Borrowed(code),
            description: None,
        }
    }

    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: Cow::Owned(code.into().to_uppercase()),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl PartialEq for Status {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Status {}

impl Hash for Status {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.code)
    }
}
