use crate::status::Status;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::error::Error;

/// Outcome of one health check: a status plus free-form details.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Health {
    status: Status,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    details: IndexMap<String, Value>,
}

impl Health {
    pub fn builder() -> HealthBuilder {
        HealthBuilder::default()
    }

    pub fn up() -> HealthBuilder {
        Self::with_status(Status::UP)
    }

    pub fn down() -> HealthBuilder {
        Self::with_status(Status::DOWN)
    }

    pub fn out_of_service() -> HealthBuilder {
        Self::with_status(Status::OUT_OF_SERVICE)
    }

    pub fn unknown() -> HealthBuilder {
        Self::with_status(Status::UNKNOWN)
    }

    pub fn with_status(status: Status) -> HealthBuilder {
        let mut builder = HealthBuilder::default();
        builder.status(status);
        builder
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn details(&self) -> &IndexMap<String, Value> {
        &self.details
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.get(key)
    }
}

/// Accumulates a [`Health`]. Starts out `UNKNOWN` with no details.
#[derive(Debug, Clone)]
pub struct HealthBuilder {
    status: Status,
    details: IndexMap<String, Value>,
}

impl Default for HealthBuilder {
    fn default() -> Self {
        Self {
            status: Status::UNKNOWN,
            details: IndexMap::new(),
        }
    }
}

impl HealthBuilder {
    pub fn up(&mut self) -> &mut Self {
        self.status(Status::UP)
    }

    pub fn down(&mut self) -> &mut Self {
        self.status(Status::DOWN)
    }

    /// `DOWN` with an `error` detail of the form `"<kind>: <message>"`.
    pub fn down_with_error<E: Error + ?Sized>(&mut self, error: &E) -> &mut Self {
        let detail = format!("{}: {}", error_kind::<E>(), error);
        self.down().with_detail("error", detail)
    }

    pub fn out_of_service(&mut self) -> &mut Self {
        self.status(Status::OUT_OF_SERVICE)
    }

    pub fn unknown(&mut self) -> &mut Self {
        self.status(Status::UNKNOWN)
    }

    pub fn status(&mut self, status: Status) -> &mut Self {
        self.status = status;
        self
    }

    pub fn with_detail(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.details.insert(key.into(), value.into());
        self
    }

    pub fn with_details<I, K, V>(&mut self, details: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.details
            .extend(details.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn current_status(&self) -> &Status {
        &self.status
    }

    pub fn build(&self) -> Health {
        Health {
            status: self.status.clone(),
            details: self.details.clone(),
        }
    }
}

/// Unqualified type name of an error, `Error` for trait objects.
fn error_kind<E: ?Sized>() -> &'static str {
    let name = std::any::type_name::<E>();
    let name = name.strip_prefix("dyn ").unwrap_or(name);
    let name = name.split([' ', '<']).next().unwrap_or(name);
    name.rsplit("::").next().unwrap_or(name)
}
