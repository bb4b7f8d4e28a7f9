//! Couchbase health, checked through a keyspace query.

use crate::error::BoxError;
use crate::health::HealthBuilder;
use crate::indicator::HealthCheck;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

pub const KEYSPACES_STATEMENT: &str = "SELECT * FROM system:keyspaces";

/// Version of one cluster node, e.g. `6.5.1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClusterVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl ClusterVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }
}

impl fmt::Display for ClusterVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub final_success: bool,
    pub errors: Vec<Value>,
}

/// The operations the indicator needs from a Couchbase client.
pub trait CouchbaseOperations: Send + Sync {
    fn cluster_versions(&self) -> Result<Vec<ClusterVersion>, BoxError>;

    fn query(&self, statement: &str) -> Result<QueryResult, BoxError>;
}

pub struct CouchbaseHealthIndicator {
    operations: Arc<dyn CouchbaseOperations>,
}

impl CouchbaseHealthIndicator {
    pub fn new(operations: Arc<dyn CouchbaseOperations>) -> Self {
        Self { operations }
    }
}

impl HealthCheck for CouchbaseHealthIndicator {
    fn do_health_check(&self, builder: &mut HealthBuilder) -> Result<(), BoxError> {
        let versions = self.operations.cluster_versions()?;
        let result = self.operations.query(KEYSPACES_STATEMENT)?;
        if result.final_success {
            let versions = versions
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            builder.up().with_detail("versions", versions);
        } else {
            // An unsuccessful query is not a failure; the status stays as is.
            builder.with_detail("errors", result.errors);
        }
        Ok(())
    }

    fn failure_message(&self) -> &str {
        "Couchbase health check failed"
    }
}
