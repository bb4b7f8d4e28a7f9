//! Health reporting.
//!
//! Indicators check one system each and report a [`Health`]; the
//! [`HealthContributorRegistry`] runs them by name and folds the results
//! into a single [`CompositeHealth`] through a [`StatusAggregator`].

pub mod aggregator;
pub mod couchbase;
pub mod error;
pub mod health;
pub mod http;
pub mod indicator;
pub mod ping;
pub mod registry;
pub mod status;

pub use aggregator::{SimpleStatusAggregator, StatusAggregator};
pub use couchbase::{ClusterVersion, CouchbaseHealthIndicator, CouchbaseOperations, QueryResult};
pub use error::{ActuatorError, BoxError, Result};
pub use health::{Health, HealthBuilder};
pub use http::HttpCodeStatusMapper;
pub use indicator::{HealthCheck, HealthIndicator};
pub use ping::PingHealthIndicator;
pub use registry::{CompositeHealth, HealthContributorRegistry};
pub use status::Status;
