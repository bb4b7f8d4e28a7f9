//! Conditional auto-configuration.
//!
//! An [`AutoConfiguration`] contributes beans to an [`ApplicationContext`]
//! when its [`Condition`]s hold: classes declared on the [`ClassPath`],
//! beans already defined, properties in the [`Environment`]. Every decision
//! is kept in a [`ConditionEvaluationReport`].
//!
//! [`ClassPath`]: bootkit_core::ClassPath
//! [`Environment`]: bootkit_core::Environment

pub mod condition;
pub mod context;
pub mod couchbase;
pub mod hazelcast;
pub mod health;
pub mod rabbit;
pub mod report;

pub use condition::{
    Condition, ConditionContext, ConditionOutcome, CustomCondition, PropertyCondition,
};
pub use context::{
    ApplicationContext, ApplicationContextBuilder, AutoConfiguration, ConfigurationContext,
};
pub use couchbase::{
    CouchbaseHealthContributorAutoConfiguration, CouchbaseRepositoriesAutoConfiguration,
    CouchbaseRepositoryFactory,
};
pub use hazelcast::HazelcastAutoConfiguration;
pub use health::HealthEndpointAutoConfiguration;
pub use rabbit::RabbitAutoConfiguration;
pub use report::{ConditionAndOutcome, ConditionEvaluationReport};
