//! Document database integration: health contributor and repositories.

use crate::condition::{Condition, PropertyCondition};
use crate::context::{AutoConfiguration, ConfigurationContext};
use bootkit_actuator::{CouchbaseHealthIndicator, CouchbaseOperations, HealthIndicator};
use bootkit_core::Result;
use std::fmt;
use std::sync::Arc;

/// Creates repositories backed by the application's [`CouchbaseOperations`].
pub struct CouchbaseRepositoryFactory {
    operations: Arc<dyn CouchbaseOperations>,
}

impl CouchbaseRepositoryFactory {
    pub fn new(operations: Arc<dyn CouchbaseOperations>) -> Self {
        Self { operations }
    }

    pub fn operations(&self) -> &Arc<dyn CouchbaseOperations> {
        &self.operations
    }
}

impl fmt::Debug for CouchbaseRepositoryFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CouchbaseRepositoryFactory").finish_non_exhaustive()
    }
}

/// Registers `couchbaseHealthContributor` when the application provides an
/// `Arc<dyn CouchbaseOperations>` bean, unless
/// `management.health.couchbase.enabled=false`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CouchbaseHealthContributorAutoConfiguration;

impl AutoConfiguration for CouchbaseHealthContributorAutoConfiguration {
    fn name(&self) -> &str {
        "CouchbaseHealthContributorAutoConfiguration"
    }

    fn conditions(&self) -> Vec<Condition> {
        vec![
            Condition::on_bean::<Arc<dyn CouchbaseOperations>>(),
            PropertyCondition::new("management.health.couchbase", "enabled")
                .match_if_missing()
                .into(),
        ]
    }

    fn configure(&self, context: &mut ConfigurationContext<'_>) -> Result<()> {
        context.bean("couchbaseHealthContributor", Vec::new(), |ctx| {
            let operations = ctx.require::<Arc<dyn CouchbaseOperations>>()?;
            let indicator = CouchbaseHealthIndicator::new(Arc::clone(&*operations));
            Ok(Arc::new(indicator) as Arc<dyn HealthIndicator>)
        })?;
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CouchbaseRepositoriesAutoConfiguration;

impl AutoConfiguration for CouchbaseRepositoriesAutoConfiguration {
    fn name(&self) -> &str {
        "CouchbaseRepositoriesAutoConfiguration"
    }

    fn conditions(&self) -> Vec<Condition> {
        vec![
            Condition::on_bean::<Arc<dyn CouchbaseOperations>>(),
            PropertyCondition::new("spring.data.couchbase.repositories", "enabled")
                .match_if_missing()
                .into(),
            Condition::on_missing_bean::<CouchbaseRepositoryFactory>(),
        ]
    }

    fn configure(&self, context: &mut ConfigurationContext<'_>) -> Result<()> {
        context.bean("couchbaseRepositoryFactory", Vec::new(), |ctx| {
            let operations = ctx.require::<Arc<dyn CouchbaseOperations>>()?;
            Ok(CouchbaseRepositoryFactory::new(Arc::clone(&*operations)))
        })?;
        Ok(())
    }
}
