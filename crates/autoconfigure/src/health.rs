//! Health endpoint wiring.

use crate::condition::{Condition, PropertyCondition};
use crate::context::{AutoConfiguration, ConfigurationContext};
use bootkit_actuator::{
    HealthContributorRegistry, HealthIndicator, HttpCodeStatusMapper, PingHealthIndicator,
    SimpleStatusAggregator,
};
use bootkit_core::{BootError, Result};
use std::sync::Arc;

/// Aggregation order override, e.g. `down, out_of_service, up, unknown`.
pub const STATUS_ORDER_PROPERTY: &str = "management.endpoint.health.status.order";

const NAME_SUFFIXES: [&str; 2] = ["HealthIndicator", "HealthContributor"];

/// Contributor name for a bean: `couchbaseHealthContributor` → `couchbase`.
pub fn contributor_name(bean_name: &str) -> &str {
    NAME_SUFFIXES
        .iter()
        .find_map(|suffix| bean_name.strip_suffix(*suffix))
        .filter(|name| !name.is_empty())
        .unwrap_or(bean_name)
}

/// Collects every `Arc<dyn HealthIndicator>` bean, plus `ping`, into a
/// [`HealthContributorRegistry`]. Runs after the auto-configurations that
/// contribute indicators.
#[derive(Debug, Default, Clone, Copy)]
pub struct HealthEndpointAutoConfiguration;

impl AutoConfiguration for HealthEndpointAutoConfiguration {
    fn name(&self) -> &str {
        "HealthEndpointAutoConfiguration"
    }

    fn configure(&self, context: &mut ConfigurationContext<'_>) -> Result<()> {
        context.bean(
            "pingHealthContributor",
            vec![PropertyCondition::new("management.health.ping", "enabled")
                .match_if_missing()
                .into()],
            |_| Ok(Arc::new(PingHealthIndicator) as Arc<dyn HealthIndicator>),
        )?;

        context.bean(
            "healthHttpCodeStatusMapper",
            vec![Condition::on_missing_bean::<HttpCodeStatusMapper>()],
            |_| Ok(HttpCodeStatusMapper::default()),
        )?;

        context.bean(
            "healthContributorRegistry",
            vec![Condition::on_missing_bean::<HealthContributorRegistry>()],
            |ctx| {
                let order = ctx.environment().get_list(STATUS_ORDER_PROPERTY);
                let registry = if order.is_empty() {
                    HealthContributorRegistry::new()
                } else {
                    HealthContributorRegistry::with_aggregator(SimpleStatusAggregator::new(order))
                };
                for (bean_name, indicator) in ctx.beans().get_beans_of_type::<Arc<dyn HealthIndicator>>() {
                    registry
                        .register(contributor_name(&bean_name), Arc::clone(&*indicator))
                        .map_err(|e| BootError::BeanDefinition(e.to_string()))?;
                }
                Ok(registry)
            },
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contributor_names() {
        assert_eq!(contributor_name("couchbaseHealthContributor"), "couchbase");
        assert_eq!(contributor_name("diskSpaceHealthIndicator"), "diskSpace");
        assert_eq!(contributor_name("db"), "db");
        assert_eq!(contributor_name("HealthIndicator"), "HealthIndicator");
    }
}
