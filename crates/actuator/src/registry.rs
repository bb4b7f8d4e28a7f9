use crate::aggregator::{SimpleStatusAggregator, StatusAggregator};
use crate::error::{ActuatorError, Result};
use crate::health::Health;
use crate::indicator::HealthIndicator;
use crate::status::Status;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Aggregate status plus the health of every contributor, by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeHealth {
    pub status: Status,
    pub components: IndexMap<String, Health>,
}

impl CompositeHealth {
    pub fn component(&self, name: &str) -> Option<&Health> {
        self.components.get(name)
    }
}

/// Named health indicators, run together to produce a [`CompositeHealth`].
pub struct HealthContributorRegistry {
    contributors: RwLock<IndexMap<String, Arc<dyn HealthIndicator>>>,
    aggregator: Box<dyn StatusAggregator>,
}

impl HealthContributorRegistry {
    pub fn new() -> Self {
        Self::with_aggregator(SimpleStatusAggregator::default())
    }

    pub fn with_aggregator(aggregator: impl StatusAggregator + 'static) -> Self {
        Self {
            contributors: RwLock::new(IndexMap::new()),
            aggregator: Box::new(aggregator),
        }
    }

    pub fn register(&self, name: impl Into<String>, indicator: Arc<dyn HealthIndicator>) -> Result<()> {
        let name = name.into();
        let mut contributors = self
            .contributors
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if contributors.contains_key(&name) {
            return Err(ActuatorError::DuplicateContributor(name));
        }
        debug!("Registered health contributor '{}'", name);
        contributors.insert(name, indicator);
        Ok(())
    }

    pub fn unregister(&self, name: &str) -> Option<Arc<dyn HealthIndicator>> {
        let mut contributors = self
            .contributors
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        contributors.shift_remove(name)
    }

    pub fn contributor(&self, name: &str) -> Option<Arc<dyn HealthIndicator>> {
        let contributors = self
            .contributors
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        contributors.get(name).cloned()
    }

    /// Contributor names, in registration order.
    pub fn names(&self) -> Vec<String> {
        let contributors = self
            .contributors
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        contributors.keys().cloned().collect()
    }

    /// Run every contributor and aggregate the results.
    pub fn health(&self) -> CompositeHealth {
        // Indicators may block, so they run on a snapshot taken outside the lock.
        let snapshot: Vec<(String, Arc<dyn HealthIndicator>)> = {
            let contributors = self
                .contributors
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            contributors
                .iter()
                .map(|(name, indicator)| (name.clone(), indicator.clone()))
                .collect()
        };

        let components: IndexMap<String, Health> = snapshot
            .into_iter()
            .map(|(name, indicator)| (name, indicator.health()))
            .collect();
        let statuses: Vec<Status> = components
            .values()
            .map(|health| health.status().clone())
            .collect();

        CompositeHealth {
            status: self.aggregator.aggregate(&statuses),
            components,
        }
    }
}

impl Default for HealthContributorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HealthContributorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HealthContributorRegistry")
            .field("contributors", &self.names())
            .finish()
    }
}
