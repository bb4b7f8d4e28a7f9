use bootkit_actuator::{
    BoxError, ClusterVersion, CouchbaseHealthIndicator, CouchbaseOperations, HealthContributorRegistry,
    HttpCodeStatusMapper, PingHealthIndicator, QueryResult, SimpleStatusAggregator, Status,
};
use serde_json::json;
use std::sync::Arc;

struct OfflineCluster;

impl CouchbaseOperations for OfflineCluster {
    fn cluster_versions(&self) -> Result<Vec<ClusterVersion>, BoxError> {
        Err("no nodes available".into())
    }

    fn query(&self, _statement: &str) -> Result<QueryResult, BoxError> {
        unreachable!("versions are read first")
    }
}

#[test]
fn test_offline_cluster_takes_the_application_down() {
    let registry = HealthContributorRegistry::new();
    registry.register("ping", Arc::new(PingHealthIndicator)).unwrap();
    registry
        .register("couchbase", Arc::new(CouchbaseHealthIndicator::new(Arc::new(OfflineCluster))))
        .unwrap();

    let health = registry.health();
    assert_eq!(health.status, Status::DOWN);
    assert_eq!(HttpCodeStatusMapper::default().status_code(&health.status), 503);

    let body = serde_json::to_value(&health).unwrap();
    assert_eq!(body["components"]["ping"], json!({"status": "UP"}));
    assert_eq!(body["components"]["couchbase"]["status"], json!("DOWN"));
    assert_eq!(
        body["components"]["couchbase"]["details"]["error"],
        json!("Error: no nodes available")
    );
}

#[test]
fn test_custom_order_can_hide_outages() {
    let registry = HealthContributorRegistry::with_aggregator(SimpleStatusAggregator::new([
        "UP", "DOWN",
    ]));
    registry.register("ping", Arc::new(PingHealthIndicator)).unwrap();
    registry
        .register("couchbase", Arc::new(CouchbaseHealthIndicator::new(Arc::new(OfflineCluster))))
        .unwrap();
    assert_eq!(registry.health().status, Status::UP);
}
