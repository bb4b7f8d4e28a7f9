use bootkit_actuator::{
    BoxError, ClusterVersion, CouchbaseOperations, HealthContributorRegistry, HealthIndicator,
    HttpCodeStatusMapper, QueryResult, Status,
};
use bootkit_autoconfigure::{
    ApplicationContext, ApplicationContextBuilder, CouchbaseHealthContributorAutoConfiguration,
    CouchbaseRepositoriesAutoConfiguration, CouchbaseRepositoryFactory, HealthEndpointAutoConfiguration,
};
use serde_json::json;
use std::sync::Arc;

struct Cluster {
    online: bool,
}

impl CouchbaseOperations for Cluster {
    fn cluster_versions(&self) -> Result<Vec<ClusterVersion>, BoxError> {
        if self.online {
            Ok(vec![ClusterVersion::new(7, 1, 0)])
        } else {
            Err("cluster unreachable".into())
        }
    }

    fn query(&self, _statement: &str) -> Result<QueryResult, BoxError> {
        Ok(QueryResult {
            final_success: true,
            errors: Vec::new(),
        })
    }
}

fn runner(online: bool) -> ApplicationContextBuilder {
    ApplicationContext::builder()
        .with_bean(
            "couchbaseTemplate",
            Arc::new(Cluster { online }) as Arc<dyn CouchbaseOperations>,
        )
        .with_configuration(CouchbaseHealthContributorAutoConfiguration)
        .with_configuration(CouchbaseRepositoriesAutoConfiguration)
        .with_configuration(HealthEndpointAutoConfiguration)
}

#[test]
fn test_contributor_is_registered_with_the_endpoint() {
    let context = runner(true).build().unwrap();
    assert!(context.contains_bean("couchbaseHealthContributor"));

    let registry = context.bean::<HealthContributorRegistry>().unwrap();
    assert_eq!(registry.names(), vec!["couchbase", "ping"]);

    let health = registry.health();
    assert_eq!(health.status, Status::UP);
    let body = serde_json::to_value(&health).unwrap();
    assert_eq!(
        body["components"]["couchbase"],
        json!({"status": "UP", "details": {"versions": "7.1.0"}})
    );
}

#[test]
fn test_unreachable_cluster_is_down_with_503() {
    let context = runner(false).build().unwrap();
    let registry = context.bean::<HealthContributorRegistry>().unwrap();
    let mapper = context.bean::<HttpCodeStatusMapper>().unwrap();

    let health = registry.health();
    assert_eq!(health.status, Status::DOWN);
    assert_eq!(mapper.status_code(&health.status), 503);
    let couchbase = health.component("couchbase").unwrap();
    assert_eq!(couchbase.detail("error"), Some(&json!("Error: cluster unreachable")));
}

#[test]
fn test_status_order_property() {
    let context = runner(false)
        .with_properties(["management.endpoint.health.status.order=up,down"])
        .build()
        .unwrap();
    let registry = context.bean::<HealthContributorRegistry>().unwrap();
    assert_eq!(registry.health().status, Status::UP);
}

#[test]
fn test_contributor_can_be_disabled() {
    let context = runner(true)
        .with_properties(["management.health.couchbase.enabled=false"])
        .build()
        .unwrap();
    assert!(!context.contains_bean("couchbaseHealthContributor"));
    let registry = context.bean::<HealthContributorRegistry>().unwrap();
    assert_eq!(registry.names(), vec!["ping"]);
}

#[test]
fn test_nothing_without_operations() {
    let context = ApplicationContext::builder()
        .with_configuration(CouchbaseHealthContributorAutoConfiguration)
        .with_configuration(CouchbaseRepositoriesAutoConfiguration)
        .with_configuration(HealthEndpointAutoConfiguration)
        .with_properties(["management.health.ping.enabled=false"])
        .build()
        .unwrap();
    assert!(context.bean::<CouchbaseRepositoryFactory>().is_none());
    assert!(
        context
            .beans()
            .get_beans_of_type::<Arc<dyn HealthIndicator>>()
            .is_empty()
    );
    let registry = context.bean::<HealthContributorRegistry>().unwrap();
    assert_eq!(registry.health().status, Status::UNKNOWN);
}

#[test]
fn test_repository_factory() {
    let context = runner(true).build().unwrap();
    let factory = context.bean::<CouchbaseRepositoryFactory>().unwrap();
    assert!(factory.operations().cluster_versions().is_ok());

    let disabled = runner(true)
        .with_properties(["spring.data.couchbase.repositories.enabled=false"])
        .build()
        .unwrap();
    assert!(disabled.bean::<CouchbaseRepositoryFactory>().is_none());
}

#[test]
fn test_user_repository_factory_wins() {
    let user = CouchbaseRepositoryFactory::new(Arc::new(Cluster { online: false }));
    let context = runner(true)
        .with_bean("myFactory", user)
        .build()
        .unwrap();
    assert!(!context.contains_bean("couchbaseRepositoryFactory"));
    let factory = context.bean::<CouchbaseRepositoryFactory>().unwrap();
    assert!(factory.operations().cluster_versions().is_err());
}
