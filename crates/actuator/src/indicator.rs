use crate::error::BoxError;
use crate::health::{Health, HealthBuilder};
use tracing::warn;

/// Reports the health of one component.
pub trait HealthIndicator: Send + Sync {
    fn health(&self) -> Health;
}

/// A check that fills in a [`HealthBuilder`] and may fail.
///
/// Every `HealthCheck` is a [`HealthIndicator`]: a failed check is reported
/// as `DOWN` with an `error` detail and logged with
/// [`failure_message`](HealthCheck::failure_message).
pub trait HealthCheck: Send + Sync {
    fn do_health_check(&self, builder: &mut HealthBuilder) -> Result<(), BoxError>;

    fn failure_message(&self) -> &str {
        "Health check failed"
    }
}

impl<T: HealthCheck> HealthIndicator for T {
    fn health(&self) -> Health {
        let mut builder = HealthBuilder::default();
        if let Err(err) = self.do_health_check(&mut builder) {
            warn!("{}: {}", self.failure_message(), err);
            builder.down_with_error(&*err);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;
    use serde_json::json;

    struct DiskSpace {
        free: u64,
        threshold: u64,
    }

    impl HealthCheck for DiskSpace {
        fn do_health_check(&self, builder: &mut HealthBuilder) -> Result<(), BoxError> {
            if self.free < self.threshold {
                builder.down();
            } else {
                builder.up();
            }
            builder.with_detail("free", self.free);
            Ok(())
        }
    }

    struct Unreachable;

    impl HealthCheck for Unreachable {
        fn do_health_check(&self, builder: &mut HealthBuilder) -> Result<(), BoxError> {
            builder.up().with_detail("partial", true);
            Err("host unreachable".into())
        }

        fn failure_message(&self) -> &str {
            "Remote service is unreachable"
        }
    }

    #[test]
    fn test_successful_check() {
        let health = DiskSpace { free: 10, threshold: 5 }.health();
        assert_eq!(health.status(), &Status::UP);
        assert_eq!(health.detail("free"), Some(&json!(10)));

        let health = DiskSpace { free: 1, threshold: 5 }.health();
        assert_eq!(health.status(), &Status::DOWN);
    }

    #[test]
    fn test_failed_check_is_down_with_error() {
        let health = Unreachable.health();
        assert_eq!(health.status(), &Status::DOWN);
        assert_eq!(health.detail("error"), Some(&json!("Error: host unreachable")));
        assert_eq!(health.detail("partial"), Some(&json!(true)));
    }
}
