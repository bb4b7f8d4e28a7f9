use crate::status::Status;

/// Folds component statuses into one.
pub trait StatusAggregator: Send + Sync {
    fn aggregate(&self, statuses: &[Status]) -> Status;
}

/// Picks the status that ranks first in a fixed order. Codes missing from
/// the order rank after every listed one.
#[derive(Debug, Clone)]
pub struct SimpleStatusAggregator {
    order: Vec<String>,
}

impl SimpleStatusAggregator {
    pub fn new<I, S>(order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            order: order
                .into_iter()
                .map(|code| code.as_ref().trim().to_uppercase())
                .collect(),
        }
    }

    fn rank(&self, status: &Status) -> usize {
        self.order
            .iter()
            .position(|code| code == status.code())
            .unwrap_or(self.order.len())
    }
}

impl Default for SimpleStatusAggregator {
    fn default() -> Self {
        Self::new(["DOWN", "OUT_OF_SERVICE", "UP", "UNKNOWN"])
    }
}

impl StatusAggregator for SimpleStatusAggregator {
    fn aggregate(&self, statuses: &[Status]) -> Status {
        statuses
            .iter()
            .min_by_key(|status| self.rank(status))
            .map(|status| Status::new(status.code()))
            .unwrap_or(Status::UNKNOWN)
    }
}
