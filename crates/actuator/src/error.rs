/// Error type returned by checks of external systems.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum ActuatorError {
    #[error("A contributor named '{0}' has already been registered")]
    DuplicateContributor(String),
}

pub type Result<T> = std::result::Result<T, ActuatorError>;
