/// Error type produced by user-supplied factories and health checks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Unable to deduce layout for '{0}'")]
    Unresolvable(String),
    #[error("Unknown layout - {0}")]
    UnknownLayout(String),
    #[error("Failed to instantiate layout '{name}': {source}")]
    Instantiation {
        name: String,
        #[source]
        source: BoxError,
    },
}

pub type LayoutResult<T> = std::result::Result<T, LayoutError>;
