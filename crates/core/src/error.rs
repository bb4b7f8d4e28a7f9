use thiserror::Error;

#[derive(Error, Debug)]
pub enum BootError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid value for property '{key}': {message}")]
    Property { key: String, message: String },
    #[error("Placeholder error: {0}")]
    Placeholder(String),
    #[error("Bean definition error: {0}")]
    BeanDefinition(String),
    #[error("Error creating bean with name '{bean}': {message}")]
    BeanCreation { bean: String, message: String },
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BootError {
    pub fn property(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Property {
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn bean_creation(bean: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BeanCreation {
            bean: bean.into(),
            message: message.into(),
        }
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for BootError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        BootError::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BootError>;
