pub mod error;
pub mod layout;
pub mod models;

// Re-export commonly used types
pub use error::{BoxError, LayoutError, LayoutResult};
pub use layout::Layout;
pub use models::*;
