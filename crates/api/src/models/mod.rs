pub mod library;
pub mod scope;

pub use library::*;
pub use scope::*;
