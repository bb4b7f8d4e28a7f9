//! Archive layouts and repackaging.
//!
//! A packaging tool picks a [`Layout`](bootkit_api::Layout) with
//! [`LayoutResolver`] (from the shape of the target file, or by name through
//! a [`LayoutRegistry`]) and then asks it, file by file, where things go.

pub mod error;
pub mod layouts;
pub mod registry;
pub mod repackage;
pub mod resolver;

pub use error::{RepackageError, Result};
pub use layouts::{Expanded, Jar, LibraryDestinations, NoneLayout, War};
pub use registry::{LayoutFactory, LayoutRegistry, for_name, global_registry, register_layout};
pub use repackage::{PackagingPlan, PlannedEntry, Repackager};
pub use resolver::{LayoutResolver, for_file};
