//! The capability set every packaging layout exposes.
//!
//! A layout answers three questions for a packaging tool: which launcher to
//! record in the manifest, where each third-party library goes, and where
//! first-party classes live. Implementations must be pure; answers depend
//! only on the arguments.

use crate::models::LibraryScope;
use std::fmt::Debug;

pub trait Layout: Debug + Send + Sync {
    /// Fully qualified launcher class, or `None` when the archive is not
    /// independently executable.
    fn launcher_class_name(&self) -> Option<&str>;

    /// Directory (with trailing `/`) a library is written to, or `None` when
    /// the library must not be repackaged.
    fn library_destination(&self, library_name: &str, scope: &LibraryScope) -> Option<&str>;

    /// Root directory for compiled application classes. Empty means the
    /// archive root.
    fn classes_location(&self) -> &str;

    fn is_executable(&self) -> bool {
        self.launcher_class_name().is_some()
    }
}
