use crate::layouts::{Expanded, Jar, War};
use crate::registry::{LayoutRegistry, global_registry};
use bootkit_api::{Layout, LayoutError, LayoutResult};
use std::path::Path;
use tracing::debug;

/// Picks a layout from the shape of a target file or from a name.
#[derive(Debug, Clone, Copy)]
pub struct LayoutResolver<'a> {
    registry: &'a LayoutRegistry,
}

impl<'a> LayoutResolver<'a> {
    pub fn new(registry: &'a LayoutRegistry) -> Self {
        Self { registry }
    }

    /// A resolver over the process-wide registry.
    pub fn global() -> LayoutResolver<'static> {
        LayoutResolver::new(global_registry())
    }

    /// Deduce a layout from `target`, which need not exist yet.
    ///
    /// The checks run in a fixed order: `.jar`, then `.war`, then "existing
    /// directory or `.zip`". A directory named `app.jar` is therefore a jar.
    pub fn resolve_by_file(&self, target: impl AsRef<Path>) -> LayoutResult<Box<dyn Layout>> {
        let target = target.as_ref();
        if target.as_os_str().is_empty() {
            return Err(LayoutError::InvalidArgument(
                "File must not be empty".to_string(),
            ));
        }

        let file_name = target
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let layout: Box<dyn Layout> = if file_name.ends_with(".jar") {
            Box::new(Jar::new())
        } else if file_name.ends_with(".war") {
            Box::new(War::new())
        } else if target.is_dir() || file_name.ends_with(".zip") {
            Box::new(Expanded::new())
        } else {
            return Err(LayoutError::Unresolvable(target.display().to_string()));
        };
        debug!("Resolved layout {:?} for {}", layout, target.display());
        Ok(layout)
    }

    pub fn resolve_by_name(&self, name: &str) -> LayoutResult<Box<dyn Layout>> {
        self.registry.resolve_by_name(name)
    }
}

/// Deduce a layout from the shape of `target`.
pub fn for_file(target: impl AsRef<Path>) -> LayoutResult<Box<dyn Layout>> {
    LayoutResolver::global().resolve_by_file(target)
}
