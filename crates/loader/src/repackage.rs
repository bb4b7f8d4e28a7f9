//! Writing an application archive according to a layout.
//!
//! [`PackagingPlan`] is the pure part: it decides where every class file and
//! library goes and what the manifest says. [`Repackager`] writes a plan out
//! as a zip archive, or as a directory tree when the target is a directory.

use crate::error::{RepackageError, Result};
use bootkit_api::{Layout, Library};
use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEntry {
    /// Path inside the archive, `/`-separated.
    pub destination: String,
    pub source: PathBuf,
    /// Nested archives are stored uncompressed so they can be read in place.
    pub stored: bool,
}

#[derive(Debug, Clone)]
pub struct PackagingPlan {
    entries: Vec<PlannedEntry>,
    excluded: Vec<Library>,
    manifest: Vec<(String, String)>,
}

impl PackagingPlan {
    pub fn new(
        layout: &dyn Layout,
        classes_dir: &Path,
        libraries: &[Library],
        start_class: Option<&str>,
    ) -> Result<Self> {
        if !classes_dir.is_dir() {
            return Err(RepackageError::MissingSource(classes_dir.to_path_buf()));
        }

        let mut entries = Vec::new();
        let mut seen = HashSet::new();

        for entry in WalkDir::new(classes_dir).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = relative_name(classes_dir, entry.path());
            if relative == MANIFEST_PATH {
                continue;
            }
            let destination = format!("{}{}", layout.classes_location(), relative);
            push_unique(&mut entries, &mut seen, destination, entry.path(), false)?;
        }

        let mut excluded = Vec::new();
        for library in libraries {
            if !library.file.is_file() {
                return Err(RepackageError::MissingSource(library.file.clone()));
            }
            match layout.library_destination(&library.name, &library.scope) {
                Some(dir) => {
                    let destination = format!("{}{}", dir, library.name);
                    push_unique(&mut entries, &mut seen, destination, &library.file, true)?;
                }
                None => {
                    debug!(
                        "Library {} ({} scope) has no destination, skipping",
                        library.name, library.scope
                    );
                    excluded.push(library.clone());
                }
            }
        }

        let mut manifest = vec![("Manifest-Version".to_string(), "1.0".to_string())];
        match (layout.launcher_class_name(), start_class) {
            (Some(launcher), start) => {
                manifest.push(("Main-Class".to_string(), launcher.to_string()));
                if let Some(start) = start {
                    manifest.push(("Start-Class".to_string(), start.to_string()));
                }
            }
            (None, Some(start)) => manifest.push(("Main-Class".to_string(), start.to_string())),
            (None, None) => {}
        }

        Ok(Self {
            entries,
            excluded,
            manifest,
        })
    }

    pub fn entries(&self) -> &[PlannedEntry] {
        &self.entries
    }

    /// Libraries the layout chose not to package.
    pub fn excluded(&self) -> &[Library] {
        &self.excluded
    }

    pub fn manifest_attributes(&self) -> &[(String, String)] {
        &self.manifest
    }

    pub fn manifest_attribute(&self, name: &str) -> Option<&str> {
        self.manifest
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Manifest file content, CRLF terminated with a closing blank line.
    pub fn manifest(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.manifest {
            out.push_str(key);
            out.push_str(": ");
            out.push_str(value);
            out.push_str("\r\n");
        }
        out.push_str("\r\n");
        out
    }
}

fn relative_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn push_unique(
    entries: &mut Vec<PlannedEntry>,
    seen: &mut HashSet<String>,
    destination: String,
    source: &Path,
    stored: bool,
) -> Result<()> {
    if !seen.insert(destination.clone()) {
        return Err(RepackageError::DuplicateEntry(destination));
    }
    entries.push(PlannedEntry {
        destination,
        source: source.to_path_buf(),
        stored,
    });
    Ok(())
}

pub struct Repackager {
    layout: Box<dyn Layout>,
    start_class: Option<String>,
    libraries: Vec<Library>,
}

impl Repackager {
    pub fn new(layout: Box<dyn Layout>) -> Self {
        Self {
            layout,
            start_class: None,
            libraries: Vec::new(),
        }
    }

    pub fn with_start_class(mut self, start_class: impl Into<String>) -> Self {
        self.start_class = Some(start_class.into());
        self
    }

    pub fn with_library(mut self, library: Library) -> Self {
        self.libraries.push(library);
        self
    }

    pub fn with_libraries(mut self, libraries: impl IntoIterator<Item = Library>) -> Self {
        self.libraries.extend(libraries);
        self
    }

    pub fn layout(&self) -> &dyn Layout {
        self.layout.as_ref()
    }

    pub fn plan(&self, classes_dir: &Path) -> Result<PackagingPlan> {
        PackagingPlan::new(
            self.layout.as_ref(),
            classes_dir,
            &self.libraries,
            self.start_class.as_deref(),
        )
    }

    /// Package `classes_dir` and the libraries into `destination`.
    ///
    /// An existing directory receives an expanded tree; anything else is
    /// written as a zip archive, replacing any existing file.
    pub fn repackage(&self, classes_dir: &Path, destination: &Path) -> Result<PackagingPlan> {
        let plan = self.plan(classes_dir)?;
        if destination.is_dir() {
            write_directory(&plan, destination)?;
        } else {
            write_archive(&plan, destination)?;
        }
        info!(
            "Repackaged {} entries into {} ({} libraries excluded)",
            plan.entries().len(),
            destination.display(),
            plan.excluded().len()
        );
        Ok(plan)
    }
}

fn write_archive(plan: &PackagingPlan, destination: &Path) -> Result<()> {
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut writer = ZipWriter::new(File::create(destination)?);
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    writer.start_file(MANIFEST_PATH, deflated)?;
    writer.write_all(plan.manifest().as_bytes())?;

    for entry in plan.entries() {
        let options = if entry.stored { stored } else { deflated };
        writer.start_file(entry.destination.as_str(), options)?;
        let mut source = File::open(&entry.source)?;
        std::io::copy(&mut source, &mut writer)?;
    }
    writer.finish()?;
    Ok(())
}

fn write_directory(plan: &PackagingPlan, destination: &Path) -> Result<()> {
    let manifest_path = destination.join(MANIFEST_PATH);
    if let Some(parent) = manifest_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&manifest_path, plan.manifest())?;

    for entry in plan.entries() {
        let target = destination.join(&entry.destination);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(&entry.source, &target)?;
    }
    Ok(())
}
