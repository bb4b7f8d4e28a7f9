//! The built-in layouts.
//!
//! | Layout | Launcher | Classes | Libraries |
//! |---|---|---|---|
//! | [`Jar`] | `JarLauncher` | root | `lib/` |
//! | [`Expanded`] | `PropertiesLauncher` | root | `lib/` |
//! | [`NoneLayout`] | none | root | `lib/` |
//! | [`War`] | `WarLauncher` | `WEB-INF/classes/` | by scope |

use bootkit_api::{Layout, LibraryScope};

pub const JAR_LAUNCHER: &str = "org.springframework.boot.loader.JarLauncher";
pub const PROPERTIES_LAUNCHER: &str = "org.springframework.boot.loader.PropertiesLauncher";
pub const WAR_LAUNCHER: &str = "org.springframework.boot.loader.WarLauncher";

/// Where libraries go, shared between layouts by composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryDestinations {
    /// Every scope lands in the same directory.
    Uniform(&'static str),
    /// Per-scope directories; unlisted scopes are not packaged.
    ByScope(&'static [(LibraryScope, &'static str)]),
}

static WAR_SCOPE_DESTINATIONS: [(LibraryScope, &str); 3] = [
    (LibraryScope::COMPILE, "WEB-INF/lib/"),
    (LibraryScope::RUNTIME, "WEB-INF/lib/"),
    (LibraryScope::PROVIDED, "WEB-INF/lib-provided/"),
];

impl LibraryDestinations {
    /// `lib/` for everything, as used by jar-style layouts.
    pub fn jar() -> Self {
        LibraryDestinations::Uniform("lib/")
    }

    pub fn war() -> Self {
        LibraryDestinations::ByScope(&WAR_SCOPE_DESTINATIONS)
    }

    pub fn destination(&self, scope: &LibraryScope) -> Option<&'static str> {
        match self {
            LibraryDestinations::Uniform(dir) => Some(*dir),
            LibraryDestinations::ByScope(table) => table
                .iter()
                .find(|(s, _)| s == scope)
                .map(|(_, dir)| *dir),
        }
    }
}

/// Executable jar.
#[derive(Debug, Clone)]
pub struct Jar {
    libraries: LibraryDestinations,
}

impl Jar {
    pub fn new() -> Self {
        Self {
            libraries: LibraryDestinations::jar(),
        }
    }
}

impl Default for Jar {
    fn default() -> Self {
        Self::new()
    }
}

impl Layout for Jar {
    fn launcher_class_name(&self) -> Option<&str> {
        Some(JAR_LAUNCHER)
    }

    fn library_destination(&self, _library_name: &str, scope: &LibraryScope) -> Option<&str> {
        self.libraries.destination(scope)
    }

    fn classes_location(&self) -> &str {
        ""
    }
}

/// Executable expanded archive, launched with the properties launcher.
#[derive(Debug, Clone)]
pub struct Expanded {
    libraries: LibraryDestinations,
}

impl Expanded {
    pub fn new() -> Self {
        Self {
            libraries: LibraryDestinations::jar(),
        }
    }
}

impl Default for Expanded {
    fn default() -> Self {
        Self::new()
    }
}

impl Layout for Expanded {
    fn launcher_class_name(&self) -> Option<&str> {
        Some(PROPERTIES_LAUNCHER)
    }

    fn library_destination(&self, _library_name: &str, scope: &LibraryScope) -> Option<&str> {
        self.libraries.destination(scope)
    }

    fn classes_location(&self) -> &str {
        ""
    }
}

/// Jar-shaped archive that is not independently executable.
#[derive(Debug, Clone)]
pub struct NoneLayout {
    libraries: LibraryDestinations,
}

impl NoneLayout {
    pub fn new() -> Self {
        Self {
            libraries: LibraryDestinations::jar(),
        }
    }
}

impl Default for NoneLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl Layout for NoneLayout {
    fn launcher_class_name(&self) -> Option<&str> {
        None
    }

    fn library_destination(&self, _library_name: &str, scope: &LibraryScope) -> Option<&str> {
        self.libraries.destination(scope)
    }

    fn classes_location(&self) -> &str {
        ""
    }
}

/// Executable war.
#[derive(Debug, Clone)]
pub struct War {
    libraries: LibraryDestinations,
}

impl War {
    pub fn new() -> Self {
        Self {
            libraries: LibraryDestinations::war(),
        }
    }
}

impl Default for War {
    fn default() -> Self {
        Self::new()
    }
}

impl Layout for War {
    fn launcher_class_name(&self) -> Option<&str> {
        Some(WAR_LAUNCHER)
    }

    fn library_destination(&self, _library_name: &str, scope: &LibraryScope) -> Option<&str> {
        self.libraries.destination(scope)
    }

    fn classes_location(&self) -> &str {
        "WEB-INF/classes/"
    }
}
