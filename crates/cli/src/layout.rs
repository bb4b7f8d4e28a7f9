use anyhow::Context;
use bootkit_api::{Layout, LibraryScope};
use bootkit_loader::{global_registry, LayoutResolver};
use clap::Args;
use std::path::PathBuf;
use tabled::{Table, Tabled};

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct LayoutArgs {
    /// Target archive or directory whose shape selects the layout
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
    /// Registered layout name (case-insensitive)
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,
}

#[derive(Tabled)]
struct DestinationRow {
    #[tabled(rename = "Scope")]
    scope: String,
    #[tabled(rename = "Destination")]
    destination: String,
}

#[derive(Tabled)]
struct LayoutRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Launcher")]
    launcher: String,
    #[tabled(rename = "Classes")]
    classes: String,
}

pub fn run(args: LayoutArgs) -> anyhow::Result<()> {
    let resolver = LayoutResolver::global();
    let layout = match (&args.file, &args.name) {
        (Some(file), _) => resolver
            .resolve_by_file(file)
            .with_context(|| format!("resolving layout for {}", file.display()))?,
        (None, Some(name)) => resolver.resolve_by_name(name)?,
        (None, None) => anyhow::bail!("either --file or --name is required"),
    };
    print_layout(&*layout);
    Ok(())
}

pub fn list() -> anyhow::Result<()> {
    let registry = global_registry();
    let mut rows = Vec::new();
    for name in registry.names() {
        let layout = registry.resolve_by_name(&name)?;
        rows.push(LayoutRow {
            launcher: layout.launcher_class_name().unwrap_or("-").to_string(),
            classes: display_location(layout.classes_location()),
            name,
        });
    }
    println!("{}", Table::new(rows));
    Ok(())
}

fn print_layout(layout: &dyn Layout) {
    println!("Layout:     {:?}", layout);
    println!(
        "Launcher:   {}",
        layout.launcher_class_name().unwrap_or("(not executable)")
    );
    println!("Classes:    {}", display_location(layout.classes_location()));

    let rows: Vec<DestinationRow> = [
        LibraryScope::COMPILE,
        LibraryScope::RUNTIME,
        LibraryScope::PROVIDED,
        LibraryScope::CUSTOM,
    ]
    .into_iter()
    .map(|scope| DestinationRow {
        destination: layout
            .library_destination("example.jar", &scope)
            .map(display_location)
            .unwrap_or_else(|| "(excluded)".to_string()),
        scope: scope.to_string(),
    })
    .collect();
    println!("{}", Table::new(rows));
}

fn display_location(location: &str) -> String {
    if location.is_empty() {
        "/".to_string()
    } else {
        location.to_string()
    }
}
