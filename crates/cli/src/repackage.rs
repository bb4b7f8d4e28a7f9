use anyhow::Context;
use bootkit_api::{Library, LibraryScope};
use bootkit_loader::{LayoutResolver, Repackager};
use clap::Args;
use std::path::PathBuf;
use tabled::{Table, Tabled};
use tracing::info;

#[derive(Args, Debug)]
pub struct RepackageArgs {
    /// Directory of compiled application classes
    #[arg(long, value_name = "DIR")]
    pub classes: PathBuf,
    /// Library to include, as SCOPE=PATH (repeatable)
    #[arg(long = "lib", value_name = "SCOPE=PATH", value_parser = parse_library)]
    pub libraries: Vec<Library>,
    /// Application main class, recorded as Start-Class
    #[arg(long, value_name = "CLASS")]
    pub start_class: Option<String>,
    /// Layout name; resolved from OUTPUT when omitted
    #[arg(long, value_name = "NAME")]
    pub layout: Option<String>,
    /// Archive to write, or an existing directory to fill
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Entry")]
    destination: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Method")]
    method: &'static str,
}

fn parse_library(value: &str) -> Result<Library, String> {
    let (scope, path) = value
        .split_once('=')
        .ok_or_else(|| format!("expected SCOPE=PATH, got '{}'", value))?;
    if scope.trim().is_empty() || path.trim().is_empty() {
        return Err(format!("expected SCOPE=PATH, got '{}'", value));
    }
    Ok(Library::new(path.trim(), LibraryScope::new(scope.trim().to_string())))
}

pub fn run(args: RepackageArgs) -> anyhow::Result<()> {
    let resolver = LayoutResolver::global();
    let layout = match &args.layout {
        Some(name) => resolver.resolve_by_name(name)?,
        None => resolver
            .resolve_by_file(&args.output)
            .with_context(|| format!("choosing a layout for {}", args.output.display()))?,
    };

    let mut repackager = Repackager::new(layout).with_libraries(args.libraries);
    if let Some(start_class) = args.start_class {
        repackager = repackager.with_start_class(start_class);
    }
    let plan = repackager
        .repackage(&args.classes, &args.output)
        .with_context(|| format!("repackaging into {}", args.output.display()))?;

    let rows: Vec<EntryRow> = plan
        .entries()
        .iter()
        .map(|entry| EntryRow {
            destination: entry.destination.clone(),
            source: entry.source.display().to_string(),
            method: if entry.stored { "stored" } else { "deflated" },
        })
        .collect();
    println!("{}", Table::new(rows));
    for library in plan.excluded() {
        println!("Excluded {} ({})", library.name, library.scope);
    }
    info!(
        "Wrote {} entries to {}",
        plan.entries().len(),
        args.output.display()
    );
    Ok(())
}
