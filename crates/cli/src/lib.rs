mod conditions;
mod health;
mod layout;
mod platform;
mod repackage;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "bootkit",
    version,
    about = "Packaging layouts, auto-configuration reports and health checks",
    long_about = "bootkit inspects and applies archive layouts (executable jar, war, expanded \
                  directory, plain archive), shows which auto-configurations apply to a declared \
                  classpath and configuration, and reports application health."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the layout chosen for a target file or layout name
    #[command(
        long_about = "Resolves a layout either from the shape of a target (extension, or an \
                            existing directory) or by its registered name, and prints its launcher, \
                            classes location and library destinations."
    )]
    Layout(layout::LayoutArgs),
    /// List registered layout names
    Layouts,
    /// Package compiled classes and libraries into an archive
    #[command(
        long_about = "Writes OUTPUT using the layout resolved from OUTPUT (or --layout). An existing \
                            directory is filled in place; anything else becomes a zip archive with a \
                            manifest."
    )]
    Repackage(repackage::RepackageArgs),
    /// Detect the cloud platform the process runs on
    Platform {
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Print the auto-configuration condition report
    Conditions {
        #[command(flatten)]
        config: ConfigArgs,
        #[command(flatten)]
        classpath: ClassPathArgs,
    },
    /// Build the application context and print its health
    Health {
        #[command(flatten)]
        config: ConfigArgs,
        #[command(flatten)]
        classpath: ClassPathArgs,
    },
}

#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Directory holding application.json and its profile variants
    #[arg(long, value_name = "DIR")]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct ClassPathArgs {
    /// Class to declare as present (repeatable)
    #[arg(long = "class", value_name = "NAME")]
    pub classes: Vec<String>,
    /// Directory searched for classpath: resources (repeatable)
    #[arg(long = "resources", value_name = "DIR")]
    pub resource_roots: Vec<PathBuf>,
}

impl ClassPathArgs {
    pub fn to_classpath(&self) -> bootkit_core::ClassPath {
        self.resource_roots.iter().fold(
            bootkit_core::ClassPath::new().with_classes(self.classes.iter().cloned()),
            |classpath, root| classpath.with_resource_root(root.clone()),
        )
    }
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = bootkit_runtime::init_logging("cli", false);

    match cli.command {
        Commands::Layout(args) => layout::run(args),
        Commands::Layouts => layout::list(),
        Commands::Repackage(args) => repackage::run(args),
        Commands::Platform { config } => platform::run(config),
        Commands::Conditions { config, classpath } => conditions::run(config, classpath),
        Commands::Health { config, classpath } => health::run(config, classpath),
    }
}
