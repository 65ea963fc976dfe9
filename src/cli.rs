use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "kmpgen",
    about = "Generate a Kotlin Multiplatform project from the bundled template",
    version
)]
pub struct Cli {
    /// Template directory (default: the parent of the directory holding this executable)
    #[arg(long, global = true, env = "KMPGEN_TEMPLATE_ROOT", value_name = "DIR")]
    pub template_root: Option<PathBuf>,

    /// Config file (default: kmpgen/config.toml in the user config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print structured JSON to stdout instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Log more detail to stderr (repeat for more)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a new project from the template
    Generate {
        /// Project name, e.g. WeatherApp (letters and digits, starting with a letter)
        #[arg(short = 'n', long = "name")]
        project_name: String,

        /// Package name, e.g. com.company.app
        #[arg(short, long = "package")]
        package_name: String,

        /// Directory to create the project in (must be empty or absent)
        #[arg(short, long)]
        output: String,

        /// iOS bundle identifier (default: the package name)
        #[arg(long, alias = "ios-bundle-id")]
        bundle_id: Option<String>,
    },

    /// Check a generated project for leftover template references
    Validate {
        /// Path to the project (default: current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// List dependency versions declared by the template
    Deps,
}
