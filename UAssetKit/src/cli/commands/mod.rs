use clap::Subcommand;
use std::path::PathBuf;

pub mod edit;
pub mod inspect;

#[derive(Subcommand)]
pub enum Commands {
    /// Show counts, key offsets and the first names of an asset
    Info {
        /// Source .uasset file
        path: PathBuf,

        /// Number of names to list
        #[arg(short, long, default_value_t = 20)]
        limit: usize,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the name table
    Names {
        /// Source .uasset file
        path: PathBuf,

        /// Only list names containing this text (case-insensitive)
        #[arg(long)]
        filter: Option<String>,
    },

    /// List the import table with resolved names
    Imports {
        /// Source .uasset file
        path: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List exports found by the read-only export scan
    Exports {
        /// Source .uasset file
        path: PathBuf,
    },

    /// Add names to the name table
    AddName {
        /// Source .uasset file
        path: PathBuf,

        /// Names to add (existing names are left alone)
        #[arg(required = true)]
        names: Vec<String>,

        /// Output .uasset file (a .uexp is written next to it when present)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Add an import, adding its names as needed
    AddImport {
        /// Source .uasset file
        path: PathBuf,

        /// Package defining the class (e.g., "/Script/UMG")
        #[arg(long)]
        class_package: String,

        /// Class of the imported object (e.g., "WidgetBlueprintGeneratedClass")
        #[arg(long)]
        class_name: String,

        /// Name of the imported object
        #[arg(long)]
        object_name: String,

        /// Outer import index (0 = top level, otherwise negative)
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        outer: i32,

        /// Output .uasset file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Apply a TOML patch plan of names and imports
    Patch {
        /// Source .uasset file
        path: PathBuf,

        /// Patch plan (TOML)
        #[arg(short, long)]
        plan: PathBuf,

        /// Output .uasset file
        #[arg(short, long)]
        output: PathBuf,

        /// Print the report as JSON instead of step output
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Info { path, limit, json } => inspect::info(path, *limit, *json),
            Commands::Names { path, filter } => inspect::names(path, filter.as_deref()),
            Commands::Imports { path, json } => inspect::imports(path, *json),
            Commands::Exports { path } => inspect::exports(path),
            Commands::AddName {
                path,
                names,
                output,
            } => edit::add_names(path, names, output),
            Commands::AddImport {
                path,
                class_package,
                class_name,
                object_name,
                outer,
                output,
            } => edit::add_import(path, class_package, class_name, object_name, *outer, output),
            Commands::Patch {
                path,
                plan,
                output,
                json,
            } => edit::patch(path, plan, output, *json),
        }
    }
}
