use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    name = "pseudo",
    version,
    about = "pseudo - manage pseudopotential files and families for electronic-structure calculations.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to a configuration file in TOML format
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory of the store to operate on, overriding the configuration
    #[arg(short, long, global = true, value_name = "DIR")]
    pub store: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create and inspect pseudopotential families.
    Family(FamilyArgs),
    /// Parse a single pseudopotential file without storing it.
    Inspect(InspectArgs),
}

/// Arguments for the `family` subcommand.
#[derive(Args, Debug)]
pub struct FamilyArgs {
    #[command(subcommand)]
    pub command: FamilyCommands,
}

#[derive(Subcommand, Debug)]
pub enum FamilyCommands {
    /// Create a new family from a directory containing only pseudopotential files.
    CreateFromFolder {
        /// Directory with one pseudopotential file per element.
        #[arg(required = true, value_name = "DIR")]
        dirpath: PathBuf,

        /// Unique label of the new family.
        #[arg(required = true)]
        label: String,

        /// Free-form description of the family.
        #[arg(short, long, default_value = "")]
        description: String,

        /// Record type of the members (pseudo, pseudo.upf, pseudo.vps).
        #[arg(short = 'T', long, value_name = "TYPE")]
        pseudo_type: Option<String>,
    },
    /// List the labels of all stored families.
    List,
    /// Show a family and its members.
    Show {
        #[arg(required = true)]
        label: String,
    },
    /// Show the member of a family for one element.
    Get {
        #[arg(required = true)]
        label: String,
        #[arg(required = true)]
        element: String,
    },
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to the pseudopotential file.
    #[arg(required = true, value_name = "PATH")]
    pub path: PathBuf,

    /// Record type used to parse the file (pseudo, pseudo.upf, pseudo.vps).
    #[arg(short = 'T', long, value_name = "TYPE")]
    pub pseudo_type: Option<String>,
}
