//! Command-line interface.

pub mod info;
pub mod process;
pub mod validate;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "caseflow",
    about = "Legal case processing pipeline: extract, consolidate, validate",
    version
)]
pub struct Cli {
    /// Path to config.toml (default: ~/.caseflow/config.toml)
    #[arg(long, global = true, env = "CASEFLOW_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Process a case folder into a hydrated case record
    Process {
        /// Case folder containing the source documents
        case_folder: PathBuf,

        /// Output root (artifacts land under <output>/cases/<case_name>/)
        #[arg(short, long, default_value = "outputs")]
        output: PathBuf,

        /// What to do when an output file already exists
        #[arg(long, value_enum, default_value_t = OverwriteArg::Version)]
        overwrite: OverwriteArg,
    },

    /// Validate an existing hydrated JSON file
    Validate {
        /// Path to a hydrated_FCRA_*.json file
        hydrated_json: PathBuf,
    },

    /// Show supported formats and active configuration
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OverwriteArg {
    /// Append _vN with the smallest unused N
    Version,
    /// Replace existing files
    Overwrite,
    /// Fail if an output file exists
    Error,
}

impl From<OverwriteArg> for caseflow_output::OverwritePolicy {
    fn from(arg: OverwriteArg) -> Self {
        match arg {
            OverwriteArg::Version => caseflow_output::OverwritePolicy::Version,
            OverwriteArg::Overwrite => caseflow_output::OverwritePolicy::Overwrite,
            OverwriteArg::Error => caseflow_output::OverwritePolicy::Error,
        }
    }
}
