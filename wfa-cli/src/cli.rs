use std::path::PathBuf;

use clap::{Parser, Subcommand, crate_description, crate_version};

#[derive(Debug, Parser)]
#[command(
    long_about = crate_description!(),
    propagate_version = true,
    version = crate_version!(),
)]
pub struct Arguments {
    /// Path to a YAML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Action,
}

#[derive(Debug, Subcommand)]
#[clap(rename_all = "kebab_case")]
pub enum Action {
    /// Resolve and print the attribute flags of each path
    Stat {
        /// Paths in native syntax; a trailing wildcard matches a single entry
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Run every query strategy against one path and report each outcome
    Probe {
        /// Path to probe
        path: PathBuf,
    },

    /// Overwrite the attribute flags of a path
    Set {
        /// Path to modify
        path: PathBuf,

        /// Flag names to apply; NORMAL on its own clears every other flag
        #[arg(required = true)]
        flags: Vec<String>,
    },
}
