use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for orgdir-cli
#[derive(Debug, Parser)]
#[command(
    name = "orgdir",
    version,
    about = "CLI for seeding and querying an orgdir-core snapshot"
)]
pub struct CliArgs {
    /// Path to the binary snapshot the commands operate on
    #[arg(
        short = 's',
        long = "snapshot",
        global = true,
        env = "ORGDIR_SNAPSHOT",
        default_value = "orgdir.bin"
    )]
    pub snapshot: PathBuf,

    /// Optional JSON file with directory settings (nesting cap, tree mode, ...)
    #[arg(short = 'c', long = "config", global = true, env = "ORGDIR_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Ingest a seed file (JSON array of entries, optionally .gz) into the snapshot
    #[cfg(feature = "json")]
    Seed {
        /// Seed file path
        input: PathBuf,
    },

    /// Show a summary of the snapshot contents
    Stats,

    /// List all organizations ordered by name
    All,

    /// Lookup an organization by exact name
    ByName {
        name: String,
    },

    /// Lookup an organization by id
    ById {
        id: i64,
    },

    /// List organizations at an exact address
    ByAddress {
        address: String,
    },

    /// List organizations having an activity with this exact name
    ByActivity {
        activity: String,
    },

    /// List organizations within a radius (km) of a point
    Radius {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Radius in kilometers
        #[arg(short = 'r', long)]
        radius: f64,
    },
}
