//! orgdir-cli — Command-line interface for orgdir-core
//!
//! Seeds a binary snapshot from JSON and runs the directory queries against
//! it. Results are printed as pretty JSON.
//!
//! Usage examples
//! --------------
//!
//! - Build a snapshot from a seed file
//!   $ orgdir seed data/seed.json
//!
//! - Show overall stats
//!   $ orgdir stats
//!
//! - Queries
//!   $ orgdir by-name "Horns and Hooves"
//!   $ orgdir by-activity Meat
//!   $ orgdir radius --lat 55.75 --lon 37.62 -r 5
//!
//! Use `--snapshot <path>` (or `ORGDIR_SNAPSHOT`) to pick the snapshot file.
mod args;

use crate::args::{CliArgs, Commands};
use anyhow::Context;
use clap::Parser;
use orgdir_core::{Directory, DirectoryConfig, MemoryStore, RadiusQuery};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays valid JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let config = load_config(args.config.as_deref())?;

    match args.command {
        #[cfg(feature = "json")]
        Commands::Seed { input } => {
            // Seeding extends an existing snapshot or starts a fresh one.
            let store = if args.snapshot.exists() {
                open_snapshot(&args.snapshot)?
            } else {
                tracing::info!(snapshot = %args.snapshot.display(), "starting a new snapshot");
                MemoryStore::new()
            };
            let directory = Directory::with_config(Arc::new(store.clone()), config);
            let report = orgdir_core::loader::load_seed_file(&directory, &input)
                .await
                .with_context(|| format!("seeding from {}", input.display()))?;
            store.save_snapshot(&args.snapshot).await?;
            tracing::info!(
                snapshot = %args.snapshot.display(),
                ingested = report.ingested,
                skipped = report.skipped,
                "seed written to snapshot"
            );

            println!("Seeded {}:", args.snapshot.display());
            println!("  Ingested: {}", report.ingested);
            println!("  Skipped: {}", report.skipped);
        }

        Commands::Stats => {
            let store = open_snapshot(&args.snapshot)?;
            let stats = store.stats().await;
            println!("Directory statistics:");
            println!("  Buildings: {}", stats.buildings);
            println!("  Organizations: {}", stats.organizations);
            println!("  Activities: {}", stats.activities);
        }

        Commands::All => {
            let directory = open_directory(&args.snapshot, config)?;
            print_json(&directory.all_organizations().await?)?;
        }

        Commands::ByName { name } => {
            let directory = open_directory(&args.snapshot, config)?;
            print_json(&directory.organization_by_name(&name).await?)?;
        }

        Commands::ById { id } => {
            let directory = open_directory(&args.snapshot, config)?;
            print_json(&directory.organization_by_id(id).await?)?;
        }

        Commands::ByAddress { address } => {
            let directory = open_directory(&args.snapshot, config)?;
            print_json(&directory.organizations_by_address(&address).await?)?;
        }

        Commands::ByActivity { activity } => {
            let directory = open_directory(&args.snapshot, config)?;
            print_json(&directory.organizations_by_activity(&activity).await?)?;
        }

        Commands::Radius { lat, lon, radius } => {
            let directory = open_directory(&args.snapshot, config)?;
            let query = RadiusQuery {
                radius,
                latitude: lat,
                longitude: lon,
            };
            print_json(&directory.organizations_by_radius(&query).await?)?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<DirectoryConfig> {
    match path {
        #[cfg(feature = "json")]
        Some(path) => DirectoryConfig::load_from_path(path)
            .with_context(|| format!("reading config {}", path.display())),
        #[cfg(not(feature = "json"))]
        Some(_) => anyhow::bail!("--config needs the `json` feature"),
        None => Ok(DirectoryConfig::default()),
    }
}

fn open_snapshot(path: &Path) -> anyhow::Result<MemoryStore> {
    tracing::debug!(snapshot = %path.display(), "opening snapshot");
    MemoryStore::load_snapshot(path).with_context(|| {
        format!(
            "opening snapshot {} (run `orgdir seed` first?)",
            path.display()
        )
    })
}

fn open_directory(path: &Path, config: DirectoryConfig) -> anyhow::Result<Directory> {
    let store = open_snapshot(path)?;
    Ok(Directory::with_config(Arc::new(store), config))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_snapshot_points_at_seed() {
        let err = open_snapshot(Path::new("/no/such/orgdir.bin")).unwrap_err();
        assert!(err.to_string().contains("run `orgdir seed` first?"));
    }

    #[tokio::test]
    async fn saved_snapshot_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orgdir.bin");
        MemoryStore::new().save_snapshot(&path).await.unwrap();

        let store = open_snapshot(&path).unwrap();
        assert_eq!(store.stats().await.organizations, 0);
    }

    #[test]
    fn radius_accepts_negative_coordinates() {
        let args = CliArgs::try_parse_from([
            "orgdir", "radius", "--lat", "-33.86", "--lon", "151.21", "-r", "5",
        ])
        .unwrap();
        match args.command {
            Commands::Radius { lat, lon, radius } => {
                assert_eq!((lat, lon, radius), (-33.86, 151.21, 5.0));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
