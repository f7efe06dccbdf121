// crates/orgdir-core/src/loader/seed.rs

//! Seed files: a JSON array of `add_data` payloads, optionally gzipped.

use super::{blocking, is_gzip, open_stream};
use crate::directory::Directory;
use crate::error::{ErrorKind, Result};
use crate::model::NewEntry;
use serde::Serialize;
use std::path::Path;

/// Outcome of a seed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub ingested: usize,
    pub skipped: usize,
}

/// Parses a seed file into entries without touching any store.
pub fn read_seed_entries(path: impl AsRef<Path>) -> Result<Vec<NewEntry>> {
    let path = path.as_ref();
    // 1. Shared transport (plain or gzip)
    let reader = open_stream(path, is_gzip(path))?;
    // 2. Payload parsing
    let entries: Vec<NewEntry> = serde_json::from_reader(reader)?;
    Ok(entries)
}

/// **Seed Loader:** ingests every entry of `path` through `add_data`.
///
/// Entries rejected by the caller's rules (duplicate name, nesting too deep)
/// are skipped with a warning. Internal failures abort the run.
pub async fn load_seed_file(directory: &Directory, path: impl AsRef<Path>) -> Result<SeedReport> {
    let path = path.as_ref();
    let source = path.to_path_buf();
    let entries = blocking(move || read_seed_entries(source)).await?;
    tracing::info!(path = %path.display(), entries = entries.len(), "seeding directory");

    let mut report = SeedReport::default();
    for entry in &entries {
        match directory.add_data(entry).await {
            Ok(_) => report.ingested += 1,
            Err(err) if matches!(err.kind(), ErrorKind::Conflict | ErrorKind::Validation) => {
                tracing::warn!(
                    organization = %entry.organization_name,
                    error = %err,
                    "seed entry skipped"
                );
                report.skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }

    tracing::info!(ingested = report.ingested, skipped = report.skipped, "seeding finished");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use std::io::Write;
    use std::sync::Arc;

    const SEED: &str = r#"[
        {"address": "Lenina 1", "latitude": 55.75, "longitude": 37.61,
         "organization_name": "Horns and Hooves", "phone_numbers": ["2-222-222"],
         "activity_names": [{"name": "Food", "sub_activities": [{"name": "Meat"}]}]},
        {"address": "Lenina 2", "latitude": 55.76, "longitude": 37.62,
         "organization_name": "Horns and Hooves"},
        {"address": "Lenina 3", "latitude": 55.77, "longitude": 37.63,
         "organization_name": "Deep",
         "activity_names": [{"name": "a", "sub_activities": [
             {"name": "b", "sub_activities": [
                 {"name": "c", "sub_activities": [
                     {"name": "d", "sub_activities": [{"name": "e"}]}]}]}]}]}
    ]"#;

    #[tokio::test]
    async fn seed_skips_rejected_entries() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SEED.as_bytes()).unwrap();

        let store = MemoryStore::new();
        let directory = Directory::new(Arc::new(store.clone()));
        let report = load_seed_file(&directory, file.path()).await.unwrap();

        assert_eq!(report, SeedReport { ingested: 1, skipped: 2 });
        let stats = store.stats().await;
        assert_eq!(stats.organizations, 1);
        assert_eq!(stats.buildings, 1);
        assert_eq!(stats.activities, 2);
    }

    #[test]
    fn missing_seed_file_is_not_found() {
        let err = read_seed_entries("/definitely/not/here.json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[cfg(feature = "compact")]
    #[test]
    fn gzipped_seed_is_decoded() {
        use flate2::{write::GzEncoder, Compression};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json.gz");
        let mut enc = GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::fast());
        enc.write_all(SEED.as_bytes()).unwrap();
        enc.finish().unwrap();

        let entries = read_seed_entries(&path).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].phone_numbers, vec!["2-222-222".to_string()]);
        assert!(entries[1].activity_names.is_empty());
    }
}
