// crates/orgdir-core/src/loader/snapshot.rs

//! Binary snapshots of the in-memory store (bincode, gzip with `compact`).

use super::{blocking, open_stream, write_payload};
use crate::error::Result;
use crate::store::memory::{MemoryStore, Tables};
use std::io::Read;
use std::path::Path;

const COMPRESSED: bool = cfg!(feature = "compact");

impl MemoryStore {
    /// **Standard Loader:** restores a store from a snapshot written by
    /// [`MemoryStore::save_snapshot`]. Id sequences continue after the
    /// highest restored id.
    pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        // 1. Shared transport
        let mut reader = open_stream(path, COMPRESSED)?;
        // 2. Payload
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        let tables: Tables = bincode::deserialize(&data)?;

        tracing::info!(
            path = %path.display(),
            organizations = tables.organizations.len(),
            "snapshot loaded"
        );
        Ok(Self::from_tables(tables))
    }

    /// Writes the committed tables. Uncommitted units of work are not included.
    pub async fn save_snapshot(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref().to_path_buf();
        let tables = self.tables().await;
        let data = bincode::serialize(&tables)?;
        let bytes = data.len();

        let target = path.clone();
        blocking(move || write_payload(&target, &data, COMPRESSED)).await?;

        tracing::info!(path = %path.display(), bytes, "snapshot saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::Directory;
    use crate::model::{ActivityNode, NewEntry};
    use std::sync::Arc;

    fn entry(name: &str) -> NewEntry {
        NewEntry {
            address: "Tverskaya 7".into(),
            latitude: 55.76,
            longitude: 37.61,
            activity_names: vec![ActivityNode::with_children(
                "Food",
                vec![ActivityNode::leaf("Dairy")],
            )],
            organization_name: name.into(),
            phone_numbers: vec!["8-800".into()],
        }
    }

    #[tokio::test]
    async fn snapshot_restores_rows_and_sequences() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orgdir.bin");

        let store = MemoryStore::new();
        let directory = Directory::new(Arc::new(store.clone()));
        directory.add_data(&entry("Milk Inc")).await.unwrap();
        store.save_snapshot(&path).await.unwrap();

        let restored = MemoryStore::load_snapshot(&path).unwrap();
        assert_eq!(restored.stats().await, store.stats().await);

        let directory = Directory::new(Arc::new(restored));
        let record = directory.organization_by_name("Milk Inc").await.unwrap();
        assert_eq!(record.activity_names[0].sub_activities[0].name, "Dairy");

        // New rows must not collide with restored ids.
        let id = directory.add_data(&entry("Cheese Ltd")).await.unwrap();
        assert_eq!(id, 2);
    }

    #[cfg(feature = "compact")]
    #[tokio::test]
    async fn saved_snapshot_is_a_complete_gzip_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("orgdir.bin");

        let store = MemoryStore::new();
        let directory = Directory::new(Arc::new(store.clone()));
        directory.add_data(&entry("Milk Inc")).await.unwrap();
        store.save_snapshot(&path).await.unwrap();

        // The gzip trailer ends with the uncompressed length (ISIZE, little endian).
        let raw = std::fs::read(&path).unwrap();
        let expected = bincode::serialize(&store.tables().await).unwrap().len() as u32;
        let isize = u32::from_le_bytes(raw[raw.len() - 4..].try_into().unwrap());
        assert_eq!(isize, expected);
        assert_eq!(&raw[..2], &[0x1f, 0x8b]);
    }

    #[test]
    fn missing_snapshot_is_not_found() {
        let err = MemoryStore::load_snapshot("/no/such/orgdir.bin").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::NotFound);
    }
}
