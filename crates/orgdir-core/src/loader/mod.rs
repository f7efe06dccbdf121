// crates/orgdir-core/src/loader/mod.rs

//! # Data Loader
//!
//! Handles the physical layer (file I/O, gzip) and delegates to the
//! payload formats: JSON seed files and binary snapshots.

use crate::error::{DirectoryError, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

#[cfg(feature = "json")]
pub mod seed;
pub mod snapshot;

#[cfg(feature = "json")]
pub use seed::{load_seed_file, SeedReport};

// -----------------------------------------------------------------------------
// INTERNAL TRANSPORT HELPERS
// -----------------------------------------------------------------------------

/// `true` when the path ends in `.gz`.
pub(crate) fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// Opens a file, buffers it, and wraps it in a gzip decoder when `gzip` is set.
pub(crate) fn open_stream(path: &Path, gzip: bool) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| {
        DirectoryError::NotFound(format!("File not found at {}: {}", path.display(), e))
    })?;
    let reader = BufReader::new(file);

    if gzip {
        #[cfg(feature = "compact")]
        {
            use flate2::read::GzDecoder;
            return Ok(Box::new(GzDecoder::new(reader)));
        }
        #[cfg(not(feature = "compact"))]
        {
            return Err(DirectoryError::Validation(format!(
                "{} is gzip-compressed but the `compact` feature is disabled",
                path.display()
            )));
        }
    }
    Ok(Box::new(reader))
}

/// Writes `data` to `path` (truncating), optionally gzip-compressed.
///
/// The encoder trailer and the buffered tail are written explicitly, so a
/// short write surfaces as an error instead of a silently truncated file.
pub(crate) fn write_payload(path: &Path, data: &[u8], gzip: bool) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);

    if gzip {
        #[cfg(feature = "compact")]
        {
            use flate2::{write::GzEncoder, Compression};
            let mut encoder = GzEncoder::new(writer, Compression::default());
            encoder.write_all(data)?;
            writer = encoder.finish()?;
        }
        #[cfg(not(feature = "compact"))]
        {
            return Err(DirectoryError::Validation(format!(
                "cannot write {} compressed: the `compact` feature is disabled",
                path.display()
            )));
        }
    } else {
        writer.write_all(data)?;
    }

    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    Ok(())
}

/// Runs blocking file I/O off the async worker threads.
pub(crate) async fn blocking<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| DirectoryError::Unexpected(format!("blocking I/O task failed: {e}")))?
}
