// crates/orgdir-core/src/directory.rs
use crate::config::DirectoryConfig;
use crate::error::{DirectoryError, Result};
use crate::store::{DirectoryStore, UnitOfWork};
use std::sync::Arc;

/// The directory service.
///
/// Holds the store and the behavioral config. Every public operation (see
/// `ingest.rs` and `query.rs`) runs inside exactly one unit of work:
/// committed on success, rolled back on any error.
#[derive(Clone)]
pub struct Directory {
    pub(crate) store: Arc<dyn DirectoryStore>,
    pub(crate) config: DirectoryConfig,
}

impl Directory {
    pub fn new(store: Arc<dyn DirectoryStore>) -> Self {
        Self::with_config(store, DirectoryConfig::default())
    }

    pub fn with_config(store: Arc<dyn DirectoryStore>, config: DirectoryConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn DirectoryStore> {
        &self.store
    }

    /// Ends a unit of work according to `result`.
    pub(crate) async fn finish<T>(
        &self,
        operation: &'static str,
        uow: Box<dyn UnitOfWork>,
        result: Result<T>,
    ) -> Result<T> {
        match result {
            Ok(value) => match uow.commit().await {
                Ok(()) => Ok(value),
                Err(err) => {
                    log_failure(operation, &err);
                    Err(err)
                }
            },
            Err(err) => {
                log_failure(operation, &err);
                if let Err(rollback_err) = uow.rollback().await {
                    tracing::error!(operation, error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }
}

fn log_failure(operation: &'static str, err: &DirectoryError) {
    if err.kind().is_internal() {
        tracing::error!(
            operation,
            error = %err,
            kind = ?err.kind(),
            "directory operation failed"
        );
    } else {
        tracing::debug!(
            operation,
            error = %err,
            kind = ?err.kind(),
            "directory operation rejected"
        );
    }
}
