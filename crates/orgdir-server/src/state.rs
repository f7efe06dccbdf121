use crate::error::AppError;
use orgdir_core::Directory;
use std::future::Future;
use std::time::Duration;

/// Shared per-router state, injected as an `Extension`.
#[derive(Clone)]
pub struct AppState {
    pub directory: Directory,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(directory: Directory, request_timeout: Duration) -> Self {
        Self {
            directory,
            request_timeout,
        }
    }

    /// Runs a directory call under the request deadline. On expiry the call
    /// is dropped together with its unit of work.
    pub async fn run<T, F>(&self, fut: F) -> Result<T, AppError>
    where
        F: Future<Output = orgdir_core::Result<T>>,
    {
        match tokio::time::timeout(self.request_timeout, fut).await {
            Ok(result) => result.map_err(AppError::from),
            Err(_) => Err(AppError::Timeout(self.request_timeout)),
        }
    }
}
