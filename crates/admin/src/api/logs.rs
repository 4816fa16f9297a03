//! Audit log endpoint.

use tracing::instrument;

use super::{ApiError, BackendClient, Log};

impl BackendClient {
    /// List every audit log entry.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_logs(&self) -> Result<Vec<Log>, ApiError> {
        self.get("/log").await
    }
}
