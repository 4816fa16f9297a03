//! Admin authentication error types.

use thiserror::Error;

use crate::api::ApiError;

/// Errors that can occur during admin authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The backend rejected the credentials, or could not be asked.
    #[error("authentication failed: {0}")]
    Authentication(#[source] ApiError),

    /// No token is stored for this client.
    #[error("no stored session token")]
    MissingToken,

    /// The stored token did not yield a profile.
    #[error("session could not be restored: {0}")]
    Restore(#[source] ApiError),

    /// The backend accepted the token but returned no profile.
    #[error("no administrator profile for the stored token")]
    ProfileMissing,
}
