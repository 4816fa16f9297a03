//! Administrator session management.
//!
//! An [`AuthContext`] is the session of one client: the signed-in
//! administrator (if any), the backend client carrying their bearer token,
//! and the [`TokenStore`] where that token persists between requests. The
//! panel builds one per browser request from the session cookie.
//!
//! The session is populated only after the backend confirmed the token, so
//! `administrator().is_some()` and `is_authorized()` always agree.

mod error;
mod token_store;

pub use error::AuthError;
pub use token_store::{CookieTokenStore, MemoryTokenStore, TOKEN_COOKIE, TokenStore};

use axum::response::Redirect;
use secrecy::SecretString;
use tracing::instrument;

use crate::api::{Administrator, BackendClient};

/// How long a stored token stays valid on the client.
pub const TOKEN_MAX_AGE: time::Duration = time::Duration::hours(2);

/// Where the client should go after a sign-in or sign-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The authenticated landing page.
    Dashboard,
    /// The public login page.
    PublicRoot,
}

impl Navigation {
    /// Target path.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Dashboard => "/app",
            Self::PublicRoot => "/",
        }
    }

    /// Redirect response to the target path.
    #[must_use]
    pub fn redirect(self) -> Redirect {
        Redirect::to(self.path())
    }
}

/// The session of one client.
#[derive(Debug)]
pub struct AuthContext<S> {
    api: BackendClient,
    store: S,
    administrator: Option<Administrator>,
}

impl<S: TokenStore> AuthContext<S> {
    /// Start with an empty session. `api` should not carry a bearer yet.
    #[must_use]
    pub const fn new(api: BackendClient, store: S) -> Self {
        Self {
            api,
            store,
            administrator: None,
        }
    }

    /// Restore the session from the stored token.
    ///
    /// On failure the session stays empty and the stored token is left in
    /// place. No retry is attempted.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingToken` when nothing is stored, or
    /// `AuthError::Restore`/`AuthError::ProfileMissing` when the backend does
    /// not resolve the token to a profile.
    #[instrument(skip(self))]
    pub async fn restore_session(&mut self) -> Result<&Administrator, AuthError> {
        let token = self.store.token().ok_or(AuthError::MissingToken)?;
        self.api = self.api.with_bearer(token);

        let profile = self.api.my_profile().await.map_err(|e| {
            tracing::debug!(error = %e, "Session restore failed");
            AuthError::Restore(e)
        })?;
        let administrator = profile.ok_or_else(|| {
            tracing::debug!("Session restore returned no profile");
            AuthError::ProfileMissing
        })?;

        tracing::debug!(administrator_id = %administrator.id, "Session restored");
        Ok(&*self.administrator.insert(administrator))
    }

    /// Authenticate with the backend and start a session.
    ///
    /// On success the token is persisted for [`TOKEN_MAX_AGE`] and every
    /// later request through [`Self::api`] carries it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Authentication` if the backend rejects the
    /// credentials. Nothing is persisted in that case.
    #[instrument(skip(self, bank_account, password))]
    pub async fn sign_in(
        &mut self,
        bank_account: &str,
        password: &SecretString,
    ) -> Result<Navigation, AuthError> {
        let payload = self
            .api
            .authenticate(bank_account, password)
            .await
            .map_err(AuthError::Authentication)?;

        let token = SecretString::from(payload.token);
        self.store.persist(&token, TOKEN_MAX_AGE);
        self.api = self.api.with_bearer(token);

        tracing::info!(administrator_id = %payload.administrator.id, "Administrator signed in");
        self.administrator = Some(payload.administrator);
        Ok(Navigation::Dashboard)
    }

    /// End the session locally. The backend is not told.
    pub fn sign_out(&mut self) -> Navigation {
        if let Some(administrator) = self.administrator.take() {
            tracing::info!(administrator_id = %administrator.id, "Administrator signed out");
        }
        self.store.remove();
        Navigation::PublicRoot
    }

    /// The signed-in administrator.
    #[must_use]
    pub const fn administrator(&self) -> Option<&Administrator> {
        self.administrator.as_ref()
    }

    /// Whether an administrator is signed in.
    #[must_use]
    pub const fn is_authorized(&self) -> bool {
        self.administrator.is_some()
    }

    /// Backend client carrying the session's bearer token, once there is one.
    #[must_use]
    pub const fn api(&self) -> &BackendClient {
        &self.api
    }

    /// The token store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Give back the token store, e.g. to return its cookies in a response.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }
}
