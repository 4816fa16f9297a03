//! Authentication extractors and role guards for admin.
//!
//! The session is rebuilt on every request: the bearer token is read from the
//! session cookie and resolved to a profile by the backend.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use bicho_core::permissions::{self, Action, Principal};
use bicho_core::Role;

use crate::api::{Administrator, BackendClient};
use crate::error::set_sentry_user;
use crate::services::auth::{AuthContext, CookieTokenStore, Navigation};
use crate::state::AppState;

/// The signed-in administrator of the current request.
#[derive(Debug, Clone)]
pub struct CurrentAdmin {
    /// Profile as the backend returned it.
    pub administrator: Administrator,
    /// Backend client carrying the administrator's bearer token.
    pub api: BackendClient,
}

impl CurrentAdmin {
    /// Role of the signed-in administrator.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.administrator.role
    }

    /// Identity for permission checks.
    #[must_use]
    pub const fn principal(&self) -> Principal<'_> {
        Principal::new(&self.administrator.id, self.administrator.role)
    }

    /// Whether the role allows `action`.
    #[must_use]
    pub const fn can(&self, action: Action) -> bool {
        permissions::can(self.administrator.role, action)
    }

    /// Whether the administrator may edit or delete `target`.
    #[must_use]
    pub fn can_modify(&self, target: &Administrator) -> bool {
        permissions::can_modify(self.principal(), Principal::new(&target.id, target.role))
    }
}

/// Refuse `action` to a role that ranks too low, sending it back to the
/// dashboard.
///
/// # Errors
///
/// Returns a redirect to `/app` when the role is insufficient.
pub fn require(admin: &CurrentAdmin, action: Action) -> Result<(), Redirect> {
    if admin.can(action) {
        Ok(())
    } else {
        tracing::info!(
            administrator_id = %admin.administrator.id,
            role = %admin.role(),
            ?action,
            "Insufficient role"
        );
        Err(Navigation::Dashboard.redirect())
    }
}

/// Resolve the session cookie in `jar` to a signed-in administrator.
pub async fn restore(state: &AppState, jar: CookieJar) -> Option<CurrentAdmin> {
    let store = CookieTokenStore::new(jar, state.config().secure_cookies());
    let mut auth = AuthContext::new(state.api().clone(), store);

    let administrator = auth.restore_session().await.ok()?.clone();
    set_sentry_user(&administrator.id, &administrator.name);

    Some(CurrentAdmin {
        administrator,
        api: auth.api().clone(),
    })
}

/// Extractor that requires a signed-in administrator.
///
/// Without a stored token, or when the backend does not accept it, the
/// request is redirected to the public login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminAuth(admin): RequireAdminAuth,
/// ) -> impl IntoResponse {
///     format!("Olá, {}!", admin.administrator.name)
/// }
/// ```
pub struct RequireAdminAuth(pub CurrentAdmin);

/// Error returned when a signed-in administrator is required but missing.
pub enum AdminAuthRejection {
    /// Redirect to the login page.
    RedirectToLogin,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Navigation::PublicRoot.redirect().into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAdminAuth {
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        restore(state, jar)
            .await
            .map(Self)
            .ok_or(AdminAuthRejection::RedirectToLogin)
    }
}

/// Extractor that optionally gets the signed-in administrator.
///
/// Unlike `RequireAdminAuth`, this does not reject the request.
pub struct OptionalAdminAuth(pub Option<CurrentAdmin>);

impl FromRequestParts<AppState> for OptionalAdminAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(Self(restore(state, jar).await))
    }
}
