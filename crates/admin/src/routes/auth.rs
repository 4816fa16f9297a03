//! Authentication route handlers for admin.
//!
//! Provides the login page, sign-in and sign-out.

use askama::Template;
use axum::{
    Form, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::CookieJar;
use secrecy::SecretString;
use serde::Deserialize;
use tracing::instrument;

use crate::filters;
use crate::middleware::OptionalAdminAuth;
use crate::services::auth::{AuthContext, CookieTokenStore, Navigation};
use crate::state::AppState;

use super::render;

/// Login page template.
#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginPageTemplate {
    error: Option<&'static str>,
}

/// Login form fields.
#[derive(Deserialize)]
pub struct LoginForm {
    pub bank_account: String,
    pub password: String,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(login_page))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

/// Render the login page, or skip it when the stored token still works.
///
/// GET /
async fn login_page(OptionalAdminAuth(admin): OptionalAdminAuth) -> Response {
    if admin.is_some() {
        return Navigation::Dashboard.redirect().into_response();
    }
    render(&LoginPageTemplate { error: None }).into_response()
}

/// Sign in and store the token cookie.
///
/// POST /auth/login
#[instrument(skip(state, jar, form))]
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let store = CookieTokenStore::new(jar, state.config().secure_cookies());
    let mut auth = AuthContext::new(state.api().clone(), store);
    let password = SecretString::from(form.password);

    match auth.sign_in(form.bank_account.trim(), &password).await {
        Ok(navigation) => (auth.into_store().into_jar(), navigation.redirect()).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Sign-in rejected");
            render(&LoginPageTemplate {
                error: Some("Credenciais inválidas!"),
            })
            .into_response()
        }
    }
}

/// Sign out and drop the token cookie.
///
/// POST /auth/logout
async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let store = CookieTokenStore::new(jar, state.config().secure_cookies());
    let mut auth = AuthContext::new(state.api().clone(), store);
    let navigation = auth.sign_out();
    crate::error::clear_sentry_user();

    (auth.into_store().into_jar(), navigation.redirect())
}
