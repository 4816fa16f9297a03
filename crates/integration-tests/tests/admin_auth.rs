//! Integration tests for administrator sign-in, session restore and sign-out.
//!
//! The session logic is exercised twice: directly through `AuthContext` with
//! an in-memory token store, and through the panel's login routes with the
//! cookie store.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use bicho_admin::api::{ApiError, BackendClient};
use bicho_admin::services::auth::{
    AuthContext, AuthError, MemoryTokenStore, Navigation, TOKEN_COOKIE, TOKEN_MAX_AGE, TokenStore,
};
use bicho_core::{AdministratorId, Role};
use bicho_integration_tests::{
    Fixtures, StubBackend, account, form_request, get_request, send,
};
use secrecy::{ExposeSecret, SecretString};

const PASSWORD: &str = "suasenhasuperforte";

async fn backend() -> StubBackend {
    StubBackend::spawn(Fixtures {
        accounts: vec![account("a1", "ADMIN", "Ana", "61234567", PASSWORD)],
        ..Fixtures::default()
    })
    .await
}

fn context(backend: &StubBackend, store: MemoryTokenStore) -> AuthContext<MemoryTokenStore> {
    AuthContext::new(BackendClient::new(backend.url()).unwrap(), store)
}

// =============================================================================
// AuthContext
// =============================================================================

#[tokio::test]
async fn test_sign_in_persists_token() {
    let backend = backend().await;
    let mut auth = context(&backend, MemoryTokenStore::new());

    let navigation = auth
        .sign_in("61234567", &SecretString::from(PASSWORD))
        .await
        .unwrap();

    assert_eq!(navigation, Navigation::Dashboard);
    assert!(auth.is_authorized());
    assert!(auth.api().has_bearer());
    let administrator = auth.administrator().unwrap();
    assert_eq!(administrator.id, AdministratorId::new("a1"));
    assert_eq!(administrator.role, Role::Admin);
    assert_eq!(administrator.bank_account, "61234567");

    let profile = auth.api().my_profile().await.unwrap().unwrap();
    assert_eq!(profile.id, AdministratorId::new("a1"));

    let anonymous = context(&backend, MemoryTokenStore::new());
    assert!(matches!(
        anonymous.api().my_profile().await.unwrap_err(),
        ApiError::Unauthorized
    ));

    let store = auth.into_store();
    assert_eq!(store.token().unwrap().expose_secret(), "token-a1");
    assert_eq!(store.max_age(), Some(TOKEN_MAX_AGE));
}

#[tokio::test]
async fn test_sign_in_rejected_leaves_session_empty() {
    let backend = backend().await;
    let mut auth = context(&backend, MemoryTokenStore::new());

    let err = auth
        .sign_in("61234567", &SecretString::from("senhaerradaerrada"))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Authentication(_)));
    assert!(!auth.is_authorized());
    assert!(auth.administrator().is_none());
    assert!(auth.store().token().is_none());
}

#[tokio::test]
async fn test_restore_session_with_valid_token() {
    let backend = backend().await;
    let mut auth = context(&backend, MemoryTokenStore::with_token("token-a1"));

    let administrator = auth.restore_session().await.unwrap();
    assert_eq!(administrator.name, "Ana");
    assert!(auth.is_authorized());
}

#[tokio::test]
async fn test_restore_session_with_stale_token_keeps_it() {
    let backend = backend().await;
    let mut auth = context(&backend, MemoryTokenStore::with_token("token-gone"));

    let err = auth.restore_session().await.unwrap_err();
    assert!(matches!(err, AuthError::Restore(_)));
    assert!(!auth.is_authorized());
    assert_eq!(
        auth.store().token().unwrap().expose_secret(),
        "token-gone"
    );
}

#[tokio::test]
async fn test_restore_session_without_token() {
    let backend = backend().await;
    let mut auth = context(&backend, MemoryTokenStore::new());

    assert!(matches!(
        auth.restore_session().await.unwrap_err(),
        AuthError::MissingToken
    ));
}

#[tokio::test]
async fn test_sign_out_clears_session() {
    let backend = backend().await;
    let mut auth = context(&backend, MemoryTokenStore::new());
    auth.sign_in("61234567", &SecretString::from(PASSWORD))
        .await
        .unwrap();

    assert_eq!(auth.sign_out(), Navigation::PublicRoot);
    assert!(!auth.is_authorized());
    assert!(auth.store().token().is_none());
}

// =============================================================================
// Login routes
// =============================================================================

#[tokio::test]
async fn test_login_sets_cookie_and_redirects() {
    let backend = backend().await;
    let app = backend.panel();

    let page = send(
        &app,
        form_request(
            "/auth/login",
            &format!("bank_account=61234567&password={PASSWORD}"),
            None,
        ),
    )
    .await;

    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location(), Some("/app"));
    let cookie = page
        .set_cookies()
        .into_iter()
        .find(|c| c.starts_with(TOKEN_COOKIE))
        .unwrap();
    assert!(cookie.starts_with(&format!("{TOKEN_COOKIE}=token-a1")));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));
    assert!(cookie.contains("Max-Age=7200"));
}

#[tokio::test]
async fn test_login_with_wrong_password_shows_error() {
    let backend = backend().await;
    let app = backend.panel();

    let page = send(
        &app,
        form_request(
            "/auth/login",
            "bank_account=61234567&password=naoeessaasenha",
            None,
        ),
    )
    .await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Credenciais inválidas!"));
    assert!(page.set_cookies().is_empty());
}

#[tokio::test]
async fn test_login_page_skipped_when_signed_in() {
    let backend = backend().await;
    let app = backend.panel();

    let page = send(&app, get_request("/", Some("token-a1"))).await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location(), Some("/app"));

    let page = send(&app, get_request("/", Some("token-gone"))).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains(r#"action="/auth/login""#));
}

#[tokio::test]
async fn test_protected_page_redirects_to_login() {
    let backend = backend().await;
    let app = backend.panel();

    for path in ["/app", "/app/bet", "/app/me"] {
        let page = send(&app, get_request(path, None)).await;
        assert_eq!(page.status, StatusCode::SEE_OTHER, "{path}");
        assert_eq!(page.location(), Some("/"), "{path}");
    }

    let page = send(&app, get_request("/app", Some("token-gone"))).await;
    assert_eq!(page.location(), Some("/"));
}

#[tokio::test]
async fn test_logout_removes_cookie() {
    let backend = backend().await;
    let app = backend.panel();

    let page = send(&app, form_request("/auth/logout", "", Some("token-a1"))).await;

    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location(), Some("/"));
    let cookie = page
        .set_cookies()
        .into_iter()
        .find(|c| c.starts_with(TOKEN_COOKIE))
        .unwrap();
    assert!(cookie.contains("Max-Age=0"));
}
