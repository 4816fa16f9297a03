//! The signed-in administrator's own profile and password.

use askama::Template;
use axum::{
    Form, Router,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use secrecy::SecretString;
use serde::Deserialize;
use tracing::instrument;

use crate::api::Administrator;
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

use super::administrators::validate_password;
use super::{AdminView, Outcome, notice_page, render};

const PATH: &str = "/app/me";

const PASSWORD_CHANGED: Outcome = Outcome {
    success: "Senha editada!",
    failure: "Senha não pode ser editada!",
};

/// Profile page template.
#[derive(Template)]
#[template(path = "me/index.html")]
pub struct ProfileTemplate {
    pub admin: AdminView,
    pub profile: Administrator,
}

/// Password change form template.
#[derive(Template)]
#[template(path = "me/password.html")]
pub struct PasswordTemplate {
    pub admin: AdminView,
    pub error: Option<&'static str>,
}

/// Password change form data.
#[derive(Deserialize)]
pub struct PasswordForm {
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirmation: String,
}

impl PasswordForm {
    /// Check length and that both fields agree.
    ///
    /// # Errors
    ///
    /// Returns the message to show above the form.
    pub fn validate(&self) -> Result<SecretString, &'static str> {
        validate_password(&self.password)?;
        if self.password != self.confirmation {
            return Err("Senhas não coincidem");
        }
        Ok(SecretString::from(self.password.clone()))
    }
}

/// Build the profile router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(PATH, get(profile))
        .route("/app/me/password", get(password_form).post(change_password))
}

/// Profile page.
///
/// GET /app/me
async fn profile(RequireAdminAuth(admin): RequireAdminAuth) -> Html<String> {
    render(&ProfileTemplate {
        admin: AdminView::new(&admin, PATH),
        profile: admin.administrator.clone(),
    })
}

/// GET /app/me/password
async fn password_form(RequireAdminAuth(admin): RequireAdminAuth) -> Html<String> {
    render(&PasswordTemplate {
        admin: AdminView::new(&admin, PATH),
        error: None,
    })
}

/// Change the signed-in administrator's password.
///
/// POST /app/me/password
#[instrument(skip_all, fields(administrator_id = %admin.administrator.id))]
async fn change_password(
    RequireAdminAuth(admin): RequireAdminAuth,
    Form(form): Form<PasswordForm>,
) -> Response {
    match form.validate() {
        Ok(password) => {
            let result = admin
                .api
                .update_password(&admin.administrator.id, &password)
                .await;
            notice_page(&admin, PATH, result, PASSWORD_CHANGED).into_response()
        }
        Err(error) => render(&PasswordTemplate {
            admin: AdminView::new(&admin, PATH),
            error: Some(error),
        })
        .into_response(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn form(password: &str, confirmation: &str) -> PasswordForm {
        PasswordForm {
            password: password.to_string(),
            confirmation: confirmation.to_string(),
        }
    }

    #[test]
    fn test_password_form_accepts_matching() {
        let password = form("suasenhasuperforte", "suasenhasuperforte")
            .validate()
            .unwrap();
        assert_eq!(password.expose_secret(), "suasenhasuperforte");
    }

    #[test]
    fn test_password_form_rejects() {
        assert_eq!(
            form("curta", "curta").validate().unwrap_err(),
            "Senha deve ter entre 12 e 128 caracteres"
        );
        assert_eq!(
            form("suasenhasuperforte", "outrasenhaqualquer").validate().unwrap_err(),
            "Senhas não coincidem"
        );
    }

    #[test]
    fn test_profile_page_renders() {
        let admin = super::super::test_support::current(bicho_core::Role::SuperAdmin);
        let html = render(&ProfileTemplate {
            admin: AdminView::new(&admin, PATH),
            profile: admin.administrator.clone(),
        })
        .0;
        assert!(html.contains(&admin.administrator.name));
        assert!(html.contains("SUPER ADMIN"));
    }
}
