//! Unified error handling for admin.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bicho_core::AdministratorId;
use thiserror::Error;

use crate::api::ApiError;
use crate::services::auth::Navigation;

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Betting backend call failed while reading a page's data.
    #[error("Backend error: {0}")]
    Backend(#[from] ApiError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let Self::Backend(api) = &self;

        match api {
            // Token expired between the session restore and the read
            ApiError::Unauthorized => {
                tracing::info!("Backend refused the session token");
                Navigation::PublicRoot.redirect().into_response()
            }
            ApiError::NotFound(path) => {
                tracing::warn!(path = %path, "Backend resource not found");
                (StatusCode::NOT_FOUND, "Não encontrado").into_response()
            }
            _ => {
                let event_id = sentry::capture_error(&self);
                tracing::error!(
                    error = %self,
                    sentry_event_id = %event_id,
                    "Admin request error"
                );

                // Don't expose backend details to clients
                (
                    StatusCode::BAD_GATEWAY,
                    "Falha ao comunicar com o servidor de apostas",
                )
                    .into_response()
            }
        }
    }
}

/// Set the Sentry user context from the signed-in administrator.
pub fn set_sentry_user(administrator_id: &AdministratorId, name: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(administrator_id.to_string()),
            username: Some(name.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
