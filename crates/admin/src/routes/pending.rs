//! Pending bets: list, search and validate by token.

use askama::Template;
use axum::{
    Router,
    extract::{Path, Query},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use bicho_core::Action;
use tracing::instrument;

use crate::api::PendingBet;
use crate::error::AppError;
use crate::filters;
use crate::middleware::{RequireAdminAuth, require};
use crate::state::AppState;

use super::{AdminView, Outcome, SearchParams, confirm_page, notice_page, render};

const PATH: &str = "/app/pending";

const VALIDATED: Outcome = Outcome {
    success: "Aposta validada!",
    failure: "Aposta não pode ser validada!",
};

fn matches(pending: &PendingBet, query: &str) -> bool {
    pending.haystack().contains(query)
}

/// Pending bets list template.
#[derive(Template)]
#[template(path = "bets/pending.html")]
pub struct PendingTemplate {
    pub admin: AdminView,
    pub query: String,
    pub total: usize,
    pub bets: Vec<PendingBet>,
}

/// Build the pending bets router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(PATH, get(index))
        .route(
            "/app/pending/{token}/validate",
            get(confirm_validate).post(validate),
        )
}

/// Pending bets list page.
///
/// GET /app/pending?q=
#[instrument(skip(admin))]
async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    Query(params): Query<SearchParams>,
) -> Result<Html<String>, AppError> {
    let bets = admin.api.list_pending_bets().await?;
    let total = bets.len();
    let search = params.apply(bets, matches);

    Ok(render(&PendingTemplate {
        admin: AdminView::new(&admin, PATH),
        query: params.query().to_string(),
        total,
        bets: search.to_vec(),
    }))
}

/// Ask before validating a pending bet.
///
/// GET /app/pending/{token}/validate
async fn confirm_validate(
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(token): Path<String>,
) -> Response {
    if let Err(redirect) = require(&admin, Action::ValidateBet) {
        return redirect.into_response();
    }

    confirm_page(
        &admin,
        PATH,
        format!("Tem certeza que deseja validar a aposta (token: {token})?"),
        format!("{PATH}/{}/validate", urlencoding::encode(&token)),
    )
    .into_response()
}

/// Validate a pending bet and acknowledge the outcome.
///
/// POST /app/pending/{token}/validate
#[instrument(skip_all)]
async fn validate(RequireAdminAuth(admin): RequireAdminAuth, Path(token): Path<String>) -> Response {
    if let Err(redirect) = require(&admin, Action::ValidateBet) {
        return redirect.into_response();
    }

    let result = admin.api.validate_bet(&token).await;
    notice_page(&admin, PATH, result, VALIDATED).into_response()
}
