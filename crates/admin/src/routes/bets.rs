//! Confirmed bets: list, search and delete.

use askama::Template;
use axum::{
    Router,
    extract::{Path, Query},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use bicho_core::{Action, BetId};
use tracing::instrument;

use crate::api::Bet;
use crate::error::AppError;
use crate::filters;
use crate::middleware::{RequireAdminAuth, require};
use crate::state::AppState;

use super::{AdminView, Outcome, SearchParams, confirm_page, notice_page, render};

const PATH: &str = "/app/bet";

const DELETED: Outcome = Outcome {
    success: "Aposta eliminada!",
    failure: "Aposta não pode ser eliminada!",
};

fn matches(bet: &Bet, query: &str) -> bool {
    bet.haystack().contains(query)
}

/// Bets list template.
#[derive(Template)]
#[template(path = "bets/index.html")]
pub struct BetsTemplate {
    pub admin: AdminView,
    pub query: String,
    pub total: usize,
    pub bets: Vec<Bet>,
}

/// Build the bets router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(PATH, get(index))
        .route("/app/bet/{id}/delete", get(confirm_delete).post(delete))
}

/// Bets list page.
///
/// GET /app/bet?q=
#[instrument(skip(admin))]
async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    Query(params): Query<SearchParams>,
) -> Result<Html<String>, AppError> {
    let bets = admin.api.list_bets().await?;
    let total = bets.len();
    let search = params.apply(bets, matches);

    Ok(render(&BetsTemplate {
        admin: AdminView::new(&admin, PATH),
        query: params.query().to_string(),
        total,
        bets: search.to_vec(),
    }))
}

/// Ask before deleting a bet.
///
/// GET /app/bet/{id}/delete
async fn confirm_delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<BetId>,
) -> Response {
    if let Err(redirect) = require(&admin, Action::DeleteBet) {
        return redirect.into_response();
    }

    confirm_page(
        &admin,
        PATH,
        format!("Tem certeza que deseja eliminar a aposta (id: {id})?"),
        format!("{PATH}/{}/delete", urlencoding::encode(id.as_str())),
    )
    .into_response()
}

/// Delete a bet and acknowledge the outcome.
///
/// POST /app/bet/{id}/delete
#[instrument(skip_all, fields(bet_id = %id))]
async fn delete(RequireAdminAuth(admin): RequireAdminAuth, Path(id): Path<BetId>) -> Response {
    if let Err(redirect) = require(&admin, Action::DeleteBet) {
        return redirect.into_response();
    }

    let result = admin.api.delete_bet(&id).await;
    notice_page(&admin, PATH, result, DELETED).into_response()
}
