//! Winners: list, search and pay.

use askama::Template;
use axum::{
    Router,
    extract::{Path, Query},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use bicho_core::{Action, WinnerId};
use tracing::instrument;

use crate::api::Winner;
use crate::error::AppError;
use crate::filters;
use crate::middleware::{RequireAdminAuth, require};
use crate::state::AppState;

use super::{AdminView, Outcome, SearchParams, confirm_page, notice_page, render};

const PATH: &str = "/app/winner";

const PAID: Outcome = Outcome {
    success: "Vencedor pago!",
    failure: "Vencedor não pode ser pago!",
};

fn matches(winner: &Winner, query: &str) -> bool {
    winner.haystack().contains(query)
}

/// Winners list template.
#[derive(Template)]
#[template(path = "winners.html")]
pub struct WinnersTemplate {
    pub admin: AdminView,
    pub query: String,
    pub total: usize,
    pub winners: Vec<Winner>,
    /// Whether the pay button is offered (on unpaid winners only).
    pub can_pay: bool,
}

/// Build the winners router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(PATH, get(index))
        .route("/app/winner/{id}/pay", get(confirm_pay).post(pay))
}

/// Winners list page.
///
/// GET /app/winner?q=
#[instrument(skip(admin))]
async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    Query(params): Query<SearchParams>,
) -> Result<Html<String>, AppError> {
    let winners = admin.api.list_winners().await?;
    let total = winners.len();
    let search = params.apply(winners, matches);

    Ok(render(&WinnersTemplate {
        admin: AdminView::new(&admin, PATH),
        query: params.query().to_string(),
        total,
        winners: search.to_vec(),
        can_pay: admin.can(Action::PayWinner),
    }))
}

/// Ask before paying a winner.
///
/// GET /app/winner/{id}/pay
async fn confirm_pay(
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<WinnerId>,
) -> Response {
    if let Err(redirect) = require(&admin, Action::PayWinner) {
        return redirect.into_response();
    }

    confirm_page(
        &admin,
        PATH,
        format!("Tem certeza que deseja pagar o vencedor (id: {id})?"),
        format!("{PATH}/{}/pay", urlencoding::encode(id.as_str())),
    )
    .into_response()
}

/// Pay a winner and acknowledge the outcome.
///
/// POST /app/winner/{id}/pay
#[instrument(skip_all, fields(winner_id = %id))]
async fn pay(RequireAdminAuth(admin): RequireAdminAuth, Path(id): Path<WinnerId>) -> Response {
    if let Err(redirect) = require(&admin, Action::PayWinner) {
        return redirect.into_response();
    }

    let result = admin.api.pay_winner(&id).await;
    notice_page(&admin, PATH, result, PAID).into_response()
}
