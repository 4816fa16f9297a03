//! Drawn animals and their winners.

use askama::Template;
use axum::{Router, extract::Query, response::Html, routing::get};
use tracing::instrument;

use crate::api::WinnerAnimal;
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

use super::{AdminView, SearchParams, render};

const PATH: &str = "/app/animal";

fn matches(animal: &WinnerAnimal, query: &str) -> bool {
    animal.haystack().contains(query)
}

/// One card on the animals page.
#[derive(Debug, Clone)]
pub struct AnimalRow {
    pub animal: WinnerAnimal,
    /// The most recent draw.
    pub is_current: bool,
}

/// Animals list template.
#[derive(Template)]
#[template(path = "animals.html")]
pub struct AnimalsTemplate {
    pub admin: AdminView,
    pub query: String,
    pub total: usize,
    pub animals: Vec<AnimalRow>,
}

/// Build the animals router.
pub fn router() -> Router<AppState> {
    Router::new().route(PATH, get(index))
}

/// Animals list page.
///
/// GET /app/animal?q=
#[instrument(skip(admin))]
async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    Query(params): Query<SearchParams>,
) -> Result<Html<String>, AppError> {
    let animals = admin.api.list_animals().await?;
    let current = admin.api.current_winner_animal().await?;
    let total = animals.len();
    let search = params.apply(animals, matches);

    let animals = search
        .values()
        .map(|animal| AnimalRow {
            is_current: current.as_ref().is_some_and(|c| c.id == animal.id),
            animal: animal.clone(),
        })
        .collect();

    Ok(render(&AnimalsTemplate {
        admin: AdminView::new(&admin, PATH),
        query: params.query().to_string(),
        total,
        animals,
    }))
}
