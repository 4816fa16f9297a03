//! Dashboard route handler.

use askama::Template;
use axum::{Router, response::Html, routing::get};
use bicho_core::Money;
use chrono::{Local, NaiveDate, TimeZone};
use tracing::instrument;

use crate::api::{Bet, WinnerAnimal};
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

use super::{AdminView, render};

/// Activity figures shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub created_bets_today: usize,
    pub last_winner_animal: String,
    pub total_gambled_today: Money,
    pub total_gambled: Money,
}

impl DashboardStats {
    /// Compute the figures for `today` as seen in `tz`.
    #[must_use]
    pub fn compute<Tz: TimeZone>(
        bets: &[Bet],
        current: Option<&WinnerAnimal>,
        today: NaiveDate,
        tz: &Tz,
    ) -> Self {
        let today_bets: Vec<&Bet> = bets
            .iter()
            .filter(|bet| bet.created_at.with_timezone(tz).date_naive() == today)
            .collect();

        Self {
            created_bets_today: today_bets.len(),
            last_winner_animal: current
                .map_or("Nenhum", |animal| animal.animal.name())
                .to_string(),
            total_gambled_today: today_bets.iter().map(|bet| bet.value).sum(),
            total_gambled: bets.iter().map(|bet| bet.value).sum(),
        }
    }
}

/// Dashboard page template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub admin: AdminView,
    pub stats: DashboardStats,
}

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/app", get(index))
}

/// Dashboard page handler.
///
/// GET /app
#[instrument(skip(admin))]
async fn index(RequireAdminAuth(admin): RequireAdminAuth) -> Result<Html<String>, AppError> {
    let bets = admin.api.list_bets().await?;
    let current = admin.api.current_winner_animal().await?;

    let stats = DashboardStats::compute(
        &bets,
        current.as_ref(),
        Local::now().date_naive(),
        &Local,
    );

    Ok(render(&DashboardTemplate {
        admin: AdminView::new(&admin, "/app"),
        stats,
    }))
}
