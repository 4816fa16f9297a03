//! Audit log of the last 24 hours.

use askama::Template;
use axum::{
    Router,
    extract::Query,
    response::{IntoResponse, Response},
    routing::get,
};
use bicho_core::Action;
use chrono::{DateTime, Duration, Utc};
use tracing::instrument;

use crate::api::Log;
use crate::error::AppError;
use crate::filters;
use crate::middleware::{RequireAdminAuth, require};
use crate::state::AppState;

use super::{AdminView, SearchParams, render};

const PATH: &str = "/app/log";

/// Logs older than this many hours are not shown.
const WINDOW_HOURS: i64 = 24;

fn matches(log: &Log, query: &str) -> bool {
    log.haystack().contains(query)
}

/// Entries created less than [`WINDOW_HOURS`] before `now`.
#[must_use]
pub fn recent(logs: Vec<Log>, now: DateTime<Utc>) -> Vec<Log> {
    let window = Duration::hours(WINDOW_HOURS);
    logs.into_iter()
        .filter(|log| now.signed_duration_since(log.created_at) < window)
        .collect()
}

/// Logs list template.
#[derive(Template)]
#[template(path = "logs.html")]
pub struct LogsTemplate {
    pub admin: AdminView,
    pub query: String,
    pub total: usize,
    pub logs: Vec<Log>,
}

/// Build the logs router.
pub fn router() -> Router<AppState> {
    Router::new().route(PATH, get(index))
}

/// Logs page (super super admin and up).
///
/// GET /app/log?q=
#[instrument(skip(admin))]
async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    Query(params): Query<SearchParams>,
) -> Result<Response, AppError> {
    if let Err(redirect) = require(&admin, Action::ViewLogs) {
        return Ok(redirect.into_response());
    }

    let logs = recent(admin.api.list_logs().await?, Utc::now());
    let total = logs.len();
    let search = params.apply(logs, matches);

    Ok(render(&LogsTemplate {
        admin: AdminView::new(&admin, PATH),
        query: params.query().to_string(),
        total,
        logs: search.to_vec(),
    })
    .into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bicho_core::{AdministratorId, LogId};

    fn log(id: &str, at: DateTime<Utc>) -> Log {
        Log {
            id: LogId::new(id),
            created_at: at,
            action: "Validou aposta".to_string(),
            admin_id: AdministratorId::new("adm-1"),
        }
    }

    #[test]
    fn test_recent_keeps_last_day_only() {
        let now: DateTime<Utc> = "2024-05-02T12:00:00Z".parse().unwrap();
        let logs = vec![
            log("fresh", now - Duration::hours(1)),
            log("edge", now - Duration::hours(24)),
            log("old", now - Duration::days(3)),
        ];

        let kept: Vec<_> = recent(logs, now).into_iter().map(|l| l.id).collect();
        assert_eq!(kept, vec![LogId::new("fresh")]);
    }
}
