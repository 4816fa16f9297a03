//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                        - Liveness
//! GET  /health/ready                  - Backend reachable
//!
//! # Auth
//! GET  /                              - Login page (redirects to /app when signed in)
//! POST /auth/login                    - Sign in
//! POST /auth/logout                   - Sign out
//!
//! # Dashboard
//! GET  /app                           - Today's activity
//!
//! # Bets
//! GET  /app/bet                       - Confirmed bets (?q= search)
//! GET  /app/bet/{id}/delete           - Confirm deletion
//! POST /app/bet/{id}/delete           - Delete
//! GET  /app/pending                   - Pending bets (?q= search)
//! GET  /app/pending/{token}/validate  - Confirm validation
//! POST /app/pending/{token}/validate  - Validate
//!
//! # Draws
//! GET  /app/winner                    - Winners (?q= search)
//! GET  /app/winner/{id}/pay           - Confirm payment (super super admin)
//! POST /app/winner/{id}/pay           - Pay
//! GET  /app/animal                    - Drawn animals (?q= search)
//!
//! # Audit (super super admin)
//! GET  /app/log                       - Last 24 hours of logs (?q= search)
//!
//! # Administrators (super admin and up)
//! GET  /app/administrator             - List (?q= search)
//! GET  /app/administrator/create      - Create form (owner)
//! POST /app/administrator/create      - Create
//! GET  /app/administrator/{id}        - Edit form (higher rank only)
//! POST /app/administrator/{id}        - Edit
//! GET  /app/administrator/{id}/delete - Confirm deletion
//! POST /app/administrator/{id}/delete - Delete
//!
//! # Own account
//! GET  /app/me                        - Profile
//! GET  /app/me/password               - Password form
//! POST /app/me/password               - Change password
//! ```

pub mod administrators;
pub mod animals;
pub mod auth;
pub mod bets;
pub mod dashboard;
pub mod logs;
pub mod me;
pub mod pending;
pub mod winners;

use askama::Template;
use axum::Router;
use axum::response::Html;
use bicho_core::permissions::visible_entries;
use bicho_core::{SearchState, search::SearchPredicate};
use serde::Deserialize;

use crate::api::ApiError;
use crate::filters;
use crate::middleware::CurrentAdmin;
use crate::state::AppState;

/// Build the page router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(dashboard::router())
        .merge(bets::router())
        .merge(pending::router())
        .merge(winners::router())
        .merge(animals::router())
        .merge(logs::router())
        .merge(administrators::router())
        .merge(me::router())
}

/// Render a template, falling back to a plain error body.
pub(crate) fn render(template: &impl Template) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}

/// A side navigation link.
#[derive(Debug, Clone)]
pub struct NavLink {
    pub href: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Signed-in administrator as the page shell shows it.
#[derive(Debug, Clone)]
pub struct AdminView {
    pub name: String,
    pub role: &'static str,
    pub nav: Vec<NavLink>,
    pub on_profile: bool,
}

impl AdminView {
    /// Shell for `admin` on the page at `current_path`.
    #[must_use]
    pub fn new(admin: &CurrentAdmin, current_path: &str) -> Self {
        let nav = visible_entries(admin.role())
            .map(|entry| NavLink {
                href: entry.href,
                label: entry.label,
                active: current_path.starts_with(entry.href),
            })
            .collect();

        Self {
            name: admin.administrator.name.clone(),
            role: admin.role().label(),
            nav,
            on_profile: current_path.starts_with("/app/me"),
        }
    }
}

/// `?q=` on list pages. Submitting the search form is the filter trigger.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
}

impl SearchParams {
    /// The query as typed, empty when absent.
    #[must_use]
    pub fn query(&self) -> &str {
        self.q.as_deref().unwrap_or_default()
    }

    /// Filter `items` by the query.
    #[must_use]
    pub fn apply<T>(&self, items: Vec<T>, predicate: SearchPredicate<T>) -> SearchState<T> {
        let mut search = SearchState::new(items, predicate);
        search.set_query(self.query());
        search.apply_filter();
        search
    }
}

/// Blocking confirmation before a mutation.
#[derive(Template)]
#[template(path = "confirm.html")]
pub struct ConfirmTemplate {
    pub admin: AdminView,
    pub question: String,
    pub action: String,
    pub cancel: String,
}

/// Blocking acknowledgment of a mutation's outcome.
#[derive(Template)]
#[template(path = "notice.html")]
pub struct NoticeTemplate {
    pub admin: AdminView,
    pub success: bool,
    pub message: String,
    pub detail: Option<String>,
    pub next: String,
}

/// Messages shown after a mutation.
#[derive(Debug, Clone, Copy)]
pub struct Outcome {
    pub success: &'static str,
    pub failure: &'static str,
}

/// Confirmation page for a mutation posted to `action`.
pub(crate) fn confirm_page(
    admin: &CurrentAdmin,
    current_path: &str,
    question: String,
    action: String,
) -> Html<String> {
    render(&ConfirmTemplate {
        admin: AdminView::new(admin, current_path),
        question,
        action,
        cancel: current_path.to_string(),
    })
}

/// Acknowledgment page for a mutation's `result`. Rejections are logged and
/// reported, never propagated.
pub(crate) fn notice_page(
    admin: &CurrentAdmin,
    current_path: &str,
    result: Result<(), ApiError>,
    outcome: Outcome,
) -> Html<String> {
    let (success, message, detail) = match result {
        Ok(()) => (true, outcome.success, None),
        Err(e) => {
            tracing::warn!(error = %e, administrator_id = %admin.administrator.id, "Mutation rejected");
            (false, outcome.failure, e.backend_message().map(String::from))
        }
    };

    render(&NoticeTemplate {
        admin: AdminView::new(admin, current_path),
        success,
        message: message.to_string(),
        detail,
        next: current_path.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod test_support {
    use bicho_core::{AdministratorId, Role};

    use crate::api::{Administrator, BackendClient};
    use crate::middleware::CurrentAdmin;

    pub fn current(role: Role) -> CurrentAdmin {
        CurrentAdmin {
            administrator: Administrator {
                id: AdministratorId::new("me"),
                created_at: chrono::Utc::now(),
                role,
                name: "Ana".to_string(),
                phone: "1234567890".to_string(),
                bank_account: "61234567".to_string(),
            },
            api: BackendClient::new(&url::Url::parse("http://127.0.0.1:9").unwrap()).unwrap(),
        }
    }
}
