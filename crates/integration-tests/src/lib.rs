//! Integration tests for the Jogo do Bicho admin panel.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bicho-integration-tests
//! ```
//!
//! No external services are needed. [`StubBackend`] serves an in-memory
//! imitation of the betting backend on an ephemeral local port, and tests
//! drive the panel router directly with `tower::ServiceExt::oneshot`.

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, Request, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use bicho_admin::config::AdminConfig;
use bicho_admin::services::auth::TOKEN_COOKIE;
use bicho_admin::state::AppState;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;
use url::Url;

// =============================================================================
// Fixtures
// =============================================================================

/// An administrator the stub backend can sign in.
#[derive(Debug, Clone)]
pub struct Account {
    pub bank_account: String,
    pub password: String,
    pub token: String,
    pub profile: Value,
}

/// Build an account whose token is `token-<id>`.
#[must_use]
pub fn account(id: &str, role: &str, name: &str, bank_account: &str, password: &str) -> Account {
    Account {
        bank_account: bank_account.to_string(),
        password: password.to_string(),
        token: format!("token-{id}"),
        profile: json!({
            "id": id,
            "created_at": "2024-01-10T12:00:00Z",
            "role": role,
            "name": name,
            "phone": "1234567890",
            "bank_account": bank_account.parse::<u64>().map_or_else(|_| json!(bank_account), |n| json!(n)),
        }),
    }
}

/// A confirmed bet.
#[must_use]
pub fn bet(id: &str, value: f64, animal: u8, name: &str, created_at: DateTime<Utc>) -> Value {
    json!({
        "id": id,
        "created_at": created_at.to_rfc3339(),
        "value": value,
        "animal": animal,
        "name": name,
        "phone": 1_234_567_890_u64,
        "bank_account": 61_234_567_u64,
    })
}

/// A pending bet: `bet` plus its validation token.
#[must_use]
pub fn pending(token: &str, mut bet: Value) -> Value {
    if let Some(fields) = bet.as_object_mut() {
        fields.insert("token".to_string(), json!(token));
    }
    bet
}

/// A winner of the draw `animal_id`.
#[must_use]
pub fn winner(id: &str, animal_id: &str, name: &str, paid: bool) -> Value {
    json!({
        "id": id,
        "created_at": "2024-05-01T21:00:00Z",
        "animalId": animal_id,
        "name": name,
        "phone": "1234567890",
        "bank_account": "61234567",
        "paycheck": 180.0,
        "paid": paid,
    })
}

/// A drawn animal with its winners.
#[must_use]
pub fn animal(id: &str, number: u8, winners: Vec<Value>) -> Value {
    json!({
        "id": id,
        "created_at": "2024-05-01T20:00:00Z",
        "animal": number,
        "winners": winners,
    })
}

/// An audit log entry.
#[must_use]
pub fn log(id: &str, admin_id: &str, action: &str, created_at: DateTime<Utc>) -> Value {
    json!({
        "id": id,
        "created_at": created_at.to_rfc3339(),
        "action": action,
        "admin_id": admin_id,
    })
}

/// Everything the stub backend serves.
#[derive(Debug, Clone, Default)]
pub struct Fixtures {
    pub accounts: Vec<Account>,
    pub bets: Vec<Value>,
    pub pending: Vec<Value>,
    pub winners: Vec<Value>,
    pub animals: Vec<Value>,
    pub current: Option<Value>,
    pub logs: Vec<Value>,
}

/// A mutation the stub backend received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// `"<METHOD> <path>"`.
    pub request: String,
    pub body: Value,
}

// =============================================================================
// Stub backend
// =============================================================================

struct Shared {
    fixtures: Fixtures,
    calls: Vec<Call>,
}

#[derive(Clone)]
struct Stub(Arc<Mutex<Shared>>);

impl Stub {
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.0.lock().expect("stub backend lock poisoned")
    }

    /// Profile of the bearer in `headers`.
    fn caller(&self, headers: &HeaderMap) -> Option<Value> {
        let token = headers
            .get(header::AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")?;
        self.lock()
            .fixtures
            .accounts
            .iter()
            .find(|account| account.token == token)
            .map(|account| account.profile.clone())
    }

    fn record(&self, request: String, body: Value) {
        self.lock().calls.push(Call { request, body });
    }
}

fn envelope(payload: Value) -> Response {
    Json(json!({ "response": { "payload": payload } })).into_response()
}

fn refuse(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn unauthorized() -> Response {
    refuse(StatusCode::UNAUTHORIZED, "Não autorizado")
}

/// In-memory betting backend bound to `127.0.0.1:0`.
pub struct StubBackend {
    url: Url,
    stub: Stub,
    server: tokio::task::JoinHandle<()>,
}

impl StubBackend {
    /// Start serving `fixtures`.
    pub async fn spawn(fixtures: Fixtures) -> Self {
        let stub = Stub(Arc::new(Mutex::new(Shared {
            fixtures,
            calls: Vec::new(),
        })));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub backend");
        let addr = listener.local_addr().expect("stub backend address");
        let app = stub_router(stub.clone());
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            url: Url::parse(&format!("http://{addr}")).expect("stub backend url"),
            stub,
            server,
        }
    }

    /// Base URL of the stub.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Mutations received so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.stub.lock().calls.clone()
    }

    /// A panel router wired to this stub.
    #[must_use]
    pub fn panel(&self) -> Router {
        let state = AppState::new(AdminConfig::for_backend(self.url.clone()))
            .expect("build panel state");
        bicho_admin::app(state)
    }
}

impl Drop for StubBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn stub_router(stub: Stub) -> Router {
    Router::new()
        .route("/", get(|| async { "ok" }))
        .route("/administrator/auth", post(authenticate))
        .route("/administrator/me/profile", get(my_profile))
        .route("/administrator/", get(list_administrators))
        .route("/administrator/create", post(create_administrator))
        .route("/administrator/update/{id}", patch(update_administrator))
        .route("/administrator/update/password/{id}", patch(update_password))
        .route("/administrator/delete/{id}", delete(delete_administrator))
        .route("/administrator/{id}", get(get_administrator))
        .route("/bet", get(list_bets))
        .route("/bet/delete/{id}", delete(delete_bet))
        .route("/bet/pending/all", get(list_pending))
        .route("/bet/validate/{token}", post(validate_bet))
        .route("/animal", get(list_animals))
        .route("/animal/winner/current", get(current_animal))
        .route("/winner", get(list_winners))
        .route("/winner/pay/{id}", patch(pay_winner))
        .route("/log", get(list_logs))
        .with_state(stub)
}

async fn authenticate(State(stub): State<Stub>, headers: HeaderMap) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };
    let (bank_account, password) = (header("bank_account"), header("password"));

    let found = stub
        .lock()
        .fixtures
        .accounts
        .iter()
        .find(|a| a.bank_account == bank_account && a.password == password)
        .cloned();
    match found {
        Some(account) => envelope(json!({
            "token": account.token,
            "administrator": account.profile,
        })),
        None => refuse(StatusCode::UNAUTHORIZED, "Credenciais inválidas"),
    }
}

async fn my_profile(State(stub): State<Stub>, headers: HeaderMap) -> Response {
    stub.caller(&headers).map_or_else(unauthorized, envelope)
}

async fn list_administrators(State(stub): State<Stub>, headers: HeaderMap) -> Response {
    if stub.caller(&headers).is_none() {
        return unauthorized();
    }
    let profiles: Vec<Value> = stub
        .lock()
        .fixtures
        .accounts
        .iter()
        .map(|a| a.profile.clone())
        .collect();
    envelope(Value::Array(profiles))
}

async fn get_administrator(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if stub.caller(&headers).is_none() {
        return unauthorized();
    }
    let found = stub
        .lock()
        .fixtures
        .accounts
        .iter()
        .find(|a| a.profile["id"] == id.as_str())
        .map(|a| a.profile.clone());
    found.map_or_else(
        || refuse(StatusCode::NOT_FOUND, "Administrador não encontrado"),
        envelope,
    )
}

async fn create_administrator(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if stub.caller(&headers).is_none() {
        return unauthorized();
    }
    stub.record("POST /administrator/create".to_string(), body);
    envelope(json!({}))
}

async fn update_administrator(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if stub.caller(&headers).is_none() {
        return unauthorized();
    }
    stub.record(format!("PATCH /administrator/update/{id}"), body);
    StatusCode::OK.into_response()
}

async fn update_password(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if stub.caller(&headers).is_none() {
        return unauthorized();
    }
    stub.record(format!("PATCH /administrator/update/password/{id}"), body);
    StatusCode::OK.into_response()
}

async fn delete_administrator(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if stub.caller(&headers).is_none() {
        return unauthorized();
    }
    stub.record(format!("DELETE /administrator/delete/{id}"), Value::Null);
    StatusCode::OK.into_response()
}

async fn list_bets(State(stub): State<Stub>, headers: HeaderMap) -> Response {
    if stub.caller(&headers).is_none() {
        return unauthorized();
    }
    let bets = stub.lock().fixtures.bets.clone();
    envelope(Value::Array(bets))
}

async fn delete_bet(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if stub.caller(&headers).is_none() {
        return unauthorized();
    }
    stub.record(format!("DELETE /bet/delete/{id}"), Value::Null);
    StatusCode::OK.into_response()
}

async fn list_pending(State(stub): State<Stub>, headers: HeaderMap) -> Response {
    if stub.caller(&headers).is_none() {
        return unauthorized();
    }
    let pending = stub.lock().fixtures.pending.clone();
    envelope(Value::Array(pending))
}

async fn validate_bet(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Path(token): Path<String>,
) -> Response {
    if stub.caller(&headers).is_none() {
        return unauthorized();
    }
    let known = stub
        .lock()
        .fixtures
        .pending
        .iter()
        .any(|p| p["token"] == token.as_str());
    if !known {
        return refuse(StatusCode::BAD_REQUEST, "Token inválido");
    }
    stub.record(format!("POST /bet/validate/{token}"), Value::Null);
    StatusCode::OK.into_response()
}

async fn list_animals(State(stub): State<Stub>, headers: HeaderMap) -> Response {
    if stub.caller(&headers).is_none() {
        return unauthorized();
    }
    let animals = stub.lock().fixtures.animals.clone();
    envelope(Value::Array(animals))
}

async fn current_animal(State(stub): State<Stub>, headers: HeaderMap) -> Response {
    if stub.caller(&headers).is_none() {
        return unauthorized();
    }
    let current = stub.lock().fixtures.current.clone();
    envelope(current.unwrap_or(Value::Null))
}

async fn list_winners(State(stub): State<Stub>, headers: HeaderMap) -> Response {
    if stub.caller(&headers).is_none() {
        return unauthorized();
    }
    let winners = stub.lock().fixtures.winners.clone();
    envelope(Value::Array(winners))
}

async fn pay_winner(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if stub.caller(&headers).is_none() {
        return unauthorized();
    }
    stub.record(format!("PATCH /winner/pay/{id}"), Value::Null);
    StatusCode::OK.into_response()
}

async fn list_logs(State(stub): State<Stub>, headers: HeaderMap) -> Response {
    if stub.caller(&headers).is_none() {
        return unauthorized();
    }
    let logs = stub.lock().fixtures.logs.clone();
    envelope(Value::Array(logs))
}

// =============================================================================
// Panel requests
// =============================================================================

/// A response from the panel, body read to a string.
#[derive(Debug)]
pub struct Page {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl Page {
    /// `Location` header of a redirect.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// Every `Set-Cookie` header.
    #[must_use]
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok().map(String::from))
            .collect()
    }
}

/// `Cookie` header value carrying `token` as the session.
#[must_use]
pub fn session_cookie(token: &str) -> String {
    format!("{TOKEN_COOKIE}={token}")
}

/// GET `path`, optionally as the holder of `token`.
#[must_use]
pub fn get_request(path: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(path);
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, session_cookie(token));
    }
    builder.body(Body::empty()).expect("build GET request")
}

/// POST an url-encoded `form` to `path`, optionally as the holder of `token`.
#[must_use]
pub fn form_request(path: &str, form: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, session_cookie(token));
    }
    builder
        .body(Body::from(form.to_string()))
        .expect("build POST request")
}

/// Send `request` through `app` and read the whole response.
pub async fn send(app: &Router, request: Request<Body>) -> Page {
    let response = app.clone().oneshot(request).await.expect("panel request");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read panel body");

    Page {
        status,
        headers,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    }
}
