//! Standalone mock of the downstream accounts service.
//!
//! Serves the exact contract the catalog service consumes: account lookup
//! and signed balance deltas with an insufficient-funds guard, over a small
//! pre-seeded account set held in memory. Exists so the catalog service has
//! something real to integrate against locally.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use catalog::{Account, seed_accounts};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

/// Shared mock state: the account set, mutated only by credit calls.
#[derive(Clone, Default)]
pub struct MockState {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
}

impl MockState {
    /// Creates state pre-seeded with the standard account set.
    pub fn seeded() -> Self {
        let accounts = seed_accounts()
            .into_iter()
            .map(|account| (account.id.clone(), account))
            .collect();
        Self {
            accounts: Arc::new(RwLock::new(accounts)),
        }
    }

    /// Current balance of an account, if it exists.
    pub async fn balance_of(&self, account_id: &str) -> Option<f64> {
        self.accounts.read().await.get(account_id).map(|a| a.balance)
    }
}

#[derive(Deserialize, Default)]
struct CreditRequest {
    amount: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = serde_json::json!({ "error": message.into() });
    (status, Json(body)).into_response()
}

/// GET /accounts/:id — look up an account.
#[tracing::instrument(skip(state))]
async fn get_account(State(state): State<MockState>, Path(id): Path<String>) -> Response {
    match state.accounts.read().await.get(&id) {
        Some(account) => Json(serde_json::json!({ "account": account })).into_response(),
        None => error_response(StatusCode::NOT_FOUND, format!("Account {id} not found")),
    }
}

/// POST /accounts/:id/credit — apply a signed balance delta.
///
/// Negative amounts are debits; a debit that would drive the balance below
/// zero is rejected and leaves the balance unchanged.
#[tracing::instrument(skip(state, req))]
async fn credit_account(
    State(state): State<MockState>,
    Path(id): Path<String>,
    Json(req): Json<CreditRequest>,
) -> Response {
    let Some(amount) = req.amount.as_ref().and_then(|v| v.as_f64()) else {
        return error_response(StatusCode::BAD_REQUEST, "amount must be a number");
    };

    let mut accounts = state.accounts.write().await;
    let Some(account) = accounts.get_mut(&id) else {
        return error_response(StatusCode::NOT_FOUND, format!("Account {id} not found"));
    };

    if amount < 0.0 && account.balance + amount < 0.0 {
        return error_response(StatusCode::BAD_REQUEST, "Insufficient balance");
    }

    account.balance += amount;
    tracing::info!(account_id = %id, amount, balance = account.balance, "balance updated");
    Json(serde_json::json!({ "balance": account.balance, "currency": "USD" })).into_response()
}

/// GET /health — returns service health status.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "accounts-api",
    })
}

/// Fallback — echoes the unmatched method and path.
async fn fallback(method: Method, uri: Uri) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        format!("No route for {method} {}", uri.path()),
    )
}

/// Creates the Axum application router over the given state.
pub fn create_app(state: MockState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/accounts/{id}", get(get_account))
        .route("/accounts/{id}/credit", post(credit_account))
        .fallback(fallback)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
