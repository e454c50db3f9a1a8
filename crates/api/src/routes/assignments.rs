//! Assignment listing endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use catalog::{AccountsClient, Assignment};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentQuery {
    pub account_id: Option<String>,
}

#[derive(Serialize)]
pub struct AssignmentListResponse {
    pub assignments: Vec<Assignment>,
}

/// GET /assignments?accountId= — list an account's assignments in
/// insertion order. An account with none yields an empty array.
#[tracing::instrument(skip(state))]
pub async fn list<A: AccountsClient + 'static>(
    State(state): State<Arc<AppState<A>>>,
    Query(query): Query<AssignmentQuery>,
) -> Result<Json<AssignmentListResponse>, ApiError> {
    let account_id = query
        .account_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| {
            ApiError::BadRequest("accountId query parameter is required".to_string())
        })?;

    let assignments = state.service.assignments_for(&account_id).await;
    Ok(Json(AssignmentListResponse { assignments }))
}
