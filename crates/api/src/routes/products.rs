//! Product CRUD and assignment endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use catalog::{AccountsClient, Assignment, ChargeReceipt, Product, ProductDraft};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::routes::AppState;

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct ProductFilter {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub account_id: Option<String>,
}

// -- Response types --

#[derive(Serialize)]
pub struct ProductResponse {
    pub product: Product,
}

#[derive(Serialize)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
}

#[derive(Serialize)]
pub struct AssignResponse {
    pub assignment: Assignment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charge: Option<ChargeReceipt>,
}

// -- Handlers --

/// POST /products — create a new product.
#[tracing::instrument(skip(state, draft))]
pub async fn create<A: AccountsClient + 'static>(
    State(state): State<Arc<AppState<A>>>,
    Json(draft): Json<ProductDraft>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let product = state.service.create_product(draft).await?;
    Ok((StatusCode::CREATED, Json(ProductResponse { product })))
}

/// GET /products — list products, optionally filtered by exact category.
#[tracing::instrument(skip(state))]
pub async fn list<A: AccountsClient + 'static>(
    State(state): State<Arc<AppState<A>>>,
    Query(filter): Query<ProductFilter>,
) -> Json<ProductListResponse> {
    let products = state.service.list_products(filter.category.as_deref()).await;
    Json(ProductListResponse { products })
}

/// GET /products/all — list every product.
#[tracing::instrument(skip(state))]
pub async fn list_all<A: AccountsClient + 'static>(
    State(state): State<Arc<AppState<A>>>,
) -> Json<ProductListResponse> {
    let products = state.service.list_products(None).await;
    Json(ProductListResponse { products })
}

/// GET /products/:id — look up a product by id.
#[tracing::instrument(skip(state))]
pub async fn get<A: AccountsClient + 'static>(
    State(state): State<Arc<AppState<A>>>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state.service.get_product(&id).await?;
    Ok(Json(ProductResponse { product }))
}

/// POST /products/:id/assign — assign the product to an account,
/// optionally charging it.
#[tracing::instrument(skip(state, req))]
pub async fn assign<A: AccountsClient + 'static>(
    State(state): State<Arc<AppState<A>>>,
    Path(id): Path<String>,
    Json(req): Json<AssignRequest>,
) -> Result<(StatusCode, Json<AssignResponse>), ApiError> {
    let account_id = req.account_id.as_deref().unwrap_or_default();
    let outcome = state.service.assign_product(&id, account_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(AssignResponse {
            assignment: outcome.assignment,
            charge: outcome.charge,
        }),
    ))
}
