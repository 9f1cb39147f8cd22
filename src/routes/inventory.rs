use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, post, put},
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::products::ProductList,
    error::AppResult,
    models::Product,
    response::ApiResponse,
    routes::params::LowStockQuery,
    services::inventory_service,
    state::AppState,
};

/// Stock and sales endpoints hanging off /api/products/{id}.
pub fn stock_router() -> Router<AppState> {
    Router::new()
        .route("/{id}/stock", patch(adjust_stock))
        .route("/{id}/stock", put(set_stock))
        .route("/{id}/sales", post(increment_sales))
        .route("/{id}/purchase", post(record_sale))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/low-stock", get(list_low_stock))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StockAdjustRequest {
    pub delta: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetStockRequest {
    pub stock: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SalesIncrementRequest {
    pub quantity: i32,
}

#[utoipa::path(
    patch,
    path = "/api/products/{id}/stock",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = StockAdjustRequest,
    responses(
        (status = 200, description = "Stock adjusted", body = ApiResponse<Product>),
        (status = 400, description = "Invalid delta"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Insufficient stock"),
    ),
    tag = "Inventory"
)]
pub async fn adjust_stock(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StockAdjustRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = inventory_service::adjust_stock(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}/stock",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = SetStockRequest,
    responses(
        (status = 200, description = "Stock set", body = ApiResponse<Product>),
        (status = 400, description = "Invalid stock value"),
        (status = 404, description = "Product not found"),
    ),
    tag = "Inventory"
)]
pub async fn set_stock(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetStockRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = inventory_service::set_stock(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products/{id}/sales",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = SalesIncrementRequest,
    responses(
        (status = 200, description = "Sales counter incremented", body = ApiResponse<Product>),
        (status = 400, description = "Invalid quantity"),
        (status = 404, description = "Product not found"),
    ),
    tag = "Inventory"
)]
pub async fn increment_sales(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SalesIncrementRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = inventory_service::increment_sales(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products/{id}/purchase",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = SalesIncrementRequest,
    responses(
        (status = 200, description = "Purchase recorded", body = ApiResponse<Product>),
        (status = 400, description = "Invalid quantity"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Insufficient stock"),
    ),
    tag = "Inventory"
)]
pub async fn record_sale(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SalesIncrementRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = inventory_service::record_sale(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/inventory/low-stock",
    params(
        ("threshold" = Option<i32>, Query, description = "Stock threshold, default 5"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20")
    ),
    responses(
        (status = 200, description = "List low stock products", body = ApiResponse<ProductList>),
    ),
    tag = "Inventory"
)]
pub async fn list_low_stock(
    State(state): State<AppState>,
    Query(query): Query<LowStockQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = inventory_service::list_low_stock(&state, query).await?;
    Ok(Json(resp))
}
