//! Catalog request handlers.
//!
//! Thin adapters: extract path/body inputs as raw strings, delegate to the
//! aggregation service, and let [`CatalogError`] map failures to the status
//! contract. Validation lives in the service, not here.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::info;

use crate::application::catalog::{CatalogError, DEFAULT_PAGE, DEFAULT_SIZE};
use crate::application::repos::ProductDraft;

use super::state::ApiState;

pub async fn get_product(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, CatalogError> {
    info!(target = "vetrina::http", id = %id, "Get product");

    let product = state.catalog.get_by_id(&id).await?;
    Ok(Json(product))
}

pub async fn list_products(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, CatalogError> {
    list_products_inner(state, DEFAULT_PAGE.to_string(), DEFAULT_SIZE.to_string()).await
}

pub async fn list_products_page(
    State(state): State<ApiState>,
    Path(page): Path<String>,
) -> Result<impl IntoResponse, CatalogError> {
    list_products_inner(state, page, DEFAULT_SIZE.to_string()).await
}

pub async fn list_products_page_size(
    State(state): State<ApiState>,
    Path((page, size)): Path<(String, String)>,
) -> Result<impl IntoResponse, CatalogError> {
    list_products_inner(state, page, size).await
}

async fn list_products_inner(
    state: ApiState,
    page: String,
    size: String,
) -> Result<impl IntoResponse, CatalogError> {
    info!(target = "vetrina::http", page = %page, size = %size, "Get products");

    let products = state.catalog.list_page(&page, &size).await?;
    Ok(Json(products))
}

pub async fn list_categories(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, CatalogError> {
    info!(target = "vetrina::http", "Get categories");

    let categories = state.catalog.list_categories().await?;
    Ok(Json(categories))
}

pub async fn list_by_category(
    State(state): State<ApiState>,
    Path(category): Path<String>,
) -> Result<impl IntoResponse, CatalogError> {
    list_by_category_inner(state, category, DEFAULT_PAGE.to_string(), DEFAULT_SIZE.to_string())
        .await
}

pub async fn list_by_category_page(
    State(state): State<ApiState>,
    Path((category, page)): Path<(String, String)>,
) -> Result<impl IntoResponse, CatalogError> {
    list_by_category_inner(state, category, page, DEFAULT_SIZE.to_string()).await
}

pub async fn list_by_category_page_size(
    State(state): State<ApiState>,
    Path((category, page, size)): Path<(String, String, String)>,
) -> Result<impl IntoResponse, CatalogError> {
    list_by_category_inner(state, category, page, size).await
}

async fn list_by_category_inner(
    state: ApiState,
    category: String,
    page: String,
    size: String,
) -> Result<impl IntoResponse, CatalogError> {
    info!(
        target = "vetrina::http",
        category = %category,
        page = %page,
        size = %size,
        "Get products by category"
    );

    let products = state
        .catalog
        .list_by_category(&category, &page, &size)
        .await?;
    Ok(Json(products))
}

pub async fn save_product(
    State(state): State<ApiState>,
    payload: Result<Json<ProductDraft>, JsonRejection>,
) -> Result<impl IntoResponse, CatalogError> {
    let Json(draft) = payload
        .map_err(|rejection| CatalogError::InvalidInput(rejection.body_text()))?;

    info!(target = "vetrina::http", id = draft.id, "Save product");

    let persisted = state.catalog.save(draft).await?;
    Ok(Json(persisted))
}

pub async fn delete_product(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, CatalogError> {
    info!(target = "vetrina::http", id = %id, "Delete product");

    state.catalog.delete_by_id(&id).await?;
    Ok(StatusCode::OK)
}

pub async fn health(State(state): State<ApiState>) -> StatusCode {
    match state.catalog.health_check().await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
