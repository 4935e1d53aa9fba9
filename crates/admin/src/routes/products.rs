//! Product CRUD route handlers.
//!
//! Each mutation performs its write, then responds with a full
//! [`DashboardData`] re-fetch rather than patching any cached view.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use sockshop_core::{NewProduct, ProductId, ProductPatch};

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::routes::dashboard::{DashboardData, refresh};
use crate::state::AppState;

/// Create-product request.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub price: Decimal,
    pub stock: u32,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Create a product.
#[instrument(skip(state, request), fields(admin = %admin.email, name = %request.name))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(request): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<DashboardData>)> {
    if request.name.trim().is_empty() {
        return Err(AppError::BadRequest("Product name is required".to_string()));
    }
    if request.price < Decimal::ZERO {
        return Err(AppError::BadRequest(
            "Product price cannot be negative".to_string(),
        ));
    }

    let product = NewProduct {
        name: request.name.trim().to_string(),
        price: request.price,
        stock: request.stock,
        category: request.category,
        image: request.image,
        images: request.images,
        description: request.description,
    };
    let created = state.store().create_product(&product).await?;
    tracing::info!(id = %created.id, "product created");

    Ok((StatusCode::CREATED, Json(refresh(state.store()).await?)))
}

/// Update a product.
#[instrument(skip(state, patch), fields(admin = %admin.email, id = %id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ProductId>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<DashboardData>> {
    if let Some(price) = patch.price
        && price < Decimal::ZERO
    {
        return Err(AppError::BadRequest(
            "Product price cannot be negative".to_string(),
        ));
    }

    state.store().update_product(&id, &patch).await?;
    tracing::info!(id = %id, "product updated");

    Ok(Json(refresh(state.store()).await?))
}

/// Delete a product.
#[instrument(skip(state), fields(admin = %admin.email, id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<Json<DashboardData>> {
    state.store().delete_product(&id).await?;
    tracing::info!(id = %id, "product deleted");

    Ok(Json(refresh(state.store()).await?))
}
