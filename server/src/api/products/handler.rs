//! Product API Handlers
//!
//! All operations run against the authenticated user's own catalog; a
//! product id owned by someone else looks exactly like a missing one.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use crate::db::repository::ProductRepository;
use crate::utils::AppResult;
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_URL_LEN, validate_non_negative, validate_optional_text,
    validate_required_text,
};

use crate::AppError;

fn validate_create(data: &ProductCreate) -> AppResult<()> {
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&data.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_non_negative(data.price, "price")?;
    if data.stock < 0 {
        return Err(AppError::validation("stock must be non-negative"));
    }
    if data.image.len() > MAX_URL_LEN {
        return Err(AppError::validation("image is too long"));
    }
    Ok(())
}

fn validate_update(data: &ProductUpdate) -> AppResult<()> {
    if let Some(ref name) = data.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&data.description, "description", MAX_DESCRIPTION_LEN)?;
    if let Some(price) = data.price {
        validate_non_negative(price, "price")?;
    }
    if let Some(stock) = data.stock
        && stock < 0
    {
        return Err(AppError::validation("stock must be non-negative"));
    }
    if let Some(ref image) = data.image
        && image.len() > MAX_URL_LEN
    {
        return Err(AppError::validation("image is too long"));
    }
    Ok(())
}

/// GET /api/products - list the caller's products, newest first
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.db().clone());
    let products = repo.find_all(&user.id).await?;
    Ok(Json(products))
}

/// GET /api/products/:id - fetch one product
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.db().clone());
    let product = repo
        .find_by_id(&user.id, &id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))?;
    Ok(Json(product))
}

/// POST /api/products - create a product
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(data): Json<ProductCreate>,
) -> AppResult<(StatusCode, Json<Product>)> {
    validate_create(&data)?;

    let repo = ProductRepository::new(state.db().clone());
    let product = repo.create(&user.id, data).await?;

    tracing::info!(user_id = %user.id, product_id = ?product.id, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/products/:id - partial update
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(data): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    validate_update(&data)?;

    let repo = ProductRepository::new(state.db().clone());
    let product = repo.update(&user.id, &id, data).await?;
    Ok(Json(product))
}

/// DELETE /api/products/:id
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let repo = ProductRepository::new(state.db().clone());
    repo.delete(&user.id, &id).await?;

    tracing::info!(user_id = %user.id, product_id = %id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}
