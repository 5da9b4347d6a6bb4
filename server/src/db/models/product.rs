//! Product Model

use super::serde_helpers;
use super::user::UserId;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Product ID type
pub type ProductId = RecordId;

/// Product model
///
/// Stored and served under the same camelCase field names, so rows come
/// straight back as response bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ProductId>,
    /// Record link to the owning user
    #[serde(with = "serde_helpers::record_id")]
    pub owner: UserId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    pub stock: i64,
    /// Image URL/handle produced by the external upload collaborator
    pub image: String,
    /// Storage handle used when deleting the image upstream
    #[serde(default)]
    pub image_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create product payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i64,
    pub image: String,
    pub image_id: Option<String>,
}

/// Update product payload (partial, only supplied fields change)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
    pub image: Option<String>,
    pub image_id: Option<String>,
}
