//! Product Repository
//!
//! Every query filters on `owner`, so a product id belonging to another
//! user behaves exactly like a missing record.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Product, ProductCreate, ProductUpdate, UserId};
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All products owned by `owner`, newest first
    pub async fn find_all(&self, owner: &UserId) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE owner = $owner ORDER BY createdAt DESC")
            .bind(("owner", owner.clone()))
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find one product by id, scoped to `owner`
    pub async fn find_by_id(&self, owner: &UserId, id: &str) -> RepoResult<Option<Product>> {
        let thing = parse_record_id(id, "product")?;
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM product WHERE id = $thing AND owner = $owner LIMIT 1")
            .bind(("thing", thing))
            .bind(("owner", owner.clone()))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        Ok(products.into_iter().next())
    }

    /// Create a new product owned by `owner`
    pub async fn create(&self, owner: &UserId, data: ProductCreate) -> RepoResult<Product> {
        let now = Utc::now().timestamp_millis();

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE product SET
                    owner = $owner,
                    name = $name,
                    description = $description,
                    price = $price,
                    stock = $stock,
                    image = $image,
                    imageId = $image_id,
                    createdAt = $now,
                    updatedAt = $now
                RETURN AFTER"#,
            )
            .bind(("owner", owner.clone()))
            .bind(("name", data.name))
            .bind(("description", data.description))
            .bind(("price", data.price))
            .bind(("stock", data.stock))
            .bind(("image", data.image))
            .bind(("image_id", data.image_id))
            .bind(("now", now))
            .await?;

        let created: Option<Product> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Partial update. Absent fields keep their stored values.
    pub async fn update(
        &self,
        owner: &UserId,
        id: &str,
        data: ProductUpdate,
    ) -> RepoResult<Product> {
        let thing = parse_record_id(id, "product")?;
        let now = Utc::now().timestamp_millis();

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE product SET
                    name = IF $has_name THEN $name ELSE name END,
                    description = IF $has_description THEN $description ELSE description END,
                    price = IF $has_price THEN $price ELSE price END,
                    stock = IF $has_stock THEN $stock ELSE stock END,
                    image = IF $has_image THEN $image ELSE image END,
                    imageId = IF $has_image_id THEN $image_id ELSE imageId END,
                    updatedAt = $now
                WHERE id = $thing AND owner = $owner
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("owner", owner.clone()))
            .bind(("has_name", data.name.is_some()))
            .bind(("name", data.name))
            .bind(("has_description", data.description.is_some()))
            .bind(("description", data.description))
            .bind(("has_price", data.price.is_some()))
            .bind(("price", data.price))
            .bind(("has_stock", data.stock.is_some()))
            .bind(("stock", data.stock))
            .bind(("has_image", data.image.is_some()))
            .bind(("image", data.image))
            .bind(("has_image_id", data.image_id.is_some()))
            .bind(("image_id", data.image_id))
            .bind(("now", now))
            .await?;

        let updated: Vec<Product> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
    }

    /// Delete one product, scoped to `owner`
    pub async fn delete(&self, owner: &UserId, id: &str) -> RepoResult<()> {
        let thing = parse_record_id(id, "product")?;
        let mut result = self
            .base
            .db()
            .query("DELETE product WHERE id = $thing AND owner = $owner RETURN BEFORE")
            .bind(("thing", thing))
            .bind(("owner", owner.clone()))
            .await?;
        let deleted: Vec<Product> = result.take(0)?;
        if deleted.is_empty() {
            return Err(RepoError::NotFound(format!("Product {id} not found")));
        }
        Ok(())
    }
}
