//! Order Repository
//!
//! Order creation runs as a single SurrealDB transaction: every line's
//! stock decrement is conditional on sufficient stock, and any failing
//! line THROWs, which rolls back the decrements of every other line.

use std::collections::HashMap;

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Order, OrderId, OrderStatus, UserId};
use chrono::Utc;
use ring::rand::{SecureRandom, SystemRandom};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

/// THROW marker for a product that does not exist (or belongs to someone else)
const THROW_MISSING: &str = "order:missing:";
/// THROW marker for a product with insufficient stock
const THROW_STOCK: &str = "order:stock:";

/// A validated order line ready for the transaction
pub struct OrderLine {
    pub product: RecordId,
    pub quantity: i64,
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All orders owned by `owner`, newest first
    pub async fn find_all(&self, owner: &UserId) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE owner = $owner ORDER BY createdAt DESC")
            .bind(("owner", owner.clone()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Find one order by id, scoped to `owner`
    pub async fn find_by_id(&self, owner: &UserId, id: &str) -> RepoResult<Option<Order>> {
        let thing = parse_record_id(id, "order")?;
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order WHERE id = $thing AND owner = $owner LIMIT 1")
            .bind(("thing", thing))
            .bind(("owner", owner.clone()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Place an order atomically.
    ///
    /// Each line decrements its product's stock only `WHERE stock >= qty`;
    /// a line that matches nothing (missing product, foreign product, or
    /// not enough stock) THROWs and cancels the whole transaction, so
    /// stock levels are untouched unless every line succeeds. Item
    /// snapshots (name, price, image) are read from the post-decrement
    /// rows inside the same transaction.
    pub async fn create(
        &self,
        owner: &UserId,
        name: String,
        description: Option<String>,
        lines: Vec<OrderLine>,
    ) -> RepoResult<Order> {
        if lines.is_empty() {
            return Err(RepoError::Validation(
                "Order must contain at least one item".to_string(),
            ));
        }

        let oid = new_order_id()?;
        let created_at = Utc::now().timestamp_millis();

        let mut sql = String::from("BEGIN TRANSACTION;\n");
        for i in 0..lines.len() {
            sql.push_str(&format!(
                "LET $found{i} = (SELECT id FROM product WHERE id = $pid{i} AND owner = $owner);\n\
                 IF array::len($found{i}) == 0 {{ THROW \"{THROW_MISSING}\" + <string>$pid{i}; }};\n\
                 LET $hit{i} = (UPDATE product SET stock -= $qty{i} \
                 WHERE id = $pid{i} AND owner = $owner AND stock >= $qty{i} RETURN AFTER);\n\
                 IF array::len($hit{i}) == 0 {{ THROW \"{THROW_STOCK}\" + <string>$pid{i}; }};\n"
            ));
        }

        let items: Vec<String> = (0..lines.len())
            .map(|i| {
                format!(
                    "{{ product: $pid{i}, name: $hit{i}[0].name, price: $hit{i}[0].price, \
                     quantity: $qty{i}, image: $hit{i}[0].image }}"
                )
            })
            .collect();
        let total: Vec<String> = (0..lines.len())
            .map(|i| format!("$hit{i}[0].price * $qty{i}"))
            .collect();

        sql.push_str(&format!(
            "CREATE ONLY $oid CONTENT {{\n\
                owner: $owner,\n\
                name: $name,\n\
                description: $description,\n\
                items: [{}],\n\
                totalAmount: {},\n\
                status: 'pending',\n\
                createdAt: $created_at\n\
            }};\n\
            COMMIT TRANSACTION;",
            items.join(", "),
            total.join(" + ")
        ));

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("oid", oid.clone()))
            .bind(("owner", owner.clone()))
            .bind(("name", name))
            .bind(("description", description))
            .bind(("created_at", created_at));
        for (i, line) in lines.into_iter().enumerate() {
            query = query
                .bind((format!("pid{i}"), line.product))
                .bind((format!("qty{i}"), line.quantity));
        }

        let mut response = query.await?;
        let errors = response.take_errors();
        if !errors.is_empty() {
            return Err(map_order_errors(errors));
        }

        let created: Option<Order> = self.base.db().select(oid).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Update an order's status, scoped to `owner`
    pub async fn set_status(
        &self,
        owner: &UserId,
        id: &str,
        status: OrderStatus,
    ) -> RepoResult<Order> {
        let thing = parse_record_id(id, "order")?;
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE order SET status = $status \
                 WHERE id = $thing AND owner = $owner RETURN AFTER",
            )
            .bind(("thing", thing))
            .bind(("owner", owner.clone()))
            .bind(("status", status))
            .await?;
        let updated: Vec<Order> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
    }

    /// Delete the owner's orders among `ids`, returning how many went away.
    ///
    /// Orders belonging to another user and malformed ids are silently
    /// skipped; they just don't count.
    pub async fn delete_many(&self, owner: &UserId, ids: &[String]) -> RepoResult<usize> {
        let things: Vec<RecordId> = ids
            .iter()
            .filter_map(|id| parse_record_id(id, "order").ok())
            .collect();

        let mut result = self
            .base
            .db()
            .query("DELETE order WHERE id IN $things AND owner = $owner RETURN BEFORE")
            .bind(("things", things))
            .bind(("owner", owner.clone()))
            .await?;
        let deleted: Vec<Order> = result.take(0)?;
        Ok(deleted.len())
    }
}

/// Random 20-hex-char order key, generated before the transaction so the
/// created record can be selected back after commit.
fn new_order_id() -> RepoResult<OrderId> {
    let mut bytes = [0u8; 10];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| RepoError::Database("Failed to generate order id".to_string()))?;
    Ok(RecordId::from_table_key("order", hex::encode(bytes)))
}

/// Translate the transaction's statement errors back into a typed repo
/// error.
///
/// Only the THROWn statement carries the marker; every other statement in
/// the rolled-back transaction reports a generic "failed transaction"
/// error, so all of them have to be scanned.
fn map_order_errors(errors: HashMap<usize, surrealdb::Error>) -> RepoError {
    let mut errors: Vec<(usize, surrealdb::Error)> = errors.into_iter().collect();
    errors.sort_by_key(|(idx, _)| *idx);

    for (_, err) in &errors {
        if let Some(mapped) = classify_thrown(&err.to_string()) {
            return mapped;
        }
    }

    let msg = errors
        .into_iter()
        .map(|(_, err)| err.to_string())
        .next()
        .unwrap_or_else(|| "Order transaction failed".to_string());
    RepoError::Database(msg)
}

/// Map one statement's error message to a repo error if it carries a
/// THROW marker.
fn classify_thrown(msg: &str) -> Option<RepoError> {
    if let Some(pid) = marker_payload(msg, THROW_MISSING) {
        return Some(RepoError::NotFound(format!("Product {pid} not found")));
    }
    if let Some(pid) = marker_payload(msg, THROW_STOCK) {
        return Some(RepoError::InsufficientStock(format!(
            "Not enough stock for product {pid}"
        )));
    }
    None
}

/// Product id THROWn after `marker`, if the message carries it.
fn marker_payload<'a>(msg: &'a str, marker: &str) -> Option<&'a str> {
    let pos = msg.find(marker)?;
    msg[pos + marker.len()..]
        .split(|c: char| c == '"' || c.is_whitespace())
        .next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_thrown_markers() {
        match classify_thrown(r#"An error occurred: "order:stock:product:abc123""#) {
            Some(RepoError::InsufficientStock(msg)) => assert!(msg.contains("product:abc123")),
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
        match classify_thrown(r#"An error occurred: "order:missing:product:gone""#) {
            Some(RepoError::NotFound(msg)) => assert!(msg.contains("product:gone")),
            other => panic!("expected NotFound, got {other:?}"),
        }
        // The rolled-back statements report only the failed transaction.
        assert!(classify_thrown("The query was not executed due to a failed transaction").is_none());
    }
}
