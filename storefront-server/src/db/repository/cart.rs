//! Cart Repository
//!
//! One document per (userId, productId); quantity accumulates on
//! repeated adds.

use super::{BaseRepository, RepoError, RepoResult, record_key};
use crate::db::models::CartEntry;
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const CART_TABLE: &str = "cart_entry";

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All cart entries for one user
    pub async fn find_by_user(&self, user_id: &str) -> RepoResult<Vec<CartEntry>> {
        let entries: Vec<CartEntry> = self
            .base
            .db()
            .query("SELECT * FROM cart_entry WHERE userId = $user ORDER BY createdAt")
            .bind(("user", user_id.to_string()))
            .await?
            .take(0)?;
        Ok(entries)
    }

    /// Add quantity for (user, product), accumulating into an existing
    /// entry when one exists
    pub async fn add(&self, user_id: &str, product_id: &str, quantity: i64) -> RepoResult<CartEntry> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE cart_entry SET quantity += $qty \
                 WHERE userId = $user AND productId = $pid RETURN AFTER",
            )
            .bind(("qty", quantity))
            .bind(("user", user_id.to_string()))
            .bind(("pid", product_id.to_string()))
            .await?;
        let updated: Vec<CartEntry> = result.take(0)?;
        if let Some(entry) = updated.into_iter().next() {
            return Ok(entry);
        }

        let entry = CartEntry {
            id: None,
            user_id: user_id.to_string(),
            product_id: product_id.to_string(),
            quantity,
            created_at: Utc::now(),
        };
        let created: Option<CartEntry> = self.base.db().create(CART_TABLE).content(entry).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create cart entry".to_string()))
    }

    /// Remove one cart entry
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let pure_id = record_key(CART_TABLE, id);
        let result: Option<CartEntry> = self.base.db().delete((CART_TABLE, pure_id)).await?;
        if result.is_none() {
            return Err(RepoError::NotFound(format!("Cart entry {} not found", id)));
        }
        Ok(())
    }
}
