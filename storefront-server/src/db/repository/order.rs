//! Order Repository

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::{Order, OrderStatus};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const ORDER_TABLE: &str = "orders";

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

    /// Persist a new order
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(ORDER_TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let rid = record_id(ORDER_TABLE, id);
        let order: Option<Order> = self.base.db().select(rid).await?;
        Ok(order)
    }

    /// All orders, newest first, optionally filtered to one user
    pub async fn find_all(&self, user_id: Option<&str>) -> RepoResult<Vec<Order>> {
        let mut result = match user_id {
            Some(user) => {
                self.base
                    .db()
                    .query("SELECT * FROM orders WHERE userId = $user ORDER BY createdAt DESC")
                    .bind(("user", user.to_string()))
                    .await?
            }
            None => {
                self.base
                    .db()
                    .query("SELECT * FROM orders ORDER BY createdAt DESC")
                    .await?
            }
        };
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders)
    }

    /// Conditionally transition an order out of PENDING.
    ///
    /// The WHERE clause enforces the state machine at the store:
    /// returns `None` when the order is missing or already decided.
    pub async fn transition_if_pending(
        &self,
        id: &str,
        new_status: OrderStatus,
    ) -> RepoResult<Option<Order>> {
        let rid = record_id(ORDER_TABLE, id);
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET status = $status WHERE status = 'PENDING' RETURN AFTER")
            .bind(("id", rid))
            .bind(("status", new_status))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }
}
