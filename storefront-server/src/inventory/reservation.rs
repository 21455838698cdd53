//! Reservation Manager
//!
//! Pessimistic stock reservations: checkout reserves by appending an
//! OUT/PENDING movement, an admin decision later confirms or releases
//! it.
//!
//! The availability check and the append are serialized per product
//! through a shared lock map, so two concurrent reservations cannot
//! both pass the check and over-reserve. Confirm/release resolve by
//! movement id when the caller has one (stored on the order line at
//! reservation time); the latest-pending-by-product lookup remains as
//! a fallback for lines written without a movement id.

use std::sync::Arc;

use dashmap::DashMap;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::Mutex;

use super::{StockError, StockLedger};
use crate::db::models::{MovementKind, MovementStatus, StockMovement};

/// Per-product reservation serialization + resolution
#[derive(Clone)]
pub struct ReservationManager {
    ledger: StockLedger,
    product_locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl ReservationManager {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            ledger: StockLedger::new(db),
            product_locks: Arc::new(DashMap::new()),
        }
    }

    pub fn ledger(&self) -> &StockLedger {
        &self.ledger
    }

    fn lock_for(&self, product_ref: &str) -> Arc<Mutex<()>> {
        self.product_locks
            .entry(product_ref.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Reserve `quantity` units of a product.
    ///
    /// Reads derived availability and appends an OUT/PENDING movement.
    /// Fails with [`StockError::OutOfStock`] and performs no write when
    /// the requested quantity exceeds availability. The per-product
    /// lock is held across the check and the append.
    pub async fn reserve(
        &self,
        product_id: &str,
        quantity: i64,
    ) -> Result<StockMovement, StockError> {
        if quantity <= 0 {
            return Err(StockError::InvalidQuantity(quantity));
        }

        let pid = StockLedger::product_ref(product_id);
        let lock = self.lock_for(&pid);
        let _guard = lock.lock().await;

        let available = self.ledger.available_for_sale(&pid).await?;
        if quantity > available {
            tracing::info!(
                product_id = %pid,
                available,
                requested = quantity,
                "Reservation refused: out of stock"
            );
            return Err(StockError::OutOfStock {
                product_id: pid,
                available,
                requested: quantity,
            });
        }

        self.ledger
            .record(
                &pid,
                MovementKind::Out,
                quantity,
                Some("reservation".to_string()),
                Some(MovementStatus::Pending),
            )
            .await
    }

    /// Confirm a reservation by its movement id (consumes the stock)
    pub async fn confirm_movement(&self, movement_id: &str) -> Result<StockMovement, StockError> {
        self.ledger.resolve(movement_id, MovementStatus::Confirmed).await
    }

    /// Release a reservation by its movement id (back to the pool)
    pub async fn release_movement(&self, movement_id: &str) -> Result<StockMovement, StockError> {
        self.ledger.resolve(movement_id, MovementStatus::Returned).await
    }

    /// Confirm the latest pending reservation for a product.
    ///
    /// Soft-fails with [`StockError::NoPendingReservation`] when the
    /// product has no pending movement; callers aggregate per item.
    pub async fn confirm_product(&self, product_id: &str) -> Result<StockMovement, StockError> {
        self.resolve_latest(product_id, MovementStatus::Confirmed).await
    }

    /// Release the latest pending reservation for a product
    pub async fn release_product(&self, product_id: &str) -> Result<StockMovement, StockError> {
        self.resolve_latest(product_id, MovementStatus::Returned).await
    }

    async fn resolve_latest(
        &self,
        product_id: &str,
        status: MovementStatus,
    ) -> Result<StockMovement, StockError> {
        let pid = StockLedger::product_ref(product_id);
        let Some(pending) = self.ledger.latest_pending(&pid).await? else {
            return Err(StockError::NoPendingReservation(pid));
        };
        self.ledger.resolve(&pending.id_string(), status).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::models::{CategoryCreate, ProductCreate};
    use crate::db::repository::{CategoryRepository, ProductRepository};

    async fn test_db() -> Surreal<Db> {
        DbService::open_in_memory().await.unwrap().db
    }

    async fn seed_product_with_stock(db: &Surreal<Db>, stock: i64) -> String {
        let category = CategoryRepository::new(db.clone())
            .create(CategoryCreate {
                name: "Drinks".to_string(),
            })
            .await
            .unwrap();
        let product = ProductRepository::new(db.clone())
            .create(ProductCreate {
                name: "Espresso".to_string(),
                price: 2.5,
                category: category.id.unwrap().to_string(),
                image: None,
                description: None,
                initial_stock: None,
            })
            .await
            .unwrap();
        let pid = product.id.unwrap().to_string();
        if stock > 0 {
            StockLedger::new(db.clone())
                .record(&pid, MovementKind::In, stock, Some("initial stock".into()), None)
                .await
                .unwrap();
        }
        pid
    }

    #[tokio::test]
    async fn reserve_appends_pending_movement() {
        let db = test_db().await;
        let pid = seed_product_with_stock(&db, 5).await;
        let reservations = ReservationManager::new(db);

        let movement = reservations.reserve(&pid, 3).await.unwrap();
        assert_eq!(movement.kind, MovementKind::Out);
        assert_eq!(movement.status, Some(MovementStatus::Pending));
        assert_eq!(movement.quantity, 3);

        assert_eq!(reservations.ledger().available(&pid).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn reserve_never_exceeds_availability() {
        let db = test_db().await;
        let pid = seed_product_with_stock(&db, 5).await;
        let reservations = ReservationManager::new(db);

        let err = reservations.reserve(&pid, 10).await.unwrap_err();
        match err {
            StockError::OutOfStock {
                available,
                requested,
                ..
            } => {
                assert_eq!(available, 5);
                assert_eq!(requested, 10);
            }
            other => panic!("expected OutOfStock, got {other:?}"),
        }

        // No write happened
        assert_eq!(reservations.ledger().available(&pid).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn concurrent_reserves_are_serialized_per_product() {
        let db = test_db().await;
        let pid = seed_product_with_stock(&db, 5).await;
        let reservations = ReservationManager::new(db);

        // Both tasks want 3 of 5; only one can win
        let r1 = reservations.clone();
        let r2 = reservations.clone();
        let p1 = pid.clone();
        let p2 = pid.clone();
        let (a, b) = tokio::join!(
            tokio::spawn(async move { r1.reserve(&p1, 3).await }),
            tokio::spawn(async move { r2.reserve(&p2, 3).await }),
        );
        let results = [a.unwrap(), b.unwrap()];
        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);

        assert_eq!(reservations.ledger().available(&pid).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn confirm_and_release_by_movement_id() {
        let db = test_db().await;
        let pid = seed_product_with_stock(&db, 5).await;
        let reservations = ReservationManager::new(db);

        let first = reservations.reserve(&pid, 2).await.unwrap();
        let second = reservations.reserve(&pid, 1).await.unwrap();

        let confirmed = reservations
            .confirm_movement(&first.id_string())
            .await
            .unwrap();
        assert_eq!(confirmed.status, Some(MovementStatus::Confirmed));

        let released = reservations
            .release_movement(&second.id_string())
            .await
            .unwrap();
        assert_eq!(released.status, Some(MovementStatus::Returned));

        // 5 - 2 confirmed, the released unit is back
        assert_eq!(reservations.ledger().available(&pid).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn product_fallback_soft_fails_without_pending() {
        let db = test_db().await;
        let pid = seed_product_with_stock(&db, 5).await;
        let reservations = ReservationManager::new(db);

        let err = reservations.confirm_product(&pid).await.unwrap_err();
        assert!(matches!(err, StockError::NoPendingReservation(_)));

        let err = reservations.release_product(&pid).await.unwrap_err();
        assert!(matches!(err, StockError::NoPendingReservation(_)));
    }

    #[tokio::test]
    async fn product_fallback_resolves_latest_pending() {
        let db = test_db().await;
        let pid = seed_product_with_stock(&db, 5).await;
        let reservations = ReservationManager::new(db);

        reservations.reserve(&pid, 1).await.unwrap();
        let latest = reservations.reserve(&pid, 2).await.unwrap();

        let resolved = reservations.release_product(&pid).await.unwrap();
        assert_eq!(resolved.id_string(), latest.id_string());
        assert_eq!(reservations.ledger().available(&pid).await.unwrap(), 4);
    }
}
