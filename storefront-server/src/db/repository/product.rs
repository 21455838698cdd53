//! Product Repository

use super::{BaseRepository, RepoError, RepoResult, record_id, record_key};
use crate::db::models::{Product, ProductCreate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const PRODUCT_TABLE: &str = "product";

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

    /// Find all active products
    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE isActive = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let pure_id = record_key(PRODUCT_TABLE, id);
        let product: Option<Product> = self.base.db().select((PRODUCT_TABLE, pure_id)).await?;
        Ok(product)
    }

    /// Check that a product exists (active or not)
    pub async fn exists(&self, id: &str) -> RepoResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    /// Create a new product
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        let product = Product {
            id: None,
            name: data.name,
            price: data.price,
            category: data.category,
            image: data.image.unwrap_or_default(),
            description: data.description.unwrap_or_default(),
            is_active: true,
        };

        let created: Option<Product> = self
            .base
            .db()
            .create(PRODUCT_TABLE)
            .content(product)
            .await?;

        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Hard delete a product together with its ledger entries
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let pure_id = record_key(PRODUCT_TABLE, id);
        let thing = record_id(PRODUCT_TABLE, pure_id);

        // Clean up the movement ledger first
        self.base
            .db()
            .query("DELETE stock_movement WHERE productId = $pid")
            .bind(("pid", thing.to_string()))
            .await?;

        // Then delete the product
        let result: Option<Product> = self.base.db().delete((PRODUCT_TABLE, pure_id)).await?;
        if result.is_none() {
            return Err(RepoError::NotFound(format!("Product {} not found", id)));
        }
        Ok(())
    }
}
