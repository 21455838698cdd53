//! Category Repository

use super::{BaseRepository, RepoError, RepoResult, record_key};
use crate::db::models::{Category, CategoryCreate};
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const CATEGORY_TABLE: &str = "category";

#[derive(Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all categories
    pub async fn find_all(&self) -> RepoResult<Vec<Category>> {
        let categories: Vec<Category> = self
            .base
            .db()
            .query("SELECT * FROM category ORDER BY name")
            .await?
            .take(0)?;
        Ok(categories)
    }

    /// Find category by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Category>> {
        let pure_id = record_key(CATEGORY_TABLE, id);
        let category: Option<Category> = self.base.db().select((CATEGORY_TABLE, pure_id)).await?;
        Ok(category)
    }

    /// Check that a category exists
    pub async fn exists(&self, id: &str) -> RepoResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    /// Create a new category
    pub async fn create(&self, data: CategoryCreate) -> RepoResult<Category> {
        let category = Category {
            id: None,
            name: data.name,
            created_at: Utc::now(),
        };

        let created: Option<Category> = self
            .base
            .db()
            .create(CATEGORY_TABLE)
            .content(category)
            .await?;

        created.ok_or_else(|| RepoError::Database("Failed to create category".to_string()))
    }
}
