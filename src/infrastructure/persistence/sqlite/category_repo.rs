//! SQLite Category Repository

use async_trait::async_trait;
use sqlx::FromRow;

use super::DbPool;
use crate::application::ports::{CategoryRecord, CategoryRepositoryPort, RepositoryError};

/// SQLite Category Repository
pub struct SqliteCategoryRepository {
    pool: DbPool,
}

impl SqliteCategoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
}

impl From<CategoryRow> for CategoryRecord {
    fn from(row: CategoryRow) -> Self {
        CategoryRecord {
            id: row.id,
            name: row.name,
        }
    }
}

#[async_trait]
impl CategoryRepositoryPort for SqliteCategoryRepository {
    async fn find_all(&self) -> Result<Vec<CategoryRecord>, RepositoryError> {
        let rows: Vec<CategoryRow> =
            sqlx::query_as("SELECT id, name FROM categories ORDER BY created_at DESC, id DESC")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(CategoryRecord::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<CategoryRecord>, RepositoryError> {
        let row: Option<CategoryRow> = sqlx::query_as("SELECT id, name FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(row.map(CategoryRecord::from))
    }

    async fn create(&self, name: &str) -> Result<i64, RepositoryError> {
        let result = sqlx::query("INSERT INTO categories (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(result.last_insert_rowid())
    }
}
