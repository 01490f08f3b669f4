//! SQLite Text Repository

use async_trait::async_trait;
use sqlx::FromRow;

use super::DbPool;
use crate::application::ports::{RepositoryError, TextRecord, TextRepositoryPort};
use crate::domain::library::SortEntry;

/// SQLite Text Repository
pub struct SqliteTextRepository {
    pool: DbPool,
}

impl SqliteTextRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct TextRow {
    id: i64,
    category_id: Option<i64>,
    title: String,
    content: Option<String>,
    sort_index: Option<i64>,
}

impl From<TextRow> for TextRecord {
    fn from(row: TextRow) -> Self {
        TextRecord {
            id: row.id,
            category_id: row.category_id.unwrap_or_default(),
            title: row.title,
            content: row.content.unwrap_or_default(),
            sort_index: row.sort_index.unwrap_or_default(),
        }
    }
}

#[async_trait]
impl TextRepositoryPort for SqliteTextRepository {
    async fn find_by_category(&self, category_id: i64) -> Result<Vec<TextRecord>, RepositoryError> {
        let rows: Vec<TextRow> = sqlx::query_as(
            r#"
            SELECT id, category_id, title, content, sort_index
            FROM texts
            WHERE category_id = ?
            ORDER BY sort_index ASC, created_at DESC, id DESC
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(TextRecord::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<TextRecord>, RepositoryError> {
        let row: Option<TextRow> = sqlx::query_as(
            "SELECT id, category_id, title, content, sort_index FROM texts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(row.map(TextRecord::from))
    }

    async fn find_content(&self, id: i64) -> Result<Option<String>, RepositoryError> {
        let content: Option<Option<String>> =
            sqlx::query_scalar("SELECT content FROM texts WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(content.map(Option::unwrap_or_default))
    }

    async fn create(
        &self,
        category_id: i64,
        title: &str,
        content: &str,
    ) -> Result<i64, RepositoryError> {
        let result =
            sqlx::query("INSERT INTO texts (category_id, title, content) VALUES (?, ?, ?)")
                .bind(category_id)
                .bind(title)
                .bind(content)
                .execute(&self.pool)
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(result.last_insert_rowid())
    }

    async fn update(&self, id: i64, title: &str, content: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE texts
            SET title = ?, content = ?, updated_at = datetime('now', 'localtime')
            WHERE id = ?
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn reorder(&self, entries: &[SortEntry]) -> Result<(), RepositoryError> {
        // 使用事务确保原子性
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        for entry in entries {
            sqlx::query("UPDATE texts SET sort_index = ? WHERE id = ?")
                .bind(entry.sort_index)
                .bind(entry.text_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
