//! Library Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    CategoryRecord, CategoryRepositoryPort, TextFilePort, TextRecord, TextRepositoryPort,
};
use crate::application::queries::{GetText, ListCategories, ListTextFiles, ListTexts};

// ============================================================================
// Response DTOs
// ============================================================================

/// 分类响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
}

impl From<CategoryRecord> for CategoryResponse {
    fn from(record: CategoryRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
        }
    }
}

/// 文本响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextResponse {
    pub id: i64,
    pub category_id: i64,
    pub title: String,
    pub content: String,
    pub sort_index: i64,
}

impl From<TextRecord> for TextResponse {
    fn from(record: TextRecord) -> Self {
        Self {
            id: record.id,
            category_id: record.category_id,
            title: record.title,
            content: record.content,
            sort_index: record.sort_index,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// ListCategories Handler
pub struct ListCategoriesHandler {
    category_repo: Arc<dyn CategoryRepositoryPort>,
}

impl ListCategoriesHandler {
    pub fn new(category_repo: Arc<dyn CategoryRepositoryPort>) -> Self {
        Self { category_repo }
    }

    pub async fn handle(
        &self,
        _query: ListCategories,
    ) -> Result<Vec<CategoryResponse>, ApplicationError> {
        let categories = self.category_repo.find_all().await?;
        Ok(categories.into_iter().map(CategoryResponse::from).collect())
    }
}

/// ListTexts Handler
pub struct ListTextsHandler {
    text_repo: Arc<dyn TextRepositoryPort>,
}

impl ListTextsHandler {
    pub fn new(text_repo: Arc<dyn TextRepositoryPort>) -> Self {
        Self { text_repo }
    }

    pub async fn handle(&self, query: ListTexts) -> Result<Vec<TextResponse>, ApplicationError> {
        let texts = self.text_repo.find_by_category(query.category_id).await?;
        Ok(texts.into_iter().map(TextResponse::from).collect())
    }
}

/// GetText Handler - 只返回内容
pub struct GetTextHandler {
    text_repo: Arc<dyn TextRepositoryPort>,
}

impl GetTextHandler {
    pub fn new(text_repo: Arc<dyn TextRepositoryPort>) -> Self {
        Self { text_repo }
    }

    pub async fn handle(&self, query: GetText) -> Result<String, ApplicationError> {
        self.text_repo
            .find_content(query.text_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Text", query.text_id))
    }
}

/// ListTextFiles Handler
pub struct ListTextFilesHandler {
    files: Arc<dyn TextFilePort>,
}

impl ListTextFilesHandler {
    pub fn new(files: Arc<dyn TextFilePort>) -> Self {
        Self { files }
    }

    pub async fn handle(&self, _query: ListTextFiles) -> Result<Vec<String>, ApplicationError> {
        Ok(self.files.list().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteCategoryRepository,
        SqliteTextRepository,
    };

    #[tokio::test]
    async fn test_get_text_returns_content() {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        let categories = Arc::new(SqliteCategoryRepository::new(pool.clone()));
        let texts = Arc::new(SqliteTextRepository::new(pool));

        let category_id = categories.create("Prose").await.unwrap();
        let text_id = texts
            .create(category_id, "Note", "First. Second.")
            .await
            .unwrap();

        let handler = GetTextHandler::new(texts.clone());
        let content = handler.handle(GetText { text_id }).await.unwrap();
        assert_eq!(content, "First. Second.");

        let err = handler.handle(GetText { text_id: 999 }).await.unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));

        let listed = ListTextsHandler::new(texts)
            .handle(ListTexts { category_id })
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Note");
    }
}
