//! Library Command Handlers - 分类与文本写操作

use std::sync::Arc;

use crate::application::commands::{CreateCategory, CreateText, ReorderTexts, UpdateText};
use crate::application::error::ApplicationError;
use crate::application::ports::{CategoryRepositoryPort, TextRepositoryPort};
use crate::domain::library::{CategoryName, TextTitle};

// ============================================================================
// CreateCategory
// ============================================================================

/// 创建分类响应
#[derive(Debug, Clone)]
pub struct CreateCategoryResponse {
    pub id: i64,
    pub name: String,
}

/// CreateCategory Handler
pub struct CreateCategoryHandler {
    category_repo: Arc<dyn CategoryRepositoryPort>,
}

impl CreateCategoryHandler {
    pub fn new(category_repo: Arc<dyn CategoryRepositoryPort>) -> Self {
        Self { category_repo }
    }

    pub async fn handle(
        &self,
        command: CreateCategory,
    ) -> Result<CreateCategoryResponse, ApplicationError> {
        let name = CategoryName::new(command.name).map_err(ApplicationError::validation)?;
        let id = self.category_repo.create(name.as_str()).await?;

        tracing::info!(category_id = id, name = %name, "Category created");

        Ok(CreateCategoryResponse {
            id,
            name: name.as_str().to_string(),
        })
    }
}

// ============================================================================
// CreateText
// ============================================================================

/// 创建文本响应
#[derive(Debug, Clone)]
pub struct CreateTextResponse {
    pub id: i64,
    pub category_id: i64,
    pub title: String,
}

/// CreateText Handler - 分类必须存在
pub struct CreateTextHandler {
    category_repo: Arc<dyn CategoryRepositoryPort>,
    text_repo: Arc<dyn TextRepositoryPort>,
}

impl CreateTextHandler {
    pub fn new(
        category_repo: Arc<dyn CategoryRepositoryPort>,
        text_repo: Arc<dyn TextRepositoryPort>,
    ) -> Self {
        Self {
            category_repo,
            text_repo,
        }
    }

    pub async fn handle(&self, command: CreateText) -> Result<CreateTextResponse, ApplicationError> {
        let title = TextTitle::new(command.title).map_err(ApplicationError::validation)?;

        self.category_repo
            .find_by_id(command.category_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Category", command.category_id))?;

        let id = self
            .text_repo
            .create(command.category_id, title.as_str(), &command.content)
            .await?;

        tracing::info!(
            text_id = id,
            category_id = command.category_id,
            title = %title,
            chars = command.content.chars().count(),
            "Text created"
        );

        Ok(CreateTextResponse {
            id,
            category_id: command.category_id,
            title: title.as_str().to_string(),
        })
    }
}

// ============================================================================
// UpdateText
// ============================================================================

/// UpdateText Handler
pub struct UpdateTextHandler {
    text_repo: Arc<dyn TextRepositoryPort>,
}

impl UpdateTextHandler {
    pub fn new(text_repo: Arc<dyn TextRepositoryPort>) -> Self {
        Self { text_repo }
    }

    pub async fn handle(&self, command: UpdateText) -> Result<(), ApplicationError> {
        let title = TextTitle::new(command.title).map_err(ApplicationError::validation)?;

        self.text_repo
            .update(command.text_id, title.as_str(), &command.content)
            .await
            .map_err(|e| match ApplicationError::from(e) {
                ApplicationError::NotFound { .. } => {
                    ApplicationError::not_found("Text", command.text_id)
                }
                other => other,
            })?;

        tracing::info!(text_id = command.text_id, title = %title, "Text updated");
        Ok(())
    }
}

// ============================================================================
// ReorderTexts
// ============================================================================

/// ReorderTexts Handler - 所有条目在一个事务内写入
pub struct ReorderTextsHandler {
    text_repo: Arc<dyn TextRepositoryPort>,
}

impl ReorderTextsHandler {
    pub fn new(text_repo: Arc<dyn TextRepositoryPort>) -> Self {
        Self { text_repo }
    }

    pub async fn handle(&self, command: ReorderTexts) -> Result<usize, ApplicationError> {
        if command.entries.is_empty() {
            return Ok(0);
        }

        self.text_repo.reorder(&command.entries).await?;

        tracing::debug!(count = command.entries.len(), "Texts reordered");
        Ok(command.entries.len())
    }
}
