//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（SQLite）

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::library::SortEntry;

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ============================================================================
// Category Repository
// ============================================================================

/// 分类实体（用于持久化）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRecord {
    pub id: i64,
    pub name: String,
}

/// Category Repository Port
#[async_trait]
pub trait CategoryRepositoryPort: Send + Sync {
    /// 获取所有分类（最新创建的在前）
    async fn find_all(&self) -> Result<Vec<CategoryRecord>, RepositoryError>;

    /// 根据 ID 查找分类
    async fn find_by_id(&self, id: i64) -> Result<Option<CategoryRecord>, RepositoryError>;

    /// 创建分类，返回新 ID
    async fn create(&self, name: &str) -> Result<i64, RepositoryError>;
}

// ============================================================================
// Text Repository
// ============================================================================

/// 文本实体（用于持久化）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRecord {
    pub id: i64,
    pub category_id: i64,
    pub title: String,
    pub content: String,
    pub sort_index: i64,
}

/// Text Repository Port
#[async_trait]
pub trait TextRepositoryPort: Send + Sync {
    /// 获取分类下的文本（按 sort_index 升序，其次最新创建的在前）
    async fn find_by_category(&self, category_id: i64) -> Result<Vec<TextRecord>, RepositoryError>;

    /// 根据 ID 查找文本
    async fn find_by_id(&self, id: i64) -> Result<Option<TextRecord>, RepositoryError>;

    /// 只读取文本内容
    async fn find_content(&self, id: i64) -> Result<Option<String>, RepositoryError>;

    /// 创建文本，返回新 ID
    async fn create(&self, category_id: i64, title: &str, content: &str)
        -> Result<i64, RepositoryError>;

    /// 更新标题和内容（同时刷新 updated_at），文本不存在时返回 NotFound
    async fn update(&self, id: i64, title: &str, content: &str) -> Result<(), RepositoryError>;

    /// 批量更新排序位置（单个事务，失败时不留下部分写入）
    async fn reorder(&self, entries: &[SortEntry]) -> Result<(), RepositoryError>;
}
