//! Text File Port - 纯文本文件导入导出抽象

use async_trait::async_trait;
use thiserror::Error;

/// 文本文件错误
#[derive(Debug, Error)]
pub enum TextFileError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("Nothing to save: {0}")]
    EmptyContent(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Text File Port
#[async_trait]
pub trait TextFilePort: Send + Sync {
    /// 列出所有 .txt 文件名（按名称排序）
    async fn list(&self) -> Result<Vec<String>, TextFileError>;

    /// 读取文件内容（UTF-8）
    async fn import(&self, file_name: &str) -> Result<String, TextFileError>;

    /// 保存内容，未指定文件名时按时间生成，返回实际文件名
    async fn export(&self, file_name: Option<&str>, content: &str) -> Result<String, TextFileError>;
}
