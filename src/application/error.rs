//! 应用层错误定义
//!
//! 统一的命令/查询/播放错误类型

use thiserror::Error;

use crate::application::ports::{EngineError, RepositoryError, TextFileError};

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 配置错误（未选择音色、存储不可恢复等）
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// 当前状态下命令的前置条件不满足
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// 语音引擎调用失败
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// 存储错误
    #[error("Storage error: {0}")]
    Storage(String),

    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// 验证错误
    #[error("Validation error: {0}")]
    Validation(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// 创建配置错误
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// 创建无效操作错误
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation(message.into())
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// 是否为可忽略的无效操作
    pub fn is_invalid_operation(&self) -> bool {
        matches!(self, Self::InvalidOperation(_))
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => Self::NotFound {
                resource_type: "Entity",
                id,
            },
            other => Self::Storage(other.to_string()),
        }
    }
}

impl From<TextFileError> for ApplicationError {
    fn from(err: TextFileError) -> Self {
        match err {
            TextFileError::FileNotFound(name) => Self::NotFound {
                resource_type: "File",
                id: name,
            },
            TextFileError::InvalidName(msg) | TextFileError::EmptyContent(msg) => {
                Self::Validation(msg)
            }
            TextFileError::IoError(msg) => Self::Storage(msg),
        }
    }
}
