//! Text File Command Handlers - 文本文件导入导出

use std::sync::Arc;

use crate::application::commands::{ExportTextFile, ImportTextFile};
use crate::application::error::ApplicationError;
use crate::application::ports::TextFilePort;

/// 导入结果
#[derive(Debug, Clone)]
pub struct ImportTextFileResponse {
    pub file_name: String,
    pub content: String,
}

/// ImportTextFile Handler
pub struct ImportTextFileHandler {
    files: Arc<dyn TextFilePort>,
}

impl ImportTextFileHandler {
    pub fn new(files: Arc<dyn TextFilePort>) -> Self {
        Self { files }
    }

    pub async fn handle(
        &self,
        command: ImportTextFile,
    ) -> Result<ImportTextFileResponse, ApplicationError> {
        let content = self.files.import(&command.file_name).await?;

        tracing::info!(
            file = %command.file_name,
            chars = content.chars().count(),
            "Text file imported"
        );

        Ok(ImportTextFileResponse {
            file_name: command.file_name,
            content,
        })
    }
}

/// ExportTextFile Handler - 返回实际写入的文件名
pub struct ExportTextFileHandler {
    files: Arc<dyn TextFilePort>,
}

impl ExportTextFileHandler {
    pub fn new(files: Arc<dyn TextFilePort>) -> Self {
        Self { files }
    }

    pub async fn handle(&self, command: ExportTextFile) -> Result<String, ApplicationError> {
        let file_name = self
            .files
            .export(command.file_name.as_deref(), &command.content)
            .await?;

        tracing::info!(file = %file_name, "Text file exported");
        Ok(file_name)
    }
}
