//! Text File Store - 文件系统文本导入导出
//!
//! 实现 TextFilePort trait，所有文件都位于同一个目录下

use async_trait::async_trait;
use chrono::Local;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{TextFileError, TextFilePort};

const TEXT_EXTENSION: &str = "txt";

/// 文件系统文本存储
pub struct TextFileStore {
    /// 文本目录
    base_dir: PathBuf,
}

impl TextFileStore {
    /// 创建文本存储（目录不存在时创建）
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self, TextFileError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| TextFileError::IoError(e.to_string()))?;

        Ok(Self { base_dir })
    }

    /// 只接受目录内的 .txt 文件名
    fn resolve(&self, file_name: &str) -> Result<PathBuf, TextFileError> {
        let name = file_name.trim();
        if name.is_empty()
            || name.contains('/')
            || name.contains('\\')
            || name.contains("..")
            || name.starts_with('.')
        {
            return Err(TextFileError::InvalidName(file_name.to_string()));
        }

        let path = Path::new(name);
        if path.extension().map_or(true, |ext| ext != TEXT_EXTENSION) {
            return Err(TextFileError::InvalidName(format!(
                "{} (expected a .{} file)",
                file_name, TEXT_EXTENSION
            )));
        }

        Ok(self.base_dir.join(name))
    }
}

/// 导出时的默认文件名
fn default_export_name() -> String {
    format!("text-{}.{}", Local::now().format("%Y-%m-%d_%H-%M-%S"), TEXT_EXTENSION)
}

#[async_trait]
impl TextFilePort for TextFileStore {
    async fn list(&self) -> Result<Vec<String>, TextFileError> {
        let mut entries = fs::read_dir(&self.base_dir)
            .await
            .map_err(|e| TextFileError::IoError(e.to_string()))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| TextFileError::IoError(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == TEXT_EXTENSION) && path.is_file() {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    names.push(name.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }

    async fn import(&self, file_name: &str) -> Result<String, TextFileError> {
        let path = self.resolve(file_name)?;

        if !path.exists() {
            return Err(TextFileError::FileNotFound(file_name.to_string()));
        }

        fs::read_to_string(&path)
            .await
            .map_err(|e| TextFileError::IoError(e.to_string()))
    }

    async fn export(&self, file_name: Option<&str>, content: &str) -> Result<String, TextFileError> {
        if content.trim().is_empty() {
            return Err(TextFileError::EmptyContent("document is empty".to_string()));
        }

        let name = match file_name {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => default_export_name(),
        };
        let path = self.resolve(&name)?;

        fs::write(&path, content.as_bytes())
            .await
            .map_err(|e| TextFileError::IoError(e.to_string()))?;

        tracing::debug!(
            path = %path.display(),
            bytes = content.len(),
            "Text file written"
        );

        Ok(name)
    }
}
