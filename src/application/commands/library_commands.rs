//! Library Commands - 分类与文本的写操作

use crate::domain::library::SortEntry;

/// 创建分类命令
#[derive(Debug, Clone)]
pub struct CreateCategory {
    pub name: String,
}

/// 创建文本命令
#[derive(Debug, Clone)]
pub struct CreateText {
    pub category_id: i64,
    pub title: String,
    pub content: String,
}

/// 更新文本命令（标题和内容一起保存）
#[derive(Debug, Clone)]
pub struct UpdateText {
    pub text_id: i64,
    pub title: String,
    pub content: String,
}

/// 批量调整文本顺序
#[derive(Debug, Clone)]
pub struct ReorderTexts {
    pub entries: Vec<SortEntry>,
}

/// 从文本目录导入文件
#[derive(Debug, Clone)]
pub struct ImportTextFile {
    pub file_name: String,
}

/// 把当前文档导出到文本目录
#[derive(Debug, Clone)]
pub struct ExportTextFile {
    /// 为空时按时间生成文件名
    pub file_name: Option<String>,
    pub content: String,
}
