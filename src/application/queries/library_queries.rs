//! Library Queries - 分类与文本的读操作

/// 列出所有分类
#[derive(Debug, Clone)]
pub struct ListCategories;

/// 列出分类下的文本
#[derive(Debug, Clone)]
pub struct ListTexts {
    pub category_id: i64,
}

/// 读取单个文本
#[derive(Debug, Clone)]
pub struct GetText {
    pub text_id: i64,
}

/// 列出文本目录中的文件
#[derive(Debug, Clone)]
pub struct ListTextFiles;
