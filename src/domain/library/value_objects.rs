//! Library Context - Value Objects

use serde::{Deserialize, Serialize};

/// 分类名称
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryName(String);

impl CategoryName {
    pub const MAX_CHARS: usize = 100;

    pub fn new(name: impl Into<String>) -> Result<Self, &'static str> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err("分类名称不能为空");
        }
        if name.chars().count() > Self::MAX_CHARS {
            return Err("分类名称长度不能超过100字符");
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 文本标题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextTitle(String);

impl TextTitle {
    pub const MAX_CHARS: usize = 200;

    pub fn new(title: impl Into<String>) -> Result<Self, &'static str> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err("标题不能为空");
        }
        if title.chars().count() > Self::MAX_CHARS {
            return Err("标题长度不能超过200字符");
        }
        Ok(Self(title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TextTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 文本排序位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortEntry {
    pub text_id: i64,
    pub sort_index: i64,
}
