//! Data Transfer Objects

use serde::{Deserialize, Serialize};

use crate::application::{CategoryResponse, PlaybackSnapshot, TextResponse};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 空数据响应
#[derive(Debug, Serialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    /// 成功但无数据
    pub fn ok() -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(Empty {}),
        }
    }
}

/// 新建资源的 ID
#[derive(Debug, Serialize)]
pub struct IdResponse {
    pub id: i64,
}

// ============================================================================
// Category DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CategoryDto {
    pub id: i64,
    pub name: String,
}

impl From<CategoryResponse> for CategoryDto {
    fn from(category: CategoryResponse) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

// ============================================================================
// Text DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListTextsRequest {
    pub category_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct GetTextRequest {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateTextRequest {
    pub category_id: i64,
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTextRequest {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ReorderItem {
    pub id: i64,
    pub sort_index: i64,
}

#[derive(Debug, Deserialize)]
pub struct ReorderTextsRequest {
    pub items: Vec<ReorderItem>,
}

#[derive(Debug, Serialize)]
pub struct TextDto {
    pub id: i64,
    pub category_id: i64,
    pub title: String,
    pub content: String,
    pub sort_index: i64,
}

impl From<TextResponse> for TextDto {
    fn from(text: TextResponse) -> Self {
        Self {
            id: text.id,
            category_id: text.category_id,
            title: text.title,
            content: text.content,
            sort_index: text.sort_index,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TextContentResponse {
    pub id: i64,
    pub content: String,
}

// ============================================================================
// File DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ImportFileRequest {
    pub file_name: String,
}

#[derive(Debug, Deserialize)]
pub struct ExportFileRequest {
    #[serde(default)]
    pub file_name: Option<String>,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct FileContentResponse {
    pub file_name: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct FileNameResponse {
    pub file_name: String,
}

// ============================================================================
// Playback DTOs
// ============================================================================

/// 开始播放 / 播放暂停切换
///
/// `rate` 为 -10..=10 的档位；只给 `speed`（1.0 为正常速度）时按倍速换算
#[derive(Debug, Default, Deserialize)]
pub struct StartPlaybackRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default)]
    pub rate: Option<i32>,
    #[serde(default)]
    pub speed: Option<f32>,
}

/// 播放命令结果
#[derive(Debug, Serialize)]
pub struct PlaybackResponse {
    pub changed: bool,
    pub snapshot: PlaybackSnapshot,
}
