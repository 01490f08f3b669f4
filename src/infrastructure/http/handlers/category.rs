//! Category HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{CreateCategory, ListCategories};
use crate::infrastructure::http::dto::{ApiResponse, CategoryDto, CreateCategoryRequest, IdResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 列出所有分类
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<CategoryDto>>>, ApiError> {
    let categories = state.list_categories_handler.handle(ListCategories).await?;

    Ok(Json(ApiResponse::success(
        categories.into_iter().map(CategoryDto::from).collect(),
    )))
}

/// 创建分类
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<Json<ApiResponse<IdResponse>>, ApiError> {
    let response = state
        .create_category_handler
        .handle(CreateCategory { name: req.name })
        .await?;

    Ok(Json(ApiResponse::success(IdResponse { id: response.id })))
}
