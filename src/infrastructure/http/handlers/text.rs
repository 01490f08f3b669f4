//! Text HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{CreateText, GetText, ListTexts, ReorderTexts, UpdateText};
use crate::domain::library::SortEntry;
use crate::infrastructure::http::dto::{
    ApiResponse, CreateTextRequest, Empty, GetTextRequest, IdResponse, ListTextsRequest,
    ReorderTextsRequest, TextContentResponse, TextDto, UpdateTextRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 列出分类下的文本
pub async fn list_texts(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ListTextsRequest>,
) -> Result<Json<ApiResponse<Vec<TextDto>>>, ApiError> {
    let texts = state
        .list_texts_handler
        .handle(ListTexts {
            category_id: req.category_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(
        texts.into_iter().map(TextDto::from).collect(),
    )))
}

/// 读取文本内容
pub async fn get_text(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GetTextRequest>,
) -> Result<Json<ApiResponse<TextContentResponse>>, ApiError> {
    let content = state
        .get_text_handler
        .handle(GetText { text_id: req.id })
        .await?;

    Ok(Json(ApiResponse::success(TextContentResponse {
        id: req.id,
        content,
    })))
}

/// 创建文本
pub async fn create_text(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTextRequest>,
) -> Result<Json<ApiResponse<IdResponse>>, ApiError> {
    let response = state
        .create_text_handler
        .handle(CreateText {
            category_id: req.category_id,
            title: req.title,
            content: req.content,
        })
        .await?;

    Ok(Json(ApiResponse::success(IdResponse { id: response.id })))
}

/// 更新文本
pub async fn update_text(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateTextRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state
        .update_text_handler
        .handle(UpdateText {
            text_id: req.id,
            title: req.title,
            content: req.content,
        })
        .await?;

    Ok(Json(ApiResponse::ok()))
}

/// 批量调整文本顺序
pub async fn reorder_texts(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReorderTextsRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let entries = req
        .items
        .into_iter()
        .map(|item| SortEntry {
            text_id: item.id,
            sort_index: item.sort_index,
        })
        .collect();

    state
        .reorder_texts_handler
        .handle(ReorderTexts { entries })
        .await?;

    Ok(Json(ApiResponse::ok()))
}
