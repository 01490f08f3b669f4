//! Text File HTTP Handlers
//!
//! 导入或导出成功后会替换当前文档，此时停止正在进行的播放；
//! 文件名或内容被拒绝时播放不受影响

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{ExportTextFile, ImportTextFile, ListTextFiles};
use crate::infrastructure::http::dto::{
    ApiResponse, ExportFileRequest, FileContentResponse, FileNameResponse, ImportFileRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 列出文本目录中的文件
pub async fn list_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let files = state.list_files_handler.handle(ListTextFiles).await?;
    Ok(Json(ApiResponse::success(files)))
}

/// 导入 TXT 文件
pub async fn import_file(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ImportFileRequest>,
) -> Result<Json<ApiResponse<FileContentResponse>>, ApiError> {
    let response = state
        .import_file_handler
        .handle(ImportTextFile {
            file_name: req.file_name,
        })
        .await?;
    state.playback.stop_if_active().await?;

    Ok(Json(ApiResponse::success(FileContentResponse {
        file_name: response.file_name,
        content: response.content,
    })))
}

/// 导出 TXT 文件
pub async fn export_file(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ExportFileRequest>,
) -> Result<Json<ApiResponse<FileNameResponse>>, ApiError> {
    let file_name = state
        .export_file_handler
        .handle(ExportTextFile {
            file_name: req.file_name,
            content: req.content,
        })
        .await?;
    state.playback.stop_if_active().await?;

    Ok(Json(ApiResponse::success(FileNameResponse { file_name })))
}
