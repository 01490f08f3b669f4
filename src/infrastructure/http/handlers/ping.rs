//! Ping Handler
//!
//! 健康检查，同时报告当前播放状态

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::domain::playback::PlaybackState;
use crate::infrastructure::http::state::AppState;

/// Ping 响应
#[derive(Serialize)]
pub struct PingResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// 播放驱动未运行时为 None
    pub playback: Option<PlaybackState>,
}

/// Ping endpoint - 健康检查
pub async fn ping(State(state): State<Arc<AppState>>) -> Json<PingResponse> {
    let playback = state
        .playback
        .status()
        .await
        .ok()
        .map(|outcome| outcome.snapshot.state);

    Json(PingResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        playback,
    })
}
