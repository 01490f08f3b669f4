//! Playback HTTP Handlers
//!
//! 所有命令都转发给 PlaybackDriver 串行执行

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{ApplicationError, PlaybackOutcome, StartPlayback};
use crate::domain::playback::{SpeechRate, VoiceId};
use crate::infrastructure::http::dto::{ApiResponse, PlaybackResponse, StartPlaybackRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

type PlaybackResult = Result<Json<ApiResponse<PlaybackResponse>>, ApiError>;

/// 请求中的音色优先，未指定时使用配置的默认音色
///
/// 指定了但无效的音色直接拒绝，不回退到默认音色
fn start_request(
    state: &AppState,
    req: StartPlaybackRequest,
) -> Result<StartPlayback, ApplicationError> {
    let voice = match req.voice {
        Some(voice) => Some(VoiceId::new(voice).map_err(ApplicationError::validation)?),
        None => state.default_voice.clone(),
    };

    let rate = match (req.rate, req.speed) {
        (Some(rate), _) => SpeechRate::new(rate),
        (None, Some(speed)) => SpeechRate::from_speed(speed),
        (None, None) => SpeechRate::default(),
    };

    Ok(StartPlayback {
        text: req.text,
        voice,
        rate,
    })
}

fn respond(result: Result<PlaybackOutcome, ApplicationError>) -> PlaybackResult {
    let outcome = result?;
    Ok(Json(ApiResponse::success(PlaybackResponse {
        changed: outcome.changed,
        snapshot: outcome.snapshot,
    })))
}

/// 开始播放
pub async fn start_playback(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StartPlaybackRequest>,
) -> PlaybackResult {
    let request = start_request(&state, req)?;
    respond(state.playback.start(request).await)
}

/// 播放/暂停切换
pub async fn toggle_playback(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StartPlaybackRequest>,
) -> PlaybackResult {
    let request = start_request(&state, req)?;
    respond(state.playback.toggle(request).await)
}

/// 暂停
pub async fn pause_playback(State(state): State<Arc<AppState>>) -> PlaybackResult {
    respond(state.playback.pause().await)
}

/// 继续
pub async fn resume_playback(State(state): State<Arc<AppState>>) -> PlaybackResult {
    respond(state.playback.resume().await)
}

/// 停止
pub async fn stop_playback(State(state): State<Arc<AppState>>) -> PlaybackResult {
    respond(state.playback.stop().await)
}

/// 下一句
pub async fn next_sentence(State(state): State<Arc<AppState>>) -> PlaybackResult {
    respond(state.playback.next().await)
}

/// 上一句
pub async fn previous_sentence(State(state): State<Arc<AppState>>) -> PlaybackResult {
    respond(state.playback.previous().await)
}

/// 当前播放状态
pub async fn playback_status(State(state): State<Arc<AppState>>) -> PlaybackResult {
    respond(state.playback.status().await)
}
