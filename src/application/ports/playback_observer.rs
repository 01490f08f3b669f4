//! Playback Observer Port - 播放状态与状态栏消息

use serde::Serialize;
use std::time::Duration;

use crate::application::playback::PlaybackSnapshot;

/// 状态栏消息级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// 用户可见的状态消息（超时后由外壳隐藏）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
    pub timeout: Duration,
}

impl StatusMessage {
    pub fn new(level: StatusLevel, text: impl Into<String>, timeout: Duration) -> Self {
        Self {
            level,
            text: text.into(),
            timeout,
        }
    }
}

/// Playback Observer Port
pub trait PlaybackObserverPort: Send + Sync {
    /// 状态或游标发生变化
    fn state_changed(&self, snapshot: &PlaybackSnapshot);

    /// 发布状态栏消息
    fn status(&self, message: StatusMessage);
}
