//! Playback Context - Value Objects

use serde::{Deserialize, Serialize};

/// 音色标识（由外壳提供的不透明 ID）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoiceId(String);

impl VoiceId {
    pub fn new(id: impl Into<String>) -> Result<Self, &'static str> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("音色 ID 不能为空");
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VoiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 语速（引擎单位，-10 ~ 10，0 为正常语速）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpeechRate(i32);

impl SpeechRate {
    pub const MIN: i32 = -10;
    pub const MAX: i32 = 10;

    /// 超出范围的值会被截断到边界
    pub fn new(rate: i32) -> Self {
        Self(rate.clamp(Self::MIN, Self::MAX))
    }

    /// 从倍速换算（1.0 为正常语速，每 0.1 倍对应 1 个单位）
    ///
    /// 倍速来自 0.1 步进的滑块，f32 表示不精确（1.3 实际是 1.2999...），
    /// 所以取最近的档位而不是直接截断
    pub fn from_speed(speed: f32) -> Self {
        if !speed.is_finite() {
            return Self::default();
        }
        let steps = ((f64::from(speed) - 1.0) * 10.0).round();
        Self::new(steps.clamp(f64::from(Self::MIN), f64::from(Self::MAX)) as i32)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

/// 播放状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    /// 空闲（尚未开始）
    #[default]
    Idle,
    /// 播放中
    Playing,
    /// 暂停
    Paused,
    /// 已停止（与 Idle 行为一致，但由显式 stop 到达）
    Stopped,
}

impl PlaybackState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackState::Idle => "idle",
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
            PlaybackState::Stopped => "stopped",
        }
    }

    /// 是否存在活动会话
    pub fn is_active(&self) -> bool {
        matches!(self, PlaybackState::Playing | PlaybackState::Paused)
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
