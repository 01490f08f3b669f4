//! Playback types - 控制器的配置、快照与返回值

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::playback::PlaybackState;
use crate::domain::SentenceUnit;

/// 读完最后一句后的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndOfSequence {
    /// 执行 stop：清除高亮、销毁会话
    #[default]
    Stop,
    /// 保留会话并停在末尾（暂停状态），resume 时从第一句重新开始
    Hold,
}

/// 控制器选项
#[derive(Debug, Clone)]
pub struct PlaybackOptions {
    pub on_exhausted: EndOfSequence,
    /// 状态栏消息显示时长
    pub status_timeout: Duration,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            on_exhausted: EndOfSequence::Stop,
            status_timeout: Duration::from_millis(5000),
        }
    }
}

/// 控制按钮可用性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ControlAvailability {
    pub can_stop: bool,
    pub can_previous: bool,
    pub can_next: bool,
}

/// 播放状态快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaybackSnapshot {
    pub state: PlaybackState,
    pub cursor: usize,
    pub total: usize,
    pub current: Option<SentenceUnit>,
    pub controls: ControlAvailability,
}

/// 命令执行结果
///
/// `changed = false` 表示命令被边界条件拦下（例如在第一句上执行 previous）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaybackOutcome {
    pub changed: bool,
    pub snapshot: PlaybackSnapshot,
}

/// 一次 tick 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// 未在播放或未开启轮询
    Inactive,
    /// 引擎仍在朗读
    Speaking,
    /// 前进到下一句
    Advanced { cursor: usize },
    /// 重读被中断的当前句
    Replayed { cursor: usize },
    /// 全部读完
    Finished,
}
