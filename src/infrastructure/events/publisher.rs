//! Event Publisher Implementation
//!
//! 播放事件广播，同时充当控制器的高亮接收端和状态观察者

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::application::ports::{
    HighlightSinkPort, PlaybackObserverPort, StatusLevel, StatusMessage,
};
use crate::application::PlaybackSnapshot;
use crate::domain::TextSpan;

const CHANNEL_CAPACITY: usize = 100;

/// WebSocket 事件类型
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum PlaybackEvent {
    /// 高亮区间变化（active = false 表示清除）
    Highlight {
        start: usize,
        end: usize,
        active: bool,
    },
    /// 播放状态变化
    StateChanged { snapshot: PlaybackSnapshot },
    /// 状态栏消息
    Status {
        level: StatusLevel,
        message: String,
        timeout_ms: u64,
    },
}

/// 事件发布器
pub struct EventPublisher {
    channel: broadcast::Sender<PlaybackEvent>,
}

impl EventPublisher {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { channel: tx }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 订阅播放事件
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.channel.subscribe()
    }

    fn publish(&self, event: PlaybackEvent) {
        if let Err(e) = self.channel.send(event) {
            tracing::trace!(error = %e, "Playback event dropped (no receivers)");
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl HighlightSinkPort for EventPublisher {
    fn highlight(&self, span: TextSpan, active: bool) {
        self.publish(PlaybackEvent::Highlight {
            start: span.start,
            end: span.end,
            active,
        });
    }
}

impl PlaybackObserverPort for EventPublisher {
    fn state_changed(&self, snapshot: &PlaybackSnapshot) {
        self.publish(PlaybackEvent::StateChanged {
            snapshot: snapshot.clone(),
        });
    }

    fn status(&self, message: StatusMessage) {
        match message.level {
            StatusLevel::Error => tracing::error!(message = %message.text, "Status"),
            StatusLevel::Warning => tracing::warn!(message = %message.text, "Status"),
            StatusLevel::Info => tracing::info!(message = %message.text, "Status"),
        }
        self.publish(PlaybackEvent::Status {
            level: message.level,
            message: message.text,
            timeout_ms: message.timeout.as_millis() as u64,
        });
    }
}
