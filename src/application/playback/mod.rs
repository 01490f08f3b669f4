//! Playback - 分句播放控制
//!
//! PlaybackController 是同步状态机，由 PlaybackDriver 串行驱动

mod controller;
mod types;

pub use controller::PlaybackController;
pub use types::{
    ControlAvailability, EndOfSequence, PlaybackOptions, PlaybackOutcome, PlaybackSnapshot,
    TickOutcome,
};
