//! Playback Context - 播放限界上下文
//!
//! 职责:
//! - 播放会话（分句序列 + 游标）
//! - 播放状态、音色、语速等值对象

mod session;
mod value_objects;

pub use session::PlaybackSession;
pub use value_objects::{PlaybackState, SpeechRate, VoiceId};
