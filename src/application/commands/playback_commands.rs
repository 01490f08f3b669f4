//! Playback Commands - 播放相关命令

use crate::domain::playback::{SpeechRate, VoiceId};

/// 开始播放命令
///
/// 文本在开始时被分句，会话期间不会重新读取
#[derive(Debug, Clone)]
pub struct StartPlayback {
    pub text: String,
    pub voice: Option<VoiceId>,
    pub rate: SpeechRate,
}

/// 播放控制命令（由 PlaybackDriver 串行执行）
#[derive(Debug, Clone)]
pub enum PlaybackCommand {
    Start(StartPlayback),
    /// 单按钮播放/暂停：空闲时开始，播放时暂停，暂停时继续
    Toggle(StartPlayback),
    Pause,
    Resume,
    Stop,
    /// 文档被替换或程序退出时使用，空闲时不报错
    StopIfActive,
    Next,
    Previous,
    Status,
}

impl PlaybackCommand {
    pub fn name(&self) -> &'static str {
        match self {
            PlaybackCommand::Start(_) => "start",
            PlaybackCommand::Toggle(_) => "toggle",
            PlaybackCommand::Pause => "pause",
            PlaybackCommand::Resume => "resume",
            PlaybackCommand::Stop => "stop",
            PlaybackCommand::StopIfActive => "stop_if_active",
            PlaybackCommand::Next => "next",
            PlaybackCommand::Previous => "previous",
            PlaybackCommand::Status => "status",
        }
    }
}
