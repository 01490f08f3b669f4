//! Speech Engine Port - 语音引擎抽象
//!
//! 引擎只提供轮询式的完成状态：speak 立即返回，是否读完通过 is_speaking 轮询

use thiserror::Error;

use crate::domain::playback::{SpeechRate, VoiceId};

/// 引擎错误
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Engine unavailable: {0}")]
    Unavailable(String),

    #[error("Configuration failed: {0}")]
    Configuration(String),

    #[error("Speak failed: {0}")]
    Speak(String),

    #[error("Cancel failed: {0}")]
    Cancel(String),

    #[error("Status query failed: {0}")]
    Status(String),
}

/// Speech Engine Port
///
/// 所有方法都不能阻塞调用方
pub trait SpeechEnginePort: Send + Sync {
    /// 设置音色和语速
    fn configure(&self, voice: &VoiceId, rate: SpeechRate) -> Result<(), EngineError>;

    /// 异步朗读文本，立即返回，没有完成回调
    fn speak(&self, text: &str) -> Result<(), EngineError>;

    /// 中断当前朗读，空闲时调用也必须成功
    fn cancel(&self) -> Result<(), EngineError>;

    /// 当前是否仍在朗读
    fn is_speaking(&self) -> Result<bool, EngineError>;

    /// 引擎名称（用于日志）
    fn name(&self) -> &str {
        "speech-engine"
    }
}
