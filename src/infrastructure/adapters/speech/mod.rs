//! Speech Adapter - 语音引擎实现

mod fake_engine;
mod process_engine;

use std::sync::Arc;
use std::time::Duration;

pub use fake_engine::{EngineCall, FakeFailure, FakeSpeechEngine};
pub use process_engine::ProcessSpeechEngine;

use crate::application::ports::SpeechEnginePort;
use crate::config::{SpeechConfig, SpeechEngineKind};

/// 按配置创建语音引擎
pub fn create_engine(config: &SpeechConfig) -> Arc<dyn SpeechEnginePort> {
    tracing::info!(engine = config.engine.as_str(), "Creating speech engine");
    let engine: Arc<dyn SpeechEnginePort> = match config.engine {
        SpeechEngineKind::Process => Arc::new(ProcessSpeechEngine::new(config.clone())),
        SpeechEngineKind::Fake => Arc::new(FakeSpeechEngine::timed(Duration::from_millis(
            config.fake_per_char_ms,
        ))),
    };
    tracing::info!(engine = engine.name(), "Speech engine initialized");
    engine
}
