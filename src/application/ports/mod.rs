//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod highlight_sink;
mod playback_observer;
mod repositories;
mod speech_engine;
mod text_files;

pub use highlight_sink::HighlightSinkPort;
pub use playback_observer::{PlaybackObserverPort, StatusLevel, StatusMessage};
pub use repositories::{
    CategoryRecord, CategoryRepositoryPort, RepositoryError, TextRecord, TextRepositoryPort,
};
pub use speech_engine::{EngineError, SpeechEnginePort};
pub use text_files::{TextFileError, TextFilePort};
