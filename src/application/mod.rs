//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（SpeechEngine、HighlightSink、Repository 等）
//! - playback: 分句播放状态机
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod playback;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // Library commands
    CreateCategory,
    CreateText,
    ExportTextFile,
    ImportTextFile,
    ReorderTexts,
    UpdateText,
    // Playback commands
    PlaybackCommand,
    StartPlayback,
    // Handlers
    handlers::{
        CreateCategoryHandler, CreateTextHandler, ExportTextFileHandler, ImportTextFileHandler,
        ReorderTextsHandler, UpdateTextHandler,
    },
};

pub use error::ApplicationError;

pub use playback::{
    ControlAvailability, EndOfSequence, PlaybackController, PlaybackOptions, PlaybackOutcome,
    PlaybackSnapshot, TickOutcome,
};

pub use ports::{
    // Repositories
    CategoryRecord,
    CategoryRepositoryPort,
    RepositoryError,
    TextRecord,
    TextRepositoryPort,
    // Speech engine
    EngineError,
    SpeechEnginePort,
    // Highlight & observer
    HighlightSinkPort,
    PlaybackObserverPort,
    StatusLevel,
    StatusMessage,
    // Text files
    TextFileError,
    TextFilePort,
};

pub use queries::{
    GetText,
    ListCategories,
    ListTextFiles,
    ListTexts,
    // Handlers
    handlers::{
        CategoryResponse, GetTextHandler, ListCategoriesHandler, ListTextFilesHandler,
        ListTextsHandler, TextResponse,
    },
};
