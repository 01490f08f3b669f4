//! Application State
//!
//! 包含所有 Command/Query Handlers 以及播放驱动的客户端

use std::sync::Arc;

use crate::application::{
    // Command handlers
    CreateCategoryHandler, CreateTextHandler, ExportTextFileHandler, ImportTextFileHandler,
    ReorderTextsHandler, UpdateTextHandler,
    // Query handlers
    GetTextHandler, ListCategoriesHandler, ListTextFilesHandler, ListTextsHandler,
    // Ports
    CategoryRepositoryPort, TextFilePort, TextRepositoryPort,
};
use crate::domain::playback::VoiceId;
use crate::infrastructure::events::EventPublisher;
use crate::infrastructure::worker::PlaybackHandle;

/// 应用状态
pub struct AppState {
    // ========== Playback ==========
    pub playback: PlaybackHandle,
    pub event_publisher: Arc<EventPublisher>,
    /// 请求未指定音色时使用
    pub default_voice: Option<VoiceId>,

    // ========== Command Handlers ==========
    pub create_category_handler: CreateCategoryHandler,
    pub create_text_handler: CreateTextHandler,
    pub update_text_handler: UpdateTextHandler,
    pub reorder_texts_handler: ReorderTextsHandler,
    pub import_file_handler: ImportTextFileHandler,
    pub export_file_handler: ExportTextFileHandler,

    // ========== Query Handlers ==========
    pub list_categories_handler: ListCategoriesHandler,
    pub list_texts_handler: ListTextsHandler,
    pub get_text_handler: GetTextHandler,
    pub list_files_handler: ListTextFilesHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        category_repo: Arc<dyn CategoryRepositoryPort>,
        text_repo: Arc<dyn TextRepositoryPort>,
        text_files: Arc<dyn TextFilePort>,
        playback: PlaybackHandle,
        event_publisher: Arc<EventPublisher>,
        default_voice: Option<VoiceId>,
    ) -> Self {
        Self {
            playback,
            event_publisher,
            default_voice,

            // Command handlers
            create_category_handler: CreateCategoryHandler::new(category_repo.clone()),
            create_text_handler: CreateTextHandler::new(category_repo.clone(), text_repo.clone()),
            update_text_handler: UpdateTextHandler::new(text_repo.clone()),
            reorder_texts_handler: ReorderTextsHandler::new(text_repo.clone()),
            import_file_handler: ImportTextFileHandler::new(text_files.clone()),
            export_file_handler: ExportTextFileHandler::new(text_files.clone()),

            // Query handlers
            list_categories_handler: ListCategoriesHandler::new(category_repo),
            list_texts_handler: ListTextsHandler::new(text_repo.clone()),
            get_text_handler: GetTextHandler::new(text_repo),
            list_files_handler: ListTextFilesHandler::new(text_files),
        }
    }
}
