//! Lector - 分句朗读播放器
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Library Context: 分类和文本管理上下文
//! - Playback Context: 播放会话、音色、语速
//! - Text Segmenter: 句子切分
//!
//! 应用层 (application/):
//! - Ports: 端口定义（SpeechEngine, HighlightSink, Repositories, TextFiles）
//! - Playback: 播放状态机（逐句朗读、轮询引擎）
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RPC API + WebSocket
//! - Worker: PlaybackDriver 单任务驱动播放状态机
//! - Persistence: SQLite 存储（损坏时隔离并重建）
//! - Adapters: 语音引擎、TXT 文件存储
//! - Events: WebSocket 事件发布

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
