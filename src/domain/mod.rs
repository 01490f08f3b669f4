//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Playback Context: 分句播放会话
//! - Library Context: 分类与文本管理

pub mod library;
pub mod playback;

// 共享的文本分割器
mod text_segmenter;

pub use text_segmenter::{
    is_delimiter, segment, SentenceSequence, SentenceUnit, TextSpan, SENTENCE_DELIMITERS,
};
