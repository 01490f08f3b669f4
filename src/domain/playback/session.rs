//! Playback Context - Session
//!
//! 一次播放会话：分句结果 + 当前游标

use crate::domain::text_segmenter::{segment, SentenceSequence, SentenceUnit, TextSpan};

/// 播放会话
///
/// 不变量:
/// - sequence 至少包含一个单元，创建后不可变
/// - 0 <= cursor <= sequence.len()（cursor == len 表示已读完）
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    sequence: SentenceSequence,
    cursor: usize,
    source_len: usize,
}

impl PlaybackSession {
    /// 对文本分句并创建会话，没有可朗读的单元时返回 None
    pub fn from_text(text: &str) -> Option<Self> {
        let sequence = segment(text);
        if sequence.is_empty() {
            return None;
        }
        Some(Self {
            sequence,
            cursor: 0,
            source_len: text.chars().count(),
        })
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn unit(&self, index: usize) -> Option<&SentenceUnit> {
        self.sequence.get(index)
    }

    pub fn current(&self) -> Option<&SentenceUnit> {
        self.sequence.get(self.cursor)
    }

    pub fn has_previous(&self) -> bool {
        self.cursor > 0
    }

    pub fn has_next(&self) -> bool {
        self.cursor + 1 < self.sequence.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.sequence.len()
    }

    /// 覆盖整篇原文的区间（用于清除高亮）
    pub fn full_span(&self) -> TextSpan {
        TextSpan::new(0, self.source_len)
    }

    /// 设置游标，超出 len 的值被截断到 len
    pub fn move_to(&mut self, index: usize) {
        self.cursor = index.min(self.sequence.len());
    }

    pub fn park_at_end(&mut self) {
        self.cursor = self.sequence.len();
    }
}
