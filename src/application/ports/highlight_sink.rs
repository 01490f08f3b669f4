//! Highlight Sink Port - 高亮通知
//!
//! 核心逻辑只发出区间，由外壳负责渲染

use crate::domain::TextSpan;

/// Highlight Sink Port
///
/// `active = true` 表示高亮该区间并替换之前的高亮；
/// `active = false` 表示清除该区间内的高亮
pub trait HighlightSinkPort: Send + Sync {
    fn highlight(&self, span: TextSpan, active: bool);
}
