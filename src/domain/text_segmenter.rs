//! 文本分割器
//!
//! 按固定标点集合把文本切成句子单元，并记录每个单元在原文中的字符区间

use serde::Serialize;

/// 分隔符集合（逗号、冒号、分号也会切分，播放粒度更细）
pub const SENTENCE_DELIMITERS: [char; 6] = ['.', '!', '?', ',', ':', ';'];

/// 检查是否为句子分隔符
#[inline]
pub fn is_delimiter(ch: char) -> bool {
    SENTENCE_DELIMITERS.contains(&ch)
}

/// 原文中的字符区间 `[start, end)`（按 Unicode 字符计数，不是字节）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
}

impl TextSpan {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start must not exceed end");
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// 句子单元 - 最小朗读/高亮单位
///
/// 不变量:
/// - text 已去除首尾空白且不为空
/// - span 指向原文中对应的字符区间
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentenceUnit {
    text: String,
    span: TextSpan,
}

impl SentenceUnit {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn span(&self) -> TextSpan {
        self.span
    }
}

/// 有序句子序列，一次播放会话内不可变
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SentenceSequence(Vec<SentenceUnit>);

impl SentenceSequence {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SentenceUnit> {
        self.0.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SentenceUnit> {
        self.0.iter()
    }
}

/// 对文本进行分句
///
/// 分句策略:
/// 1. 从左到右扫描，遇到分隔符即结束当前单元（分隔符归属当前单元）
/// 2. 单元文本去除首尾空白，区间起点跳过前导空白
/// 3. 只剩空白或只剩分隔符的单元连同区间一起丢弃
/// 4. 末尾没有分隔符的剩余内容单独成为最后一个单元，区间终点为原文长度
pub fn segment(text: &str) -> SentenceSequence {
    let mut units = Vec::new();
    let mut buffer = String::new();
    let mut unit_start = 0;
    let mut char_len = 0;

    for (i, ch) in text.chars().enumerate() {
        buffer.push(ch);
        char_len = i + 1;

        if is_delimiter(ch) {
            push_unit(&mut units, &buffer, unit_start, i + 1);
            buffer.clear();
            unit_start = i + 1;
        }
    }

    // 剩余内容
    push_unit(&mut units, &buffer, unit_start, char_len);

    SentenceSequence(units)
}

fn push_unit(units: &mut Vec<SentenceUnit>, buffer: &str, start: usize, end: usize) {
    let trimmed = buffer.trim();
    // 空白或 "..." 之类的分隔符残片
    if trimmed.chars().all(is_delimiter) {
        return;
    }

    let leading = buffer.chars().take_while(|c| c.is_whitespace()).count();
    units.push(SentenceUnit {
        text: trimmed.to_string(),
        span: TextSpan::new(start + leading, end),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(sequence: &SentenceSequence) -> Vec<&str> {
        sequence.iter().map(|u| u.text()).collect()
    }

    fn spans(sequence: &SentenceSequence) -> Vec<(usize, usize)> {
        sequence
            .iter()
            .map(|u| (u.span().start, u.span().end))
            .collect()
    }

    #[test]
    fn test_two_sentences_with_spans() {
        let sequence = segment("Hello. World!");
        assert_eq!(texts(&sequence), vec!["Hello.", "World!"]);
        assert_eq!(spans(&sequence), vec![(0, 6), (7, 13)]);
    }

    #[test]
    fn test_weak_delimiters_split() {
        let sequence = segment("A,B;C");
        assert_eq!(texts(&sequence), vec!["A,", "B;", "C"]);
        assert_eq!(spans(&sequence), vec![(0, 2), (2, 4), (4, 5)]);
    }

    #[test]
    fn test_every_delimiter_closes_a_unit() {
        for ch in SENTENCE_DELIMITERS {
            assert!(is_delimiter(ch));
            let text = format!("a{ch}b");
            assert_eq!(segment(&text).len(), 2, "delimiter {ch:?}");
        }
        assert!(!is_delimiter('-'));
        assert_eq!(segment("a-b").len(), 1);
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert!(segment("").is_empty());
        assert!(segment("   \n\t ").is_empty());
    }

    #[test]
    fn test_no_delimiter_single_unit() {
        let sequence = segment("  just words  ");
        assert_eq!(texts(&sequence), vec!["just words"]);
        // 末尾无分隔符时区间终点为原文长度
        assert_eq!(spans(&sequence), vec![(2, 14)]);
    }

    #[test]
    fn test_delimiter_runs_dropped() {
        let sequence = segment("Wait... what?! ,;");
        assert_eq!(texts(&sequence), vec!["Wait.", "what?"]);
        assert_eq!(spans(&sequence), vec![(0, 5), (8, 13)]);
    }

    #[test]
    fn test_offsets_count_chars_not_bytes() {
        let sequence = segment("Привет, мир. Ещё");
        assert_eq!(texts(&sequence), vec!["Привет,", "мир.", "Ещё"]);
        assert_eq!(spans(&sequence), vec![(0, 7), (8, 12), (13, 16)]);
    }

    #[test]
    fn test_newlines_are_whitespace() {
        let sequence = segment("First line.\nSecond line:\n\n third");
        assert_eq!(texts(&sequence), vec!["First line.", "Second line:", "third"]);
        assert_eq!(spans(&sequence)[1], (12, 24));
    }

    #[test]
    fn test_units_match_source_slices() {
        let samples = [
            "One. Two. Three.",
            "  leading, and trailing  ",
            "a.b.c",
            "?!.,:;",
            "Mixed; punctuation: here! and there? done.",
            "Tabs\tand\nnewlines. end",
        ];

        for sample in samples {
            let chars: Vec<char> = sample.chars().collect();
            let sequence = segment(sample);

            let mut previous_end = 0;
            for unit in sequence.iter() {
                let span = unit.span();
                assert!(span.start >= previous_end, "spans overlap in {sample:?}");
                assert!(!span.is_empty());
                let slice: String = chars[span.start..span.end].iter().collect();
                assert_eq!(slice.trim(), unit.text(), "slice mismatch in {sample:?}");
                previous_end = span.end;
            }

            // 单元数等于分隔符之间非空片段的数量
            let expected = sample
                .split(is_delimiter)
                .filter(|piece| !piece.trim().is_empty())
                .count();
            assert_eq!(sequence.len(), expected, "unit count mismatch in {sample:?}");
        }
    }
}
