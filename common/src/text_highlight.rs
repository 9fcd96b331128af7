//! Utilities for highlighting text spans in search results.
//!
//! The backend reports highlighted positions as byte offsets into the UTF-8
//! encoding of a snippet, not as character indices. [`highlight_spans`] walks
//! those offsets and hands back owned spans ready for display.

use std::{fmt, ops::Range};

use serde::{Deserialize, Serialize};

/// Half-open byte interval `[start, end)` inside a snippet's UTF-8 text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Range<usize>> for ByteRange {
    fn from(range: Range<usize>) -> Self {
        Self { start: range.start, end: range.end }
    }
}

/// Backend-produced excerpt plus the byte ranges to highlight in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub fragments: String,
    pub highlighted_positions: Vec<ByteRange>,
}

impl Snippet {
    /// Builds a snippet, merging ranges that touch (`1..2` and `2..3` become `1..3`).
    pub fn new(fragments: impl Into<String>, highlighted_positions: impl IntoIterator<Item = ByteRange>) -> Self {
        let mut merged: Vec<ByteRange> = Vec::new();
        for range in highlighted_positions {
            match merged.last_mut() {
                Some(last) if last.end == range.start => last.end = range.end,
                _ => merged.push(range),
            }
        }
        Self { fragments: fragments.into(), highlighted_positions: merged }
    }

    pub fn plain(fragments: impl Into<String>) -> Self {
        Self { fragments: fragments.into(), highlighted_positions: vec![] }
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn highlight_spans(&self) -> HighlightSpans<'_> {
        highlight_spans(&self.fragments, &self.highlighted_positions)
    }

    /// Collects every span, failing on the first range that splits a character.
    pub fn try_highlight_spans(&self) -> Result<Vec<HighlightTextSpan>, HighlightBoundaryError> {
        self.highlight_spans().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightTextSpan {
    pub text: String,
    pub is_highlighted: bool,
    /// Running number of highlighted spans; always 0 for plain spans.
    pub index: u64,
}

/// A highlight range does not sit on UTF-8 character boundaries.
///
/// This is a broken backend contract. It is reported instead of being papered
/// over with replacement characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightBoundaryError {
    pub range: ByteRange,
    pub offset: usize,
}

impl fmt::Display for HighlightBoundaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Highlight range {}..{} splits a UTF-8 character at byte {}",
            self.range.start, self.range.end, self.offset
        )
    }
}

impl std::error::Error for HighlightBoundaryError {}

/// Splits `text` into plain and highlighted spans according to `ranges`.
///
/// `ranges` are expected ascending and non-overlapping. Empty ranges are
/// skipped, offsets past the end of the text are clamped, and a range that
/// reaches back before the previous one is trimmed so the cursor never moves
/// backwards. Concatenating the yielded texts always gives back `text`.
///
/// The iterator is lazy and stops after yielding a [`HighlightBoundaryError`].
pub fn highlight_spans<'a>(text: &'a str, ranges: &'a [ByteRange]) -> HighlightSpans<'a> {
    HighlightSpans {
        text,
        ranges: ranges.iter(),
        pos: 0,
        pending_highlight: None,
        next_index: 0,
        done: false,
    }
}

pub struct HighlightSpans<'a> {
    text: &'a str,
    ranges: std::slice::Iter<'a, ByteRange>,
    pos: usize,
    pending_highlight: Option<(usize, usize)>,
    next_index: u64,
    done: bool,
}

impl HighlightSpans<'_> {
    fn plain(&self, start: usize, end: usize) -> HighlightTextSpan {
        HighlightTextSpan { text: self.text[start..end].to_string(), is_highlighted: false, index: 0 }
    }

    fn highlighted(&mut self, start: usize, end: usize) -> HighlightTextSpan {
        let index = self.next_index;
        self.next_index += 1;
        HighlightTextSpan { text: self.text[start..end].to_string(), is_highlighted: true, index }
    }
}

impl Iterator for HighlightSpans<'_> {
    type Item = Result<HighlightTextSpan, HighlightBoundaryError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if let Some((start, end)) = self.pending_highlight.take() {
            return Some(Ok(self.highlighted(start, end)));
        }

        let len = self.text.len();
        while let Some(range) = self.ranges.next() {
            if range.is_empty() {
                continue;
            }
            let start = range.start.clamp(self.pos, len);
            let end = range.end.clamp(start, len);
            if start == end {
                continue;
            }
            for offset in [start, end] {
                if !self.text.is_char_boundary(offset) {
                    self.done = true;
                    return Some(Err(HighlightBoundaryError { range: *range, offset }));
                }
            }

            let pos = std::mem::replace(&mut self.pos, end);
            if pos < start {
                self.pending_highlight = Some((start, end));
                return Some(Ok(self.plain(pos, start)));
            }
            return Some(Ok(self.highlighted(start, end)));
        }

        self.done = true;
        if self.pos < len {
            let pos = std::mem::replace(&mut self.pos, len);
            return Some(Ok(self.plain(pos, len)));
        }
        None
    }
}

impl std::iter::FusedIterator for HighlightSpans<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(text: &str, ranges: &[ByteRange]) -> Vec<(bool, String)> {
        highlight_spans(text, ranges)
            .map(|span| span.map(|s| (s.is_highlighted, s.text)))
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn highlights_prefix() {
        let got = spans("hello world", &[ByteRange::new(0, 5)]);
        assert_eq!(got, vec![(true, "hello".to_string()), (false, " world".to_string())]);
    }

    #[test]
    fn multibyte_prefix_with_ascii_range() {
        let text = "日本語test";
        // three 3-byte characters, then "test"
        let got = spans(text, &[ByteRange::new(9, 13)]);
        assert_eq!(got, vec![(false, "日本語".to_string()), (true, "test".to_string())]);
    }

    #[test]
    fn highlights_multibyte_characters_on_boundaries() {
        let got = spans("日本語test", &[ByteRange::new(3, 6)]);
        assert_eq!(
            got,
            vec![(false, "日".to_string()), (true, "本".to_string()), (false, "語test".to_string())]
        );
    }

    #[test]
    fn concatenation_reconstructs_text() {
        let text = "Rust 编程 language with ünïcödé";
        let ranges = [ByteRange::new(0, 4), ByteRange::new(5, 11), ByteRange::new(12, 20), ByteRange::new(26, 31)];
        let joined: String = spans(text, &ranges).into_iter().map(|(_, t)| t).collect();
        assert_eq!(joined, text);
    }

    #[test]
    fn zero_length_ranges_are_skipped() {
        let got = spans("abcdef", &[ByteRange::new(2, 2), ByteRange::new(4, 4)]);
        assert_eq!(got, vec![(false, "abcdef".to_string())]);

        let got = spans("abcdef", &[ByteRange::new(0, 0), ByteRange::new(1, 3), ByteRange::new(3, 3)]);
        assert_eq!(
            got,
            vec![(false, "a".to_string()), (true, "bc".to_string()), (false, "def".to_string())]
        );
    }

    #[test]
    fn out_of_range_offsets_are_clamped() {
        let got = spans("abc", &[ByteRange::new(1, 40)]);
        assert_eq!(got, vec![(false, "a".to_string()), (true, "bc".to_string())]);

        let got = spans("abc", &[ByteRange::new(10, 20)]);
        assert_eq!(got, vec![(false, "abc".to_string())]);
    }

    #[test]
    fn overlapping_ranges_never_repeat_text() {
        let got = spans("abcdef", &[ByteRange::new(0, 3), ByteRange::new(2, 5)]);
        assert_eq!(
            got,
            vec![(true, "abc".to_string()), (true, "de".to_string()), (false, "f".to_string())]
        );
    }

    #[test]
    fn highlighted_spans_are_numbered() {
        let items = highlight_spans("a b c", &[ByteRange::new(0, 1), ByteRange::new(4, 5)])
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        let indices: Vec<_> = items.iter().filter(|s| s.is_highlighted).map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1]);
        assert!(items.iter().filter(|s| !s.is_highlighted).all(|s| s.index == 0));
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(spans("", &[]).is_empty());
        assert!(spans("", &[ByteRange::new(0, 3)]).is_empty());
    }

    #[test]
    fn split_character_is_reported() {
        let ranges = [ByteRange::new(1, 3)];
        let mut iter = highlight_spans("日本語", &ranges);
        let err = iter.next().unwrap().unwrap_err();
        assert_eq!(err, HighlightBoundaryError { range: ByteRange::new(1, 3), offset: 1 });
        assert!(iter.next().is_none());

        let snippet = Snippet { fragments: "日本語".to_string(), highlighted_positions: vec![ByteRange::new(3, 7)] };
        let err = snippet.try_highlight_spans().unwrap_err();
        assert_eq!(err.offset, 7);
    }

    #[test]
    fn snippet_new_merges_touching_ranges() {
        let snippet = Snippet::new("abcdefgh", [ByteRange::new(1, 2), ByteRange::new(2, 3), ByteRange::new(5, 6), ByteRange::new(6, 8)]);
        assert_eq!(snippet.highlighted_positions, vec![ByteRange::new(1, 3), ByteRange::new(5, 8)]);
    }

    #[test]
    fn snippet_json_shape() {
        let json = r#"{"fragments":"hello world","highlightedPositions":[{"start":0,"end":5}]}"#;
        let snippet: Snippet = serde_json::from_str(json).unwrap();
        assert_eq!(snippet, Snippet::new("hello world", [ByteRange::from(0..5)]));
    }
}
