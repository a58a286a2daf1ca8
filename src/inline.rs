//! Splits a line into styled runs.
//!
//! A single alternation is scanned left to right. Each style's content class
//! excludes its own delimiter, so spans never nest: `**__x__**` is one
//! bold-underline run, not bold wrapping underline. Unbalanced markers simply
//! fail to match and stay in the plain text around them.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

static INLINE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = concat!(
        r"\*\*__([^*]+)__\*\*",
        r"|__\*\*([^*]+)\*\*__",
        r"|__([^_]+)__",
        r"|\*\*([^*]+)\*\*",
        r"|\*([^*]+)\*",
        r"|~~([^~]+)~~",
        r"|`([^`]+)`",
    );
    Regex::new(pattern).unwrap_or_else(|e| panic!("bad inline pattern: {e}"))
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    Plain,
    BoldUnderline,
    Underline,
    Bold,
    Italic,
    Strikethrough,
    Code,
}

impl SpanKind {
    /// Capture group order in the alternation.
    const GROUPS: [(usize, SpanKind); 7] = [
        (1, SpanKind::BoldUnderline),
        (2, SpanKind::BoldUnderline),
        (3, SpanKind::Underline),
        (4, SpanKind::Bold),
        (5, SpanKind::Italic),
        (6, SpanKind::Strikethrough),
        (7, SpanKind::Code),
    ];

    pub fn is_bold(self) -> bool {
        matches!(self, SpanKind::Bold | SpanKind::BoldUnderline)
    }

    pub fn is_italic(self) -> bool {
        self == SpanKind::Italic
    }

    pub fn is_underlined(self) -> bool {
        matches!(self, SpanKind::Underline | SpanKind::BoldUnderline)
    }

    pub fn is_struck(self) -> bool {
        self == SpanKind::Strikethrough
    }
}

/// A classified slice of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span<'a> {
    pub kind: SpanKind,
    /// Text with markers removed.
    pub text: &'a str,
    /// Byte range of the span in the source line, markers included.
    pub range: Range<usize>,
}

impl<'a> Span<'a> {
    fn plain(line: &'a str, range: Range<usize>) -> Self {
        Self {
            kind: SpanKind::Plain,
            text: &line[range.clone()],
            range,
        }
    }

    /// The marked-up source text this span was cut from.
    pub fn raw<'l>(&self, line: &'l str) -> &'l str {
        &line[self.range.clone()]
    }
}

/// Segments `line` into plain and styled spans covering it end to end.
/// An empty line yields no spans.
pub fn segment(line: &str) -> Vec<Span<'_>> {
    let mut spans = Vec::new();
    let mut last = 0;

    for caps in INLINE.captures_iter(line) {
        let Some(whole) = caps.get(0) else {
            continue;
        };

        if whole.start() > last {
            spans.push(Span::plain(line, last..whole.start()));
        }

        let styled = SpanKind::GROUPS
            .iter()
            .find_map(|&(group, kind)| caps.get(group).map(|m| (kind, m.as_str())));

        if let Some((kind, text)) = styled {
            spans.push(Span {
                kind,
                text,
                range: whole.range(),
            });
        }

        last = whole.end();
    }

    if last < line.len() {
        spans.push(Span::plain(line, last..line.len()));
    }

    spans
}

/// The line with every recognised marker pair removed.
pub fn strip_markers(line: &str) -> String {
    segment(line).iter().map(|span| span.text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn kinds_and_text(line: &str) -> Vec<(SpanKind, &str)> {
        segment(line).into_iter().map(|s| (s.kind, s.text)).collect()
    }

    #[test]
    fn bold_plain_italic() {
        assert_eq!(
            kinds_and_text("**bold** and *italic*"),
            vec![
                (SpanKind::Bold, "bold"),
                (SpanKind::Plain, " and "),
                (SpanKind::Italic, "italic"),
            ]
        );
    }

    #[test]
    fn bold_underline_is_one_span_in_either_order() {
        assert_eq!(
            kinds_and_text("**__x__**"),
            vec![(SpanKind::BoldUnderline, "x")]
        );
        assert_eq!(
            kinds_and_text("__**x**__"),
            vec![(SpanKind::BoldUnderline, "x")]
        );
    }

    #[test]
    fn every_style_is_recognised() {
        assert_eq!(
            kinds_and_text("__u__~~s~~`c`"),
            vec![
                (SpanKind::Underline, "u"),
                (SpanKind::Strikethrough, "s"),
                (SpanKind::Code, "c"),
            ]
        );
    }

    #[test]
    fn trailing_text_becomes_plain() {
        let spans = segment("`code` tail");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[1].kind, SpanKind::Plain);
        assert_eq!(spans[1].text, " tail");
        assert_eq!(spans[1].range, 6..11);
        assert_eq!(spans[0].raw("`code` tail"), "`code`");
    }

    #[test]
    fn unbalanced_markers_fall_through_as_plain() {
        assert_eq!(
            kinds_and_text("an **unterminated run"),
            vec![(SpanKind::Plain, "an **unterminated run")]
        );
    }

    #[test]
    fn no_markers_is_a_single_plain_span() {
        let line = "just words, 123 😀";
        assert_eq!(kinds_and_text(line), vec![(SpanKind::Plain, line)]);
    }

    #[test]
    fn empty_line_has_no_spans() {
        assert!(segment("").is_empty());
    }

    #[test]
    fn earliest_match_wins_over_later_precedence() {
        // `*a*` starts before `**b**`, so italic is taken first.
        assert_eq!(
            kinds_and_text("*a* **b**"),
            vec![
                (SpanKind::Italic, "a"),
                (SpanKind::Plain, " "),
                (SpanKind::Bold, "b"),
            ]
        );
    }

    #[test]
    fn strip_markers_drops_only_matched_markup() {
        assert_eq!(strip_markers("**a** *b* ~~c~~ `d` 2*3"), "a b c d 2*3");
    }

    proptest! {
        #[test]
        fn raw_spans_reconstruct_the_line(line in "[a-c *_~`]{0,40}") {
            let spans = segment(&line);
            let rebuilt: String = spans.iter().map(|s| s.raw(&line)).collect();
            prop_assert_eq!(rebuilt, line.clone());

            let mut cursor = 0;
            for span in &spans {
                prop_assert_eq!(span.range.start, cursor);
                prop_assert!(span.range.end > span.range.start);
                cursor = span.range.end;
            }
        }

        #[test]
        fn marker_free_lines_are_one_plain_span(line in "[a-z0-9 .,!?]{1,40}") {
            let spans = segment(&line);
            prop_assert_eq!(spans.len(), 1);
            prop_assert_eq!(spans[0].kind, SpanKind::Plain);
            prop_assert_eq!(spans[0].text, line.as_str());
        }

        #[test]
        fn payloads_are_marker_free_for_styled_spans(line in "[a-c *_~`]{0,40}") {
            for span in segment(&line) {
                match span.kind {
                    SpanKind::Bold | SpanKind::Italic => prop_assert!(!span.text.contains('*')),
                    SpanKind::Underline => prop_assert!(!span.text.contains('_')),
                    SpanKind::Strikethrough => prop_assert!(!span.text.contains('~')),
                    SpanKind::Code => prop_assert!(!span.text.contains('`')),
                    _ => {}
                }
            }
        }
    }
}
