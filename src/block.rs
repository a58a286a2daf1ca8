use std::sync::LazyLock;

use regex::Regex;

static HEADING: LazyLock<Regex> = LazyLock::new(|| compile(r"^(#{1,6})\s"));
static RULE: LazyLock<Regex> = LazyLock::new(|| compile(r"^-{3,}"));
static LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| compile(r"^(?:- |[0-9]+\.)"));
static QUOTE_MARKER: LazyLock<Regex> = LazyLock::new(|| compile(r"^>\s*"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("bad pattern {pattern}: {e}"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Ordered,
    Unordered,
}

/// One line of the document, classified by its leading markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block<'a> {
    Heading { level: u8, text: &'a str },
    Blockquote { text: &'a str },
    Rule,
    ListItem {
        kind: ListKind,
        marker: &'a str,
        text: &'a str,
    },
    Paragraph { text: &'a str },
}

/// Fieldless tag for a [`Block`], handy for layout reports and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Heading(u8),
    Blockquote,
    Rule,
    ListItem(ListKind),
    Paragraph,
}

impl Block<'_> {
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Heading { level, .. } => BlockKind::Heading(*level),
            Block::Blockquote { .. } => BlockKind::Blockquote,
            Block::Rule => BlockKind::Rule,
            Block::ListItem { kind, .. } => BlockKind::ListItem(*kind),
            Block::Paragraph { .. } => BlockKind::Paragraph,
        }
    }
}

/// Classifies an already trimmed line. First match wins:
/// heading, blockquote, rule, list item, then paragraph.
pub fn classify(line: &str) -> Block<'_> {
    if let Some(caps) = HEADING.captures(line) {
        let hashes = caps.get(1).map_or(0, |m| m.len());
        let full = caps.get(0).map_or(0, |m| m.end());
        return Block::Heading {
            level: hashes as u8,
            text: &line[full..],
        };
    }

    if let Some(m) = QUOTE_MARKER.find(line) {
        return Block::Blockquote {
            text: &line[m.end()..],
        };
    }

    if RULE.is_match(line) {
        return Block::Rule;
    }

    if let Some(m) = LIST_MARKER.find(line) {
        let marker = m.as_str();
        let kind = if marker.starts_with('-') {
            ListKind::Unordered
        } else {
            ListKind::Ordered
        };
        return Block::ListItem {
            kind,
            marker,
            text: &line[m.end()..],
        };
    }

    Block::Paragraph { text: line }
}

/// Splits a document on `\n` and trims every line. Empty lines are kept since
/// they still take vertical space.
pub fn lines(document: &str) -> impl Iterator<Item = &str> {
    document.split('\n').map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn heading_levels_one_through_six() {
        assert_eq!(
            classify("# Hello"),
            Block::Heading {
                level: 1,
                text: "Hello"
            }
        );
        assert_eq!(
            classify("###### tiny"),
            Block::Heading {
                level: 6,
                text: "tiny"
            }
        );
    }

    #[test]
    fn seven_hashes_or_no_space_is_a_paragraph() {
        assert_eq!(classify("####### x").kind(), BlockKind::Paragraph);
        assert_eq!(classify("#tag").kind(), BlockKind::Paragraph);
    }

    #[test]
    fn blockquote_strips_marker_and_spacing() {
        assert_eq!(classify(">   quoted"), Block::Blockquote { text: "quoted" });
        assert_eq!(classify(">"), Block::Blockquote { text: "" });
    }

    #[test]
    fn rule_beats_list_marker() {
        assert_eq!(classify("---"), Block::Rule);
        assert_eq!(classify("-----x"), Block::Rule);
        assert_eq!(classify("-- x").kind(), BlockKind::Paragraph);
    }

    #[test]
    fn list_items_keep_their_marker() {
        assert_eq!(
            classify("- item"),
            Block::ListItem {
                kind: ListKind::Unordered,
                marker: "- ",
                text: "item"
            }
        );
        assert_eq!(
            classify("12. twelfth"),
            Block::ListItem {
                kind: ListKind::Ordered,
                marker: "12.",
                text: " twelfth"
            }
        );
    }

    #[test]
    fn non_ascii_digits_do_not_start_an_ordered_item() {
        assert_eq!(classify("١. item").kind(), BlockKind::Paragraph);
        assert_eq!(classify("５. wide").kind(), BlockKind::Paragraph);
        assert_eq!(
            classify("7. ascii").kind(),
            BlockKind::ListItem(ListKind::Ordered)
        );
    }

    #[test]
    fn lines_are_trimmed_and_empty_lines_survive() {
        let collected: Vec<_> = lines("  # A  \n\n  text\r").collect();
        assert_eq!(collected, vec!["# A", "", "text"]);
    }

    proptest! {
        #[test]
        fn classification_is_total(line in "[#>\\-0-9. a-z*]{0,24}") {
            let trimmed = line.trim();
            let kind = classify(trimmed).kind();
            let is_known = matches!(
                kind,
                BlockKind::Heading(1..=6)
                    | BlockKind::Blockquote
                    | BlockKind::Rule
                    | BlockKind::ListItem(_)
                    | BlockKind::Paragraph
            );
            prop_assert!(is_known);
        }
    }
}
