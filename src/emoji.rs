use std::sync::LazyLock;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

static EMOJI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\p{Emoji}").unwrap_or_else(|e| panic!("bad emoji pattern: {e}"))
});
static DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]").unwrap_or_else(|e| panic!("bad digit pattern: {e}")));

/// Whether a grapheme should be drawn with the emoji face.
///
/// ASCII digits, and keycap sequences built on them, carry the Unicode
/// `Emoji` property but must stay in the text face.
pub fn is_emoji(grapheme: &str) -> bool {
    EMOJI.is_match(grapheme) && !DIGIT.is_match(grapheme)
}

/// Extended grapheme clusters, so ZWJ sequences and flags stay whole.
pub fn graphemes(text: &str) -> impl Iterator<Item = &str> {
    text.graphemes(true)
}
