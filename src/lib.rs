//! Render a compact subset of Markdown onto a fixed-size PNG card.
//!
//! Supported: `#`–`######` headings, `>` quotes, `---` rules, `-` and `1.`
//! list items, and inline `**bold**`, `*italic*`, `__underline__`,
//! `~~strike~~`, `` `code` `` plus the `**__both__**` combination. Emoji are
//! drawn through a registered fallback face. Lines are never wrapped.
//!
//! ```no_run
//! let png = mdcard::render_markdown("# Hello\n**bold** and *italic*")?;
//! std::fs::write("card.png", png)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod block;
pub mod color;
pub mod emoji;
pub mod error;
pub mod fonts;
pub mod inline;
pub mod renderer;
pub mod surface;
pub mod theme;
pub mod validate;

pub use color::Color;
pub use error::{RenderError, Result, ValidationError};
pub use renderer::{LayoutReport, Renderer};
pub use surface::{RecordingSurface, Surface, SvgSurface};
pub use theme::Theme;

use fonts::CosmicTextMeasure;

/// Renders markdown with the default theme into PNG bytes.
pub fn render_markdown(markdown: &str) -> Result<Vec<u8>> {
    render_markdown_with(markdown, &Theme::default())
}

/// Renders markdown with `theme` into PNG bytes.
pub fn render_markdown_with(markdown: &str, theme: &Theme) -> Result<Vec<u8>> {
    let text = validate::validate_with_limit(markdown, theme.max_input_len)?;
    rasterize(&text, theme)
}

/// Like [`render_markdown_with`], for input that may not be UTF-8 text.
pub fn render_markdown_bytes(markdown: &[u8], theme: &Theme) -> Result<Vec<u8>> {
    let text = validate::validate_bytes(markdown, theme.max_input_len)?;
    rasterize(&text, theme)
}

/// Validates and lays out markdown onto a caller-supplied surface without
/// encoding it.
pub fn layout_markdown<S: Surface>(
    markdown: &str,
    theme: &Theme,
    surface: &mut S,
) -> Result<LayoutReport> {
    let text = validate::validate_with_limit(markdown, theme.max_input_len)?;
    Ok(Renderer::new(theme, surface).render_document(&text))
}

fn rasterize(text: &str, theme: &Theme) -> Result<Vec<u8>> {
    let emoji_family = fonts::ensure_emoji_font(theme);
    let measure = CosmicTextMeasure::new(emoji_family.clone());
    let mut surface = SvgSurface::new(theme.width, theme.height, emoji_family, measure);

    Renderer::new(theme, &mut surface).render_document(text);
    surface.encode_png()
}
