use tracing::debug;

use crate::block::{self, Block, BlockKind};
use crate::color::Color;
use crate::emoji::graphemes;
use crate::fonts::Font;
use crate::inline::{SpanKind, segment};
use crate::surface::Surface;
use crate::theme::Theme;

const HEADING_BASE_SIZE: f32 = 32.0;
const HEADING_STEP: f32 = 4.0;
const HEADING_DIVIDER_GAP: f32 = 2.0;
const LIST_INDENT: f32 = 20.0;
const LIST_BULLET: &str = "•";
const QUOTE_PREFIX: &str = "| ";
const RULE_OFFSET: f32 = 10.0;
const RULE_WIDTH: f32 = 3.0;
const THIN_STROKE: f32 = 1.0;

/// Pen position in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cursor {
    pub x: f32,
    pub y: f32,
}

impl Cursor {
    fn start_line(&mut self, left: f32) {
        self.x = left;
    }

    fn advance_x(&mut self, dx: f32) {
        self.x += dx.max(0.0);
    }

    fn advance_y(&mut self, dy: f32) {
        self.y += dy.max(0.0);
    }
}

/// Where one source line landed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineLayout {
    pub kind: BlockKind,
    pub y_before: f32,
    pub y_after: f32,
    /// Horizontal pen position after the last run of the line.
    pub x_end: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutReport {
    pub lines: Vec<LineLayout>,
}

impl LayoutReport {
    pub fn final_y(&self) -> f32 {
        self.lines.last().map_or(0.0, |line| line.y_after)
    }
}

/// Decoration stroked under or through a styled run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decoration {
    None,
    Underline,
    Strikethrough,
}

impl Decoration {
    fn of(kind: SpanKind) -> Self {
        if kind.is_underlined() {
            Decoration::Underline
        } else if kind.is_struck() {
            Decoration::Strikethrough
        } else {
            Decoration::None
        }
    }
}

fn styled_font(base: Font, kind: SpanKind) -> Font {
    let font = if kind.is_bold() { base.bold() } else { base };
    if kind.is_italic() { font.italic() } else { font }
}

/// Heading font size: 28px for `#` down to 8px for `######`.
pub fn heading_font_size(level: u8) -> f32 {
    HEADING_BASE_SIZE - HEADING_STEP * f32::from(level)
}

/// Lays a document out line by line onto a surface.
///
/// There is no state across lines beyond the vertical pen position.
pub struct Renderer<'a, S: Surface> {
    theme: &'a Theme,
    surface: &'a mut S,
    cursor: Cursor,
}

impl<'a, S: Surface> Renderer<'a, S> {
    pub fn new(theme: &'a Theme, surface: &'a mut S) -> Self {
        Self {
            theme,
            surface,
            cursor: Cursor {
                x: theme.margin_left,
                y: 0.0,
            },
        }
    }

    /// Paints the background and every line of `markdown`. The text is
    /// expected to have been validated already.
    pub fn render_document(&mut self, markdown: &str) -> LayoutReport {
        let mut report = LayoutReport::default();

        let (width, height) = (self.surface.width() as f32, self.surface.height() as f32);
        self.surface
            .fill_rect(0.0, 0.0, width, height, self.theme.background_color);

        for line in block::lines(markdown) {
            self.cursor.start_line(self.theme.margin_left);
            let y_before = self.cursor.y;

            let parsed = block::classify(line);
            let kind = parsed.kind();
            match parsed {
                Block::Heading { level, text } => self.render_heading(level, text),
                Block::Blockquote { text } => self.render_blockquote(text),
                Block::Rule => self.render_rule(),
                Block::ListItem { marker, text, .. } => self.render_list_item(marker, text),
                Block::Paragraph { text } => self.render_paragraph(text),
            }

            report.lines.push(LineLayout {
                kind,
                y_before,
                y_after: self.cursor.y,
                x_end: self.cursor.x,
            });
        }

        debug!(
            lines = report.lines.len(),
            final_y = report.final_y(),
            "laid out markdown"
        );
        report
    }

    fn render_heading(&mut self, level: u8, text: &str) {
        let font_size = heading_font_size(level);
        let font = Font::sans(font_size).bold();
        self.render_graphemes(text, font, self.theme.text_color);

        let divider_y = self.cursor.y + font_size + HEADING_DIVIDER_GAP;
        self.surface.stroke_line(
            (self.theme.margin_left, divider_y),
            (self.theme.right_edge(), divider_y),
            self.theme.divider_color,
            THIN_STROKE,
        );

        self.cursor.advance_y(font_size + self.theme.heading_gap);
    }

    fn render_blockquote(&mut self, text: &str) {
        let font = self.base_font();
        let quoted = format!("{}{}", QUOTE_PREFIX, text);

        self.surface.fill_text(
            &quoted,
            self.cursor.x,
            self.cursor.y,
            &font,
            self.theme.quote_text_color,
        );
        let width = self.surface.measure_text(&quoted, &font);
        self.cursor.advance_x(width);

        self.cursor.advance_y(self.theme.line_advance);
    }

    fn render_rule(&mut self) {
        let y = self.cursor.y + RULE_OFFSET;
        self.surface.stroke_line(
            (self.cursor.x, y),
            (self.theme.right_edge(), y),
            self.theme.divider_color,
            RULE_WIDTH,
        );
        self.cursor.advance_y(self.theme.rule_advance);
    }

    /// Ordered and unordered items share the bullet glyph; the number itself
    /// is not drawn.
    fn render_list_item(&mut self, marker: &str, text: &str) {
        let font = self.base_font();
        self.cursor.advance_x(LIST_INDENT);

        self.surface.fill_text(
            LIST_BULLET,
            self.cursor.x,
            self.cursor.y,
            &font,
            self.theme.text_color,
        );
        let marker_width = self.surface.measure_text(marker, &font);
        self.cursor.advance_x(marker_width);

        self.render_inline(text);
        self.cursor.advance_y(self.theme.line_advance);
    }

    fn render_paragraph(&mut self, text: &str) {
        self.render_inline(text);
        self.cursor.advance_y(self.theme.line_advance);
    }

    /// Draws one line of inline markdown starting at the current pen position.
    fn render_inline(&mut self, text: &str) {
        let base = self.base_font();

        for span in segment(text) {
            match span.kind {
                SpanKind::Plain => self.render_graphemes(span.text, base, self.theme.text_color),
                SpanKind::Code => self.render_code(span.text),
                kind => {
                    self.render_styled_run(span.text, styled_font(base, kind), Decoration::of(kind))
                }
            }
        }
    }

    /// Grapheme-at-a-time drawing with the emoji face swapped in where needed.
    fn render_graphemes(&mut self, text: &str, font: Font, color: Color) {
        for grapheme in graphemes(text) {
            let face = font.for_grapheme(grapheme);
            self.surface
                .fill_text(grapheme, self.cursor.x, self.cursor.y, &face, color);
            let width = self.surface.measure_text(grapheme, &face);
            self.cursor.advance_x(width);
        }
    }

    /// Styled spans are drawn as one unit in a single face, emoji included.
    fn render_styled_run(&mut self, text: &str, font: Font, decoration: Decoration) {
        let (x, y) = (self.cursor.x, self.cursor.y);
        self.surface
            .fill_text(text, x, y, &font, self.theme.text_color);
        let width = self.surface.measure_text(text, &font);

        let offset = match decoration {
            Decoration::None => None,
            Decoration::Underline => Some(self.theme.underline_offset),
            Decoration::Strikethrough => Some(self.theme.strike_offset),
        };
        if let Some(offset) = offset {
            self.surface.stroke_line(
                (x, y + offset),
                (x + width, y + offset),
                self.theme.text_color,
                THIN_STROKE,
            );
        }

        self.cursor.advance_x(width);
    }

    fn render_code(&mut self, text: &str) {
        let font = Font::monospace(self.theme.font_size_base);
        let padding = self.theme.code_padding;
        let (x, y) = (self.cursor.x, self.cursor.y);
        let width = self.surface.measure_text(text, &font);

        self.surface.fill_rect(
            x,
            y,
            width + padding,
            self.theme.code_box_height,
            self.theme.code_bg_color,
        );
        self.surface
            .fill_text(text, x + padding / 2.0, y, &font, self.theme.code_text_color);

        self.cursor.advance_x(width + padding);
    }

    fn base_font(&self) -> Font {
        Font::sans(self.theme.font_size_base)
    }
}
