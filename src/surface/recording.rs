use tiny_skia::{Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::color::Color;
use crate::emoji::graphemes;
use crate::error::{RenderError, Result};
use crate::fonts::{Font, FontFamily};
use crate::surface::Surface;

/// One call made against a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        color: Color,
        width: f32,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        font: Font,
        color: Color,
    },
}

/// Surface that logs draw calls and measures with fixed advances: half the font
/// size per grapheme, a full em for graphemes drawn in the emoji face.
///
/// Layout is fully deterministic and independent of installed fonts. PNG
/// output replays rectangles and lines only.
pub struct RecordingSurface {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Text draws in order, as `(text, font)` pairs.
    pub fn texts(&self) -> impl Iterator<Item = (&str, &Font)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, font, .. } => Some((text.as_str(), font)),
            _ => None,
        })
    }

    /// Every stroked line.
    pub fn lines(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Line { .. }))
    }

    pub fn advance_for(grapheme: &str, font: &Font) -> f32 {
        if grapheme.is_empty() {
            0.0
        } else if font.family == FontFamily::Emoji {
            font.size
        } else {
            font.size * 0.5
        }
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.ops.push(DrawOp::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), color: Color, width: f32) {
        self.ops.push(DrawOp::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, font: &Font, color: Color) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            font: *font,
            color,
        });
    }

    fn measure_text(&mut self, text: &str, font: &Font) -> f32 {
        graphemes(text).map(|g| Self::advance_for(g, font)).sum()
    }

    fn encode_png(&mut self) -> Result<Vec<u8>> {
        let mut pixmap = Pixmap::new(self.width, self.height)
            .ok_or_else(|| RenderError::Surface("Failed to create pixmap".to_string()))?;

        for op in &self.ops {
            match op {
                DrawOp::FillRect {
                    x,
                    y,
                    width,
                    height,
                    color,
                } => {
                    if let Some(rect) = Rect::from_xywh(*x, *y, *width, *height) {
                        pixmap.fill_rect(rect, &paint(*color), Transform::identity(), None);
                    }
                }
                DrawOp::Line {
                    from,
                    to,
                    color,
                    width,
                } => {
                    let mut pb = PathBuilder::new();
                    pb.move_to(from.0, from.1);
                    pb.line_to(to.0, to.1);
                    if let Some(path) = pb.finish() {
                        let stroke = Stroke {
                            width: *width,
                            ..Stroke::default()
                        };
                        pixmap.stroke_path(
                            &path,
                            &paint(*color),
                            &stroke,
                            Transform::identity(),
                            None,
                        );
                    }
                }
                DrawOp::Text { .. } => {}
            }
        }

        pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(e.to_string()))
    }
}

fn paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}
