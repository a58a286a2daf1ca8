//! Drawing surfaces the layout engine paints onto.
//!
//! Colors, stroke widths and fonts travel with every call, so a surface never
//! carries style between draws.

mod recording;
mod svg;

pub use recording::{DrawOp, RecordingSurface};
pub use svg::SvgSurface;

use crate::color::Color;
use crate::error::Result;
use crate::fonts::Font;

pub trait Surface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), color: Color, width: f32);

    /// Draws `text` with its top edge at `y`.
    fn fill_text(&mut self, text: &str, x: f32, y: f32, font: &Font, color: Color);

    fn measure_text(&mut self, text: &str, font: &Font) -> f32;

    /// Rasterizes everything drawn so far into a PNG of `width × height`.
    fn encode_png(&mut self) -> Result<Vec<u8>>;
}
