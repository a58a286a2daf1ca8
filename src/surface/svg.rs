use std::fmt::Write as _;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use parking_lot::Mutex;
use resvg::usvg;
use tiny_skia::{Pixmap, Transform};
use tracing::debug;

use crate::color::Color;
use crate::error::{RenderError, Result};
use crate::fonts::{Font, TextMeasure, registered_fonts};
use crate::surface::Surface;

/// Rasterizer font database, rebuilt whenever a font is registered.
static RASTER_FONTS: LazyLock<Mutex<Option<(u64, Arc<usvg::fontdb::Database>)>>> =
    LazyLock::new(|| Mutex::new(None));

/// Surface that records SVG primitives and rasterizes them with resvg.
pub struct SvgSurface<M: TextMeasure> {
    width: u32,
    height: u32,
    emoji_family: String,
    measure: M,
    content: String,
}

impl<M: TextMeasure> SvgSurface<M> {
    pub fn new(width: u32, height: u32, emoji_family: impl Into<String>, measure: M) -> Self {
        Self {
            width,
            height,
            emoji_family: emoji_family.into(),
            measure,
            content: String::new(),
        }
    }

    /// The document drawn so far.
    pub fn to_svg(&self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}">{}</svg>"#,
            self.content,
            w = self.width,
            h = self.height,
        )
    }
}

impl<M: TextMeasure> Surface for SvgSurface<M> {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let _ = write!(
            self.content,
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"{} />"#,
            x,
            y,
            width,
            height,
            color.to_hex_rgb(),
            opacity_attr("fill-opacity", color),
        );
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), color: Color, width: f32) {
        let _ = write!(
            self.content,
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{:.2}"{} />"#,
            from.0,
            from.1,
            to.0,
            to.1,
            color.to_hex_rgb(),
            width,
            opacity_attr("stroke-opacity", color),
        );
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, font: &Font, color: Color) {
        let text = escape_text(text);
        if text.is_empty() {
            return;
        }

        let weight_attr = if font.is_bold() {
            r#" font-weight="700""#
        } else {
            ""
        };
        let style_attr = if font.is_italic() {
            r#" font-style="italic""#
        } else {
            ""
        };

        let _ = write!(
            self.content,
            r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.2}" fill="{}"{}{}{} dominant-baseline="text-before-edge" xml:space="preserve">{}</text>"#,
            x,
            y,
            escape_text(&font.family_list(&self.emoji_family)),
            font.size,
            color.to_hex_rgb(),
            opacity_attr("fill-opacity", color),
            weight_attr,
            style_attr,
            text,
        );
    }

    fn measure_text(&mut self, text: &str, font: &Font) -> f32 {
        self.measure.measure(text, font)
    }

    fn encode_png(&mut self) -> Result<Vec<u8>> {
        let svg = self.to_svg();

        let mut opts = usvg::Options::default();
        opts.fontdb = raster_fonts();

        let tree = usvg::Tree::from_str(&svg, &opts)
            .map_err(|e| RenderError::Surface(format!("Failed to parse SVG: {}", e)))?;

        let mut pixmap = Pixmap::new(self.width, self.height)
            .ok_or_else(|| RenderError::Surface("Failed to create pixmap".to_string()))?;

        resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());

        pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(e.to_string()))
    }
}

fn opacity_attr(name: &str, color: Color) -> String {
    if color.is_opaque() {
        String::new()
    } else {
        format!(r#" {}="{:.3}""#, name, color.opacity())
    }
}

/// Drops characters XML 1.0 forbids and escapes markup.
fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\t' | '\n' | '\r' => escaped.push(c),
            c if (c as u32) < 0x20 => {}
            '\u{FFFE}' | '\u{FFFF}' => {}
            _ => escaped.push(c),
        }
    }
    escaped
}

fn raster_fonts() -> Arc<usvg::fontdb::Database> {
    let (generation, faces) = registered_fonts();
    let mut cached = RASTER_FONTS.lock();

    if let Some((built_for, db)) = cached.as_ref() {
        if *built_for == generation {
            return Arc::clone(db);
        }
    }

    let mut fontdb = usvg::fontdb::Database::new();
    fontdb.load_system_fonts();

    let local_fonts = Path::new("fonts");
    if local_fonts.is_dir() {
        fontdb.load_fonts_dir(local_fonts);
    }
    for face in &faces {
        fontdb.load_font_data(face.as_ref().clone());
    }

    configure_font_fallbacks(&mut fontdb);
    debug!(faces = fontdb.len(), generation, "built raster font database");

    let db = Arc::new(fontdb);
    *cached = Some((generation, Arc::clone(&db)));
    db
}

/// Points the generic families at whatever the host actually has installed.
fn configure_font_fallbacks(fontdb: &mut usvg::fontdb::Database) {
    let mut sans_family: Option<String> = None;
    let mut mono_family: Option<String> = None;
    let mut first_family: Option<String> = None;

    for face in fontdb.faces() {
        for (family, _) in &face.families {
            if first_family.is_none() {
                first_family = Some(family.clone());
            }

            let lower = family.to_ascii_lowercase();
            if sans_family.is_none() && lower.contains("sans") && !lower.contains("mono") {
                sans_family = Some(family.clone());
            }
            if mono_family.is_none() && (lower.contains("mono") || lower.contains("code")) {
                mono_family = Some(family.clone());
            }
        }
    }

    let sans = sans_family.or_else(|| first_family.clone());
    if let Some(family) = sans.as_deref() {
        fontdb.set_sans_serif_family(family);
    }
    if let Some(family) = mono_family.as_deref().or(sans.as_deref()) {
        fontdb.set_monospace_family(family);
    }
}
