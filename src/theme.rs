use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{RenderError, Result};

const CANVAS_WIDTH: u32 = 800;
const CANVAS_HEIGHT: u32 = 600;

const BACKGROUND: Color = Color::rgb(0x2B, 0x2D, 0x31);
const TEXT: Color = Color::WHITE;
const DIVIDER: Color = Color::rgb(0x44, 0x47, 0x5A);
const QUOTE_TEXT: Color = Color::rgba(0xBB, 0xBB, 0xBB, 0x90);
const CODE_BG: Color = Color::rgb(0x35, 0x35, 0x35);
const CODE_TEXT: Color = Color::rgb(0xD1, 0xB5, 0x7B);

const FONT_SIZE_BASE: f32 = 16.0;
const MARGIN_LEFT: f32 = 20.0;
const LINE_ADVANCE: f32 = 24.0;
const RULE_ADVANCE: f32 = 30.0;
const HEADING_GAP: f32 = 15.0;
const CODE_PADDING: f32 = 10.0;
const CODE_BOX_HEIGHT: f32 = 20.0;
const UNDERLINE_OFFSET: f32 = 18.0;
const STRIKE_OFFSET: f32 = 8.0;

const EMOJI_FONT_PATH: &str = "fonts/AppleColorEmoji@2x.ttf";
const EMOJI_FAMILY: &str = "Apple Emoji";

pub const MAX_INPUT_LEN: usize = 6000;

/// Everything the layout engine needs to know about colors, metrics and fonts.
///
/// Every field has a default, so a theme file only has to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,

    #[serde(default = "default_background")]
    pub background_color: Color,
    #[serde(default = "default_text")]
    pub text_color: Color,
    #[serde(default = "default_divider")]
    pub divider_color: Color,
    #[serde(default = "default_quote_text")]
    pub quote_text_color: Color,
    #[serde(default = "default_code_bg")]
    pub code_bg_color: Color,
    #[serde(default = "default_code_text")]
    pub code_text_color: Color,

    #[serde(default = "default_font_size_base")]
    pub font_size_base: f32,
    #[serde(default = "default_margin_left")]
    pub margin_left: f32,
    #[serde(default = "default_line_advance")]
    pub line_advance: f32,
    #[serde(default = "default_rule_advance")]
    pub rule_advance: f32,
    #[serde(default = "default_heading_gap")]
    pub heading_gap: f32,

    #[serde(default = "default_code_padding")]
    pub code_padding: f32,
    #[serde(default = "default_code_box_height")]
    pub code_box_height: f32,
    #[serde(default = "default_underline_offset")]
    pub underline_offset: f32,
    #[serde(default = "default_strike_offset")]
    pub strike_offset: f32,

    #[serde(default = "default_emoji_font_path")]
    pub emoji_font_path: PathBuf,
    #[serde(default = "default_emoji_family")]
    pub emoji_family: String,

    #[serde(default = "default_max_input_len")]
    pub max_input_len: usize,
}

fn default_width() -> u32 {
    CANVAS_WIDTH
}
fn default_height() -> u32 {
    CANVAS_HEIGHT
}
fn default_background() -> Color {
    BACKGROUND
}
fn default_text() -> Color {
    TEXT
}
fn default_divider() -> Color {
    DIVIDER
}
fn default_quote_text() -> Color {
    QUOTE_TEXT
}
fn default_code_bg() -> Color {
    CODE_BG
}
fn default_code_text() -> Color {
    CODE_TEXT
}
fn default_font_size_base() -> f32 {
    FONT_SIZE_BASE
}
fn default_margin_left() -> f32 {
    MARGIN_LEFT
}
fn default_line_advance() -> f32 {
    LINE_ADVANCE
}
fn default_rule_advance() -> f32 {
    RULE_ADVANCE
}
fn default_heading_gap() -> f32 {
    HEADING_GAP
}
fn default_code_padding() -> f32 {
    CODE_PADDING
}
fn default_code_box_height() -> f32 {
    CODE_BOX_HEIGHT
}
fn default_underline_offset() -> f32 {
    UNDERLINE_OFFSET
}
fn default_strike_offset() -> f32 {
    STRIKE_OFFSET
}
fn default_emoji_font_path() -> PathBuf {
    PathBuf::from(EMOJI_FONT_PATH)
}
fn default_emoji_family() -> String {
    EMOJI_FAMILY.to_string()
}
fn default_max_input_len() -> usize {
    MAX_INPUT_LEN
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,

            background_color: BACKGROUND,
            text_color: TEXT,
            divider_color: DIVIDER,
            quote_text_color: QUOTE_TEXT,
            code_bg_color: CODE_BG,
            code_text_color: CODE_TEXT,

            font_size_base: FONT_SIZE_BASE,
            margin_left: MARGIN_LEFT,
            line_advance: LINE_ADVANCE,
            rule_advance: RULE_ADVANCE,
            heading_gap: HEADING_GAP,

            code_padding: CODE_PADDING,
            code_box_height: CODE_BOX_HEIGHT,
            underline_offset: UNDERLINE_OFFSET,
            strike_offset: STRIKE_OFFSET,

            emoji_font_path: default_emoji_font_path(),
            emoji_family: default_emoji_family(),

            max_input_len: MAX_INPUT_LEN,
        }
    }
}

impl Theme {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| RenderError::Config(format!("Failed to parse TOML theme: {}", e)))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| RenderError::Config(format!("Failed to parse YAML theme: {}", e)))
    }

    /// Loads a theme file. `.toml` and `.yaml`/`.yml` pick their parser; anything
    /// else is tried as TOML first, then YAML.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(RenderError::Config(format!(
                "Theme file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| RenderError::Config(format!("Failed to read theme file: {}", e)))?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("toml") => Self::from_toml(&content),
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            _ => Self::from_toml(&content).or_else(|_| Self::from_yaml(&content)),
        }
    }

    /// Right end of full-width strokes (dividers and rules).
    pub fn right_edge(&self) -> f32 {
        self.width as f32 - self.margin_left
    }
}
