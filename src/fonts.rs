use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, Style, Weight};
use lru::LruCache;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::emoji::is_emoji;
use crate::error::{RenderError, Result};
use crate::theme::Theme;

const MEASURE_CACHE_CAPACITY: NonZeroUsize = NonZeroUsize::new(2048).unwrap();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFamily {
    SansSerif,
    Monospace,
    /// The registered emoji face, with sans-serif behind it.
    Emoji,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontWeight {
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontSlant {
    Normal,
    Italic,
}

/// The font a run is drawn with. Passed explicitly to every draw and measure
/// call; surfaces keep no "current font".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    pub family: FontFamily,
    pub size: f32,
    pub weight: FontWeight,
    pub slant: FontSlant,
}

impl Font {
    pub fn sans(size: f32) -> Self {
        Self {
            family: FontFamily::SansSerif,
            size,
            weight: FontWeight::Normal,
            slant: FontSlant::Normal,
        }
    }

    pub fn monospace(size: f32) -> Self {
        Self {
            family: FontFamily::Monospace,
            ..Self::sans(size)
        }
    }

    pub fn bold(self) -> Self {
        Self {
            weight: FontWeight::Bold,
            ..self
        }
    }

    pub fn italic(self) -> Self {
        Self {
            slant: FontSlant::Italic,
            ..self
        }
    }

    pub fn emoji_fallback(self) -> Self {
        Self {
            family: FontFamily::Emoji,
            ..self
        }
    }

    /// Emoji graphemes switch to the fallback face; everything else keeps `self`.
    pub fn for_grapheme(self, grapheme: &str) -> Self {
        if is_emoji(grapheme) {
            self.emoji_fallback()
        } else {
            self
        }
    }

    pub fn is_bold(&self) -> bool {
        self.weight == FontWeight::Bold
    }

    pub fn is_italic(&self) -> bool {
        self.slant == FontSlant::Italic
    }

    /// CSS-style font-family list, e.g. `"Apple Emoji", sans-serif`.
    pub fn family_list(&self, emoji_family: &str) -> String {
        match self.family {
            FontFamily::SansSerif => "sans-serif".to_string(),
            FontFamily::Monospace => "monospace".to_string(),
            FontFamily::Emoji => format!("\"{}\", sans-serif", emoji_family),
        }
    }

    /// Canvas font shorthand, e.g. `bold 28px sans-serif`.
    pub fn css(&self, emoji_family: &str) -> String {
        let mut out = String::new();
        if self.is_italic() {
            out.push_str("italic ");
        }
        if self.is_bold() {
            out.push_str("bold ");
        }
        out.push_str(&format!("{}px {}", self.size, self.family_list(emoji_family)));
        out
    }
}

pub trait TextMeasure {
    /// Advance width of `text` in pixels.
    fn measure(&mut self, text: &str, font: &Font) -> f32;
}

#[derive(Hash, PartialEq, Eq, Clone)]
struct MeasureKey {
    text: String,
    font_size_bits: u32,
    family: FontFamily,
    weight: FontWeight,
    slant: FontSlant,
}

impl MeasureKey {
    fn new(text: &str, font: &Font) -> Self {
        Self {
            text: text.to_string(),
            font_size_bits: font.size.to_bits(),
            family: font.family,
            weight: font.weight,
            slant: font.slant,
        }
    }
}

static FONT_SYSTEM: LazyLock<Mutex<FontSystem>> = LazyLock::new(|| {
    let mut font_system = FontSystem::new();
    let local_fonts = Path::new("fonts");
    if local_fonts.is_dir() {
        font_system.db_mut().load_fonts_dir(local_fonts);
    }
    for font in REGISTRY.read().fonts.iter() {
        font_system.db_mut().load_font_data(font.data.as_ref().clone());
    }
    Mutex::new(font_system)
});

/// Measures with cosmic-text against the process-wide font system.
pub struct CosmicTextMeasure {
    emoji_family: String,
    cache: LruCache<MeasureKey, f32>,
}

impl CosmicTextMeasure {
    pub fn new(emoji_family: impl Into<String>) -> Self {
        Self {
            emoji_family: emoji_family.into(),
            cache: LruCache::new(MEASURE_CACHE_CAPACITY),
        }
    }
}

impl TextMeasure for CosmicTextMeasure {
    fn measure(&mut self, text: &str, font: &Font) -> f32 {
        if text.is_empty() {
            return 0.0;
        }

        let key = MeasureKey::new(text, font);
        if let Some(cached) = self.cache.get(&key) {
            return *cached;
        }

        let mut font_system = FONT_SYSTEM.lock();
        let metrics = Metrics {
            font_size: font.size,
            line_height: font.size * 1.2,
        };
        let mut buffer = Buffer::new(&mut font_system, metrics);
        buffer.set_size(&mut font_system, None, None);

        let attrs = Attrs::new()
            .family(match font.family {
                FontFamily::SansSerif => Family::SansSerif,
                FontFamily::Monospace => Family::Monospace,
                FontFamily::Emoji => Family::Name(&self.emoji_family),
            })
            .weight(if font.is_bold() {
                Weight::BOLD
            } else {
                Weight::NORMAL
            })
            .style(if font.is_italic() {
                Style::Italic
            } else {
                Style::Normal
            });

        buffer.set_text(&mut font_system, text, &attrs, Shaping::Advanced, None);

        let width = buffer
            .layout_runs()
            .fold(0.0_f32, |acc, run| acc.max(run.line_w));

        self.cache.put(key, width);
        width
    }
}

struct RegisteredFont {
    alias: String,
    family: String,
    data: Arc<Vec<u8>>,
}

#[derive(Default)]
struct FontRegistry {
    fonts: Vec<RegisteredFont>,
    failed: Vec<PathBuf>,
    generation: u64,
}

static REGISTRY: LazyLock<RwLock<FontRegistry>> =
    LazyLock::new(|| RwLock::new(FontRegistry::default()));

/// Loads a font file and makes it available under `alias`.
///
/// Returns the family name the face declares, which is what draw calls must
/// ask for. Registering an alias twice is a no-op.
pub fn register_font_file(path: &Path, alias: &str) -> Result<String> {
    if let Some(family) = resolve_family(alias) {
        return Ok(family);
    }

    let data = std::fs::read(path).map_err(|e| RenderError::Font {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let family = declared_family(&data).ok_or_else(|| RenderError::Font {
        path: path.to_path_buf(),
        reason: "no usable font face in file".to_string(),
    })?;

    let data = Arc::new(data);
    // Forcing the font system here (outside the registry lock) means its
    // construction cannot pick this face up a second time.
    FONT_SYSTEM
        .lock()
        .db_mut()
        .load_font_data(data.as_ref().clone());

    let mut registry = REGISTRY.write();
    if let Some(existing) = registry.fonts.iter().find(|f| f.alias == alias) {
        return Ok(existing.family.clone());
    }

    debug!(alias, family = %family, path = %path.display(), "registered font");
    registry.fonts.push(RegisteredFont {
        alias: alias.to_string(),
        family: family.clone(),
        data,
    });
    registry.generation += 1;

    Ok(family)
}

/// Family name registered under `alias`, if any.
pub fn resolve_family(alias: &str) -> Option<String> {
    REGISTRY
        .read()
        .fonts
        .iter()
        .find(|f| f.alias == alias)
        .map(|f| f.family.clone())
}

/// One-time emoji face setup for a theme.
///
/// A missing or unreadable font is reported once and not retried; emoji then
/// render through the generic fallback chain.
pub fn ensure_emoji_font(theme: &Theme) -> String {
    if let Some(family) = resolve_family(&theme.emoji_family) {
        return family;
    }

    let path = theme.emoji_font_path.as_path();
    if REGISTRY.read().failed.iter().any(|p| p == path) {
        return theme.emoji_family.clone();
    }

    match register_font_file(path, &theme.emoji_family) {
        Ok(family) => family,
        Err(e) => {
            warn!("emoji font unavailable, using fallback faces: {}", e);
            REGISTRY.write().failed.push(path.to_path_buf());
            theme.emoji_family.clone()
        }
    }
}

/// Raw data of every registered face plus a generation counter that bumps on
/// each registration.
pub(crate) fn registered_fonts() -> (u64, Vec<Arc<Vec<u8>>>) {
    let registry = REGISTRY.read();
    let data = registry.fonts.iter().map(|f| Arc::clone(&f.data)).collect();
    (registry.generation, data)
}

fn declared_family(data: &[u8]) -> Option<String> {
    let mut db = cosmic_text::fontdb::Database::new();
    db.load_font_data(data.to_vec());
    db.faces()
        .find_map(|face| face.families.first().map(|(name, _)| name.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_shorthand_matches_canvas_syntax() {
        assert_eq!(Font::sans(16.0).css("Apple Emoji"), "16px sans-serif");
        assert_eq!(Font::sans(28.0).bold().css("Apple Emoji"), "bold 28px sans-serif");
        assert_eq!(
            Font::sans(16.0).italic().css("Apple Emoji"),
            "italic 16px sans-serif"
        );
        assert_eq!(Font::monospace(16.0).css("Apple Emoji"), "16px monospace");
        assert_eq!(
            Font::sans(16.0).bold().emoji_fallback().css("Apple Emoji"),
            "bold 16px \"Apple Emoji\", sans-serif"
        );
    }

    #[test]
    fn for_grapheme_switches_only_on_emoji() {
        let base = Font::sans(16.0).bold();
        assert_eq!(base.for_grapheme("😀").family, FontFamily::Emoji);
        assert_eq!(base.for_grapheme("😀").weight, FontWeight::Bold);
        assert_eq!(base.for_grapheme("5"), base);
        assert_eq!(base.for_grapheme("x"), base);
    }

    #[test]
    fn missing_font_file_is_a_font_error() {
        let err = register_font_file(Path::new("/nonexistent/emoji.ttf"), "Missing Face")
            .unwrap_err();
        assert!(matches!(err, RenderError::Font { .. }));
        assert!(resolve_family("Missing Face").is_none());
    }

    #[test]
    fn ensure_emoji_font_falls_back_to_alias() {
        let theme = Theme {
            emoji_font_path: PathBuf::from("/nonexistent/also-missing.ttf"),
            emoji_family: "Never Registered".to_string(),
            ..Theme::default()
        };
        assert_eq!(ensure_emoji_font(&theme), "Never Registered");
        assert!(REGISTRY.read().failed.contains(&theme.emoji_font_path));
        // Second call takes the cached-failure path.
        assert_eq!(ensure_emoji_font(&theme), "Never Registered");
        let failures = REGISTRY
            .read()
            .failed
            .iter()
            .filter(|p| **p == theme.emoji_font_path)
            .count();
        assert_eq!(failures, 1);
    }
}
