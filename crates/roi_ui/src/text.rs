//! Text measurement and rasterization.
//!
//! Labels are rendered through resvg as single-line SVG `<text>` elements
//! against the system font database. Measurements are estimates based on
//! font metrics and are only used for layout and centering.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use resvg::usvg::{self, fontdb};
use tiny_skia::{Pixmap, Transform};

use crate::renderer::Color;

/// Metrics for a specific font size.
#[derive(Debug, Clone, Copy)]
pub struct TextMetrics {
    /// Font size in pixels
    pub size: f32,
    /// Average character width as a ratio of font size
    pub char_width_ratio: f32,
    /// Line height as a ratio of font size
    pub line_height_ratio: f32,
}

impl TextMetrics {
    /// Metrics tuned for a proportional sans-serif face.
    pub fn new(size: f32) -> Self {
        Self {
            size,
            char_width_ratio: 0.55,
            line_height_ratio: 1.2,
        }
    }

    /// Estimate the width of a single line of text.
    pub fn line_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.size * self.char_width_ratio
    }

    pub fn line_height(&self) -> f32 {
        self.size * self.line_height_ratio
    }

    /// Estimated (width, height) of a single line.
    pub fn measure(&self, text: &str) -> (f32, f32) {
        (self.line_width(text), self.line_height())
    }
}

type TextKey = (String, u32, [u8; 4]);

static FONTS: OnceLock<Arc<fontdb::Database>> = OnceLock::new();
static TEXT_CACHE: OnceLock<Mutex<HashMap<TextKey, Option<Pixmap>>>> = OnceLock::new();

fn font_database() -> Arc<fontdb::Database> {
    FONTS
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            log::debug!("Loaded {} font faces", db.len());
            if db.is_empty() {
                log::warn!("No system fonts found; labels will not be drawn");
            }
            Arc::new(db)
        })
        .clone()
}

/// Rasterize `text` into a tightly sized pixmap, cached by content, size and
/// color.
///
/// Returns `None` for empty text or when the SVG cannot be rendered.
pub fn rasterize(text: &str, size: f32, color: Color) -> Option<Pixmap> {
    if text.is_empty() {
        return None;
    }
    let key = (text.to_string(), size.to_bits(), color.to_rgba8());
    let cache = TEXT_CACHE.get_or_init(|| Mutex::new(HashMap::new()));

    if let Ok(cache) = cache.lock() {
        if let Some(hit) = cache.get(&key) {
            return hit.clone();
        }
    }

    let rendered = render_svg_text(text, size, color);
    if let Ok(mut cache) = cache.lock() {
        cache.insert(key, rendered.clone());
    }
    rendered
}

fn render_svg_text(text: &str, size: f32, color: Color) -> Option<Pixmap> {
    let metrics = TextMetrics::new(size);
    // Generous canvas: the estimate is an average and wide glyphs overflow it.
    let width = (metrics.line_width(text) * 1.4).ceil().max(1.0) as u32 + 4;
    let height = metrics.line_height().ceil() as u32 + 2;
    let baseline = size;
    let [r, g, b, a] = color.to_rgba8();

    let svg = format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}"><text x="0" y="{baseline}" font-family="sans-serif" font-size="{size}" fill="#{r:02x}{g:02x}{b:02x}" fill-opacity="{opacity}">{content}</text></svg>"##,
        opacity = f32::from(a) / 255.0,
        content = escape_xml(text),
    );

    let mut options = usvg::Options::default();
    options.fontdb = font_database();

    let tree = match usvg::Tree::from_str(&svg, &options) {
        Ok(tree) => tree,
        Err(e) => {
            log::error!("Failed to build text SVG for {:?}: {:?}", text, e);
            return None;
        }
    };

    let mut pixmap = Pixmap::new(width, height)?;
    resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());
    Some(pixmap)
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
