//! Icon rasterization.
//!
//! Icons are small SVG documents drawn with `currentColor`; they are
//! rasterized with resvg on first use and cached by name, size and color.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use tiny_skia::{Pixmap, Transform};

use crate::renderer::Color;

type IconKey = (String, u32, [u8; 4]);

static ICON_CACHE: OnceLock<Mutex<HashMap<IconKey, Pixmap>>> = OnceLock::new();

/// Get an icon from the global cache, rasterizing it if needed.
pub fn get_icon(name: &str, svg: &str, size: u32, color: Color) -> Option<Pixmap> {
    let key = (name.to_string(), size, color.to_rgba8());
    let cache = ICON_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut cache = cache.lock().ok()?;

    if let Some(icon) = cache.get(&key) {
        return Some(icon.clone());
    }
    let icon = rasterize_svg(svg, size, color)?;
    cache.insert(key, icon.clone());
    Some(icon)
}

/// Rasterize an SVG into a `size` x `size` pixmap, replacing `currentColor`.
pub fn rasterize_svg(svg: &str, size: u32, color: Color) -> Option<Pixmap> {
    let [r, g, b, _] = color.to_rgba8();
    let svg = svg.replace("currentColor", &format!("#{:02x}{:02x}{:02x}", r, g, b));

    let tree = match resvg::usvg::Tree::from_str(&svg, &resvg::usvg::Options::default()) {
        Ok(t) => t,
        Err(e) => {
            log::error!("Failed to parse SVG icon: {:?}", e);
            return None;
        }
    };

    let svg_size = tree.size();
    let scale = size as f32 / svg_size.width().max(svg_size.height());

    let mut pixmap = Pixmap::new(size, size)?;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());
    Some(pixmap)
}

/// Built-in icons.
pub mod icons {
    /// Drafting compass.
    pub const COMPASS: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="16" viewBox="0 0 16 16" fill="none" stroke="currentColor" stroke-width="1.4" stroke-linecap="round"><circle cx="8" cy="3" r="1.6"/><path d="M7.3 4.5 3 14.5M8.7 4.5 13 14.5M4.6 10.8h6.8"/></svg>"#;

    /// Trash can.
    pub const TRASH: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="16" viewBox="0 0 16 16" fill="none" stroke="currentColor" stroke-width="1.4" stroke-linecap="round"><path d="M2.5 4h11M6 4V2.5h4V4"/><path d="M4 4l.8 10h6.4L12 4"/><path d="M6.8 6.5v5M9.2 6.5v5"/></svg>"#;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rasterize_builtin_icons() {
        for svg in [icons::COMPASS, icons::TRASH] {
            let pixmap = rasterize_svg(svg, 16, Color::BLACK).unwrap();
            assert_eq!((pixmap.width(), pixmap.height()), (16, 16));
            assert!(pixmap.pixels().iter().any(|p| p.alpha() > 0));
        }
    }

    #[test]
    fn test_invalid_svg() {
        assert!(rasterize_svg("<not-svg", 16, Color::BLACK).is_none());
    }

    #[test]
    fn test_cache_returns_same_icon() {
        let a = get_icon("trash", icons::TRASH, 12, Color::RED).unwrap();
        let b = get_icon("trash", icons::TRASH, 12, Color::RED).unwrap();
        assert_eq!(a.data(), b.data());
    }
}
