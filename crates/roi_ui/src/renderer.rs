//! Software renderer drawing into a tiny-skia pixmap.

use tiny_skia::{
    FillRule, FilterQuality, Mask, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke,
    Transform,
};

use crate::layout::{Bounds, Point};
use crate::{icon, text};

/// RGBA color with components in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 0.5, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);

    /// Widget chrome, close to the notebook widget defaults.
    pub const BORDER: Color = Color::rgb(0.62, 0.62, 0.62);
    pub const BUTTON: Color = Color::rgb(0.93, 0.93, 0.93);
    pub const BUTTON_HOVER: Color = Color::rgb(0.87, 0.87, 0.87);
    pub const TEXT: Color = Color::rgb(0.13, 0.13, 0.13);
    pub const TEXT_DISABLED: Color = Color::rgb(0.6, 0.6, 0.6);
    pub const ACCENT: Color = Color::rgb(0.26, 0.55, 0.85);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }

    /// Parse a plot-style color: single letters (`"r"`, `"k"`), basic names
    /// (`"red"`) or `#rrggbb` / `#rrggbbaa` hex strings.
    pub fn parse(spec: &str) -> Option<Color> {
        let spec = spec.trim();
        if let Some(hex) = spec.strip_prefix('#') {
            return Self::parse_hex(hex);
        }
        let color = match spec.to_ascii_lowercase().as_str() {
            "r" | "red" => Color::RED,
            "g" | "green" => Color::GREEN,
            "b" | "blue" => Color::BLUE,
            "k" | "black" => Color::BLACK,
            "w" | "white" => Color::WHITE,
            "c" | "cyan" => Color::rgb(0.0, 0.75, 0.75),
            "m" | "magenta" => Color::rgb(0.75, 0.0, 0.75),
            "y" | "yellow" => Color::rgb(0.75, 0.75, 0.0),
            _ => return None,
        };
        Some(color)
    }

    fn parse_hex(hex: &str) -> Option<Color> {
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        let alpha = if hex.len() == 8 { byte(6)? } else { 255 };
        Some(Color::from_rgba8(byte(0)?, byte(2)?, byte(4)?, alpha))
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    fn to_skia(self) -> tiny_skia::Color {
        let [r, g, b, a] = self.to_rgba8();
        tiny_skia::Color::from_rgba8(r, g, b, a)
    }
}

fn paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.to_skia());
    paint.anti_alias = true;
    paint
}

fn rect(bounds: Bounds) -> Option<Rect> {
    Rect::from_xywh(bounds.x, bounds.y, bounds.width, bounds.height)
}

/// Immediate-mode drawing surface.
///
/// Widgets draw themselves in layout pixels; the renderer owns the target
/// pixmap and an optional clip region.
pub struct Renderer {
    pixmap: Pixmap,
    clip: Option<Mask>,
}

impl Renderer {
    /// Create a renderer for a `width` x `height` frame.
    ///
    /// Returns `None` when either dimension is zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Some(Self {
            pixmap: Pixmap::new(width, height)?,
            clip: None,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    /// Fill the whole frame, ignoring the clip.
    pub fn clear(&mut self, color: Color) {
        self.pixmap.fill(color.to_skia());
    }

    /// Run `f` with drawing restricted to `bounds`.
    pub fn with_clip<R>(&mut self, bounds: Bounds, f: impl FnOnce(&mut Renderer) -> R) -> R {
        let mask = rect(bounds).and_then(|r| {
            let mut mask = Mask::new(self.pixmap.width(), self.pixmap.height())?;
            mask.fill_path(
                &PathBuilder::from_rect(r),
                FillRule::Winding,
                false,
                Transform::identity(),
            );
            Some(mask)
        });
        let previous = std::mem::replace(&mut self.clip, mask);
        let result = f(self);
        self.clip = previous;
        result
    }

    pub fn fill_rect(&mut self, bounds: Bounds, color: Color) {
        if let Some(r) = rect(bounds) {
            self.pixmap
                .fill_rect(r, &paint(color), Transform::identity(), self.clip.as_ref());
        }
    }

    /// Stroke the outline of `bounds`, centered on its edges.
    pub fn stroke_rect(&mut self, bounds: Bounds, color: Color, width: f32) {
        let Some(r) = rect(bounds) else {
            return;
        };
        let path = PathBuilder::from_rect(r);
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        self.pixmap.stroke_path(
            &path,
            &paint(color),
            &stroke,
            Transform::identity(),
            self.clip.as_ref(),
        );
    }

    pub fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f32) {
        let mut pb = PathBuilder::new();
        pb.move_to(from.x, from.y);
        pb.line_to(to.x, to.y);
        let Some(path) = pb.finish() else {
            return;
        };
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        self.pixmap.stroke_path(
            &path,
            &paint(color),
            &stroke,
            Transform::identity(),
            self.clip.as_ref(),
        );
    }

    /// Draw `image` scaled to cover `bounds` without interpolation.
    pub fn draw_pixmap(&mut self, image: &Pixmap, bounds: Bounds) {
        if image.width() == 0 || image.height() == 0 {
            return;
        }
        let sx = bounds.width / image.width() as f32;
        let sy = bounds.height / image.height() as f32;
        let paint = PixmapPaint {
            quality: FilterQuality::Nearest,
            ..PixmapPaint::default()
        };
        self.pixmap.draw_pixmap(
            0,
            0,
            image.as_ref(),
            &paint,
            Transform::from_row(sx, 0.0, 0.0, sy, bounds.x, bounds.y),
            self.clip.as_ref(),
        );
    }

    /// Draw a single line of text with its top-left corner at `position`.
    pub fn draw_text(&mut self, content: &str, position: Point, size: f32, color: Color) {
        if let Some(rendered) = text::rasterize(content, size, color) {
            self.blit(&rendered, position);
        }
    }

    /// Draw text centered in `bounds`.
    pub fn draw_text_centered(&mut self, content: &str, bounds: Bounds, size: f32, color: Color) {
        let (w, h) = text::TextMetrics::new(size).measure(content);
        let position = Point::new(
            bounds.x + (bounds.width - w) / 2.0,
            bounds.y + (bounds.height - h) / 2.0,
        );
        self.draw_text(content, position, size, color);
    }

    /// Draw an SVG icon into a square at `position`.
    pub fn draw_icon(&mut self, name: &str, svg: &str, position: Point, size: u32, color: Color) {
        if let Some(rendered) = icon::get_icon(name, svg, size, color) {
            self.blit(&rendered, position);
        }
    }

    fn blit(&mut self, image: &Pixmap, position: Point) {
        self.pixmap.draw_pixmap(
            position.x.round() as i32,
            position.y.round() as i32,
            image.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            self.clip.as_ref(),
        );
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(renderer: &Renderer, x: u32, y: u32) -> [u8; 4] {
        let p = renderer.pixmap().pixel(x, y).unwrap();
        [p.red(), p.green(), p.blue(), p.alpha()]
    }

    #[test]
    fn test_parse_colors() {
        assert_eq!(Color::parse("r"), Some(Color::RED));
        assert_eq!(Color::parse("Red"), Some(Color::RED));
        assert_eq!(Color::parse("#00ff00").map(Color::to_rgba8), Some([0, 255, 0, 255]));
        assert_eq!(Color::parse("#0000ff80").map(Color::to_rgba8), Some([0, 0, 255, 128]));
        assert_eq!(Color::parse("chartreuse"), None);
        assert_eq!(Color::parse("#12"), None);
    }

    #[test]
    fn test_zero_size_renderer() {
        assert!(Renderer::new(0, 10).is_none());
    }

    #[test]
    fn test_fill_rect_respects_clip() {
        let mut r = Renderer::new(20, 20).unwrap();
        r.clear(Color::WHITE);
        r.with_clip(Bounds::new(0.0, 0.0, 10.0, 20.0), |r| {
            r.fill_rect(Bounds::new(0.0, 0.0, 20.0, 20.0), Color::RED);
        });
        assert_eq!(pixel(&r, 5, 5), [255, 0, 0, 255]);
        assert_eq!(pixel(&r, 15, 5), [255, 255, 255, 255]);
    }

    #[test]
    fn test_draw_pixmap_scales_nearest() {
        let mut src = Pixmap::new(2, 1).unwrap();
        src.pixels_mut()[0] = tiny_skia::ColorU8::from_rgba(255, 0, 0, 255).premultiply();
        src.pixels_mut()[1] = tiny_skia::ColorU8::from_rgba(0, 0, 255, 255).premultiply();

        let mut r = Renderer::new(8, 4).unwrap();
        r.draw_pixmap(&src, Bounds::new(0.0, 0.0, 8.0, 4.0));
        assert_eq!(pixel(&r, 1, 2), [255, 0, 0, 255]);
        assert_eq!(pixel(&r, 6, 2), [0, 0, 255, 255]);
    }
}
