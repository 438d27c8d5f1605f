//! Publishing rendered widgets.
//!
//! `display` rasterizes a widget and hands the frame to the display hook
//! installed on the current thread. Without a hook the call only logs, so
//! library code can always "show" itself.

use std::cell::RefCell;
use std::path::PathBuf;

use crate::error::{Result, UiError};
use crate::layout::Bounds;
use crate::renderer::{Color, Renderer};
use crate::widget::Widget;

/// A rendered frame in straight (non-premultiplied) RGBA8.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Frame {
    /// RGBA of the pixel at column `x`, row `y`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        Some([
            self.rgba[i],
            self.rgba[i + 1],
            self.rgba[i + 2],
            self.rgba[i + 3],
        ])
    }
}

/// Rasterize `widget` at its own size on a white background.
pub fn render<M>(widget: &dyn Widget<M>) -> Result<Frame> {
    let size = widget.size();
    let (width, height) = (size.width.ceil() as u32, size.height.ceil() as u32);
    let mut renderer = Renderer::new(width, height).ok_or(UiError::EmptyFrame)?;
    renderer.clear(Color::WHITE);
    if widget.is_visible() {
        widget.draw(&mut renderer, Bounds::from_size(size));
    }
    let pixmap = renderer.into_pixmap();
    let rgba = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    Ok(Frame {
        width,
        height,
        rgba,
    })
}

/// Receiver of displayed frames.
pub trait DisplayHook {
    fn show(&mut self, frame: &Frame) -> Result<()>;
}

thread_local! {
    static HOOK: RefCell<Option<Box<dyn DisplayHook>>> = RefCell::new(None);
}

/// Install `hook` for the current thread, returning the previous one.
pub fn set_display_hook(hook: Box<dyn DisplayHook>) -> Option<Box<dyn DisplayHook>> {
    HOOK.with(|slot| slot.borrow_mut().replace(hook))
}

/// Remove the current thread's hook.
pub fn take_display_hook() -> Option<Box<dyn DisplayHook>> {
    HOOK.with(|slot| slot.borrow_mut().take())
}

/// Render `widget` and publish it to the display hook.
pub fn display<M>(widget: &dyn Widget<M>) -> Result<()> {
    HOOK.with(|slot| {
        let mut slot = slot.borrow_mut();
        match slot.as_mut() {
            Some(hook) => {
                let frame = render(widget)?;
                log::debug!("Displaying {}x{} frame", frame.width, frame.height);
                hook.show(&frame)
            }
            None => {
                log::debug!("No display hook installed; nothing shown");
                Ok(())
            }
        }
    })
}

/// Writes every displayed frame to a PNG file.
///
/// The first frame goes to `path`; later ones get a numeric suffix
/// (`roi-1.png`, `roi-2.png`, ...).
#[derive(Debug, Clone)]
pub struct PngSnapshot {
    path: PathBuf,
    count: usize,
}

impl PngSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            count: 0,
        }
    }

    fn next_path(&self) -> PathBuf {
        if self.count == 0 {
            return self.path.clone();
        }
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "frame".to_string());
        self.path.with_file_name(format!("{}-{}.png", stem, self.count))
    }
}

impl DisplayHook for PngSnapshot {
    fn show(&mut self, frame: &Frame) -> Result<()> {
        let path = self.next_path();
        image::save_buffer(
            &path,
            &frame.rgba,
            frame.width,
            frame.height,
            image::ExtendedColorType::Rgba8,
        )?;
        log::info!("Wrote snapshot {}", path.display());
        self.count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Size;
    use std::rc::Rc;

    struct RedSquare;

    impl Widget<()> for RedSquare {
        fn size(&self) -> Size {
            Size::new(4.0, 3.0)
        }

        fn draw(&self, renderer: &mut Renderer, bounds: Bounds) {
            renderer.fill_rect(bounds, Color::RED);
        }
    }

    struct Collect(Rc<RefCell<Vec<Frame>>>);

    impl DisplayHook for Collect {
        fn show(&mut self, frame: &Frame) -> Result<()> {
            self.0.borrow_mut().push(frame.clone());
            Ok(())
        }
    }

    #[test]
    fn test_render_produces_straight_rgba() {
        let frame = render(&RedSquare).unwrap();
        assert_eq!((frame.width, frame.height), (4, 3));
        assert_eq!(frame.pixel(1, 1), Some([255, 0, 0, 255]));
        assert_eq!(frame.pixel(4, 0), None);
    }

    #[test]
    fn test_display_without_hook_is_noop() {
        take_display_hook();
        assert!(display(&RedSquare).is_ok());
    }

    #[test]
    fn test_display_publishes_to_hook() {
        let frames = Rc::new(RefCell::new(Vec::new()));
        set_display_hook(Box::new(Collect(frames.clone())));
        display(&RedSquare).unwrap();
        display(&RedSquare).unwrap();
        take_display_hook();
        assert_eq!(frames.borrow().len(), 2);
    }

    #[test]
    fn test_snapshot_paths_are_numbered() {
        let mut snap = PngSnapshot::new("/tmp/roi.png");
        assert_eq!(snap.next_path(), PathBuf::from("/tmp/roi.png"));
        snap.count = 2;
        assert_eq!(snap.next_path(), PathBuf::from("/tmp/roi-2.png"));
    }
}
