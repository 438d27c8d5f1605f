//! Button widget

use crate::event::{Event, MouseButton};
use crate::layout::{Bounds, Padding, Point, Size};
use crate::renderer::{Color, Renderer};
use crate::text::TextMetrics;
use crate::widget::Widget;

const FONT_SIZE: f32 = 13.0;
const HEIGHT: f32 = 28.0;
const ICON_SIZE: u32 = 14;
const ICON_GAP: f32 = 6.0;

/// Button state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ButtonState {
    #[default]
    Normal,
    Hovered,
    Pressed,
}

/// Named SVG icon drawn in front of the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Icon {
    pub name: &'static str,
    pub svg: &'static str,
}

/// A clickable button widget
pub struct Button<M> {
    label: String,
    icon: Option<Icon>,
    on_click: Option<M>,
    width: Option<f32>,
    margin: Padding,
    disabled: bool,
    visible: bool,
    state: ButtonState,
}

impl<M: Clone> Button<M> {
    /// Create a new button with the given label
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            icon: None,
            on_click: None,
            width: None,
            margin: Padding::ZERO,
            disabled: false,
            visible: true,
            state: ButtonState::Normal,
        }
    }

    /// Set the click message
    pub fn on_click(mut self, message: M) -> Self {
        self.on_click = Some(message);
        self
    }

    pub fn icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Fixed width; without it the button shrinks to its label.
    pub fn width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn margin(mut self, margin: impl Into<Padding>) -> Self {
        self.margin = margin.into();
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        if disabled {
            self.state = ButtonState::Normal;
        }
        self.disabled = disabled;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Programmatic click. Disabled buttons produce nothing.
    pub fn click(&self) -> Option<M> {
        if self.disabled {
            log::debug!("Ignoring click on disabled button '{}'", self.label);
            return None;
        }
        self.on_click.clone()
    }

    fn content_width(&self) -> f32 {
        let text = TextMetrics::new(FONT_SIZE).line_width(&self.label);
        let icon = match self.icon {
            Some(_) => ICON_SIZE as f32 + ICON_GAP,
            None => 0.0,
        };
        text + icon + 16.0
    }

    fn background(&self) -> Color {
        match (self.disabled, self.state) {
            (true, _) => Color::BUTTON,
            (false, ButtonState::Normal) => Color::BUTTON,
            (false, ButtonState::Hovered) => Color::BUTTON_HOVER,
            (false, ButtonState::Pressed) => Color::BORDER,
        }
    }
}

impl<M: Clone> Widget<M> for Button<M> {
    fn size(&self) -> Size {
        let width = self.width.unwrap_or_else(|| self.content_width());
        Size::new(
            width + self.margin.horizontal(),
            HEIGHT + self.margin.vertical(),
        )
    }

    fn draw(&self, renderer: &mut Renderer, bounds: Bounds) {
        let frame = bounds.shrink(self.margin);
        renderer.fill_rect(frame, self.background());
        renderer.stroke_rect(frame, Color::BORDER, 1.0);

        let color = if self.disabled {
            Color::TEXT_DISABLED
        } else {
            Color::TEXT
        };
        let metrics = TextMetrics::new(FONT_SIZE);
        let (text_w, text_h) = metrics.measure(&self.label);
        let icon_w = match self.icon {
            Some(_) => ICON_SIZE as f32 + ICON_GAP,
            None => 0.0,
        };
        let left = frame.x + (frame.width - text_w - icon_w) / 2.0;
        if let Some(icon) = self.icon {
            let top = frame.y + (frame.height - ICON_SIZE as f32) / 2.0;
            renderer.draw_icon(icon.name, icon.svg, Point::new(left, top), ICON_SIZE, color);
        }
        let top = frame.y + (frame.height - text_h) / 2.0;
        renderer.draw_text(&self.label, Point::new(left + icon_w, top), FONT_SIZE, color);
    }

    fn on_event(&mut self, event: &Event, bounds: Bounds) -> Vec<M> {
        let frame = bounds.shrink(self.margin);
        if self.disabled {
            return Vec::new();
        }
        match event {
            Event::MouseMoved { position } => {
                let inside = frame.contains(*position);
                self.state = match (self.state, inside) {
                    (ButtonState::Pressed, _) => ButtonState::Pressed,
                    (_, true) => ButtonState::Hovered,
                    (_, false) => ButtonState::Normal,
                };
                Vec::new()
            }
            Event::MousePressed {
                button: MouseButton::Left,
                position,
            } if frame.contains(*position) => {
                self.state = ButtonState::Pressed;
                Vec::new()
            }
            Event::MouseReleased {
                button: MouseButton::Left,
                position,
            } => {
                let was_pressed = self.state == ButtonState::Pressed;
                let inside = frame.contains(*position);
                self.state = if inside {
                    ButtonState::Hovered
                } else {
                    ButtonState::Normal
                };
                if was_pressed && inside {
                    log::debug!("Button '{}' clicked", self.label);
                    self.on_click.clone().into_iter().collect()
                } else {
                    Vec::new()
                }
            }
            _ => Vec::new(),
        }
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Create a new button
pub fn button<M: Clone>(label: impl Into<String>) -> Button<M> {
    Button::new(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(x: f32, y: f32) -> Event {
        Event::MousePressed {
            button: MouseButton::Left,
            position: Point::new(x, y),
        }
    }

    fn release(x: f32, y: f32) -> Event {
        Event::MouseReleased {
            button: MouseButton::Left,
            position: Point::new(x, y),
        }
    }

    #[test]
    fn test_click_inside_emits_message() {
        let mut b = button("Draw").on_click(1u8).width(105.0);
        let bounds = Bounds::from_size(b.size());
        assert!(b.on_event(&press(10.0, 10.0), bounds).is_empty());
        assert_eq!(b.on_event(&release(12.0, 12.0), bounds), vec![1]);
    }

    #[test]
    fn test_release_outside_cancels() {
        let mut b = button("Draw").on_click(1u8).width(105.0);
        let bounds = Bounds::from_size(b.size());
        b.on_event(&press(10.0, 10.0), bounds);
        assert!(b.on_event(&release(200.0, 10.0), bounds).is_empty());
    }

    #[test]
    fn test_disabled_button_is_inert() {
        let mut b = button("Clear").on_click(2u8).disabled(true);
        let bounds = Bounds::from_size(b.size());
        b.on_event(&press(5.0, 5.0), bounds);
        assert!(b.on_event(&release(5.0, 5.0), bounds).is_empty());
        assert_eq!(b.click(), None);

        b.set_disabled(false);
        assert_eq!(b.click(), Some(2));
    }

    #[test]
    fn test_fixed_width_includes_margin() {
        let b = button::<()>("x").width(105.0).margin(Padding::new(0.0, 0.0, 30.0, 30.0));
        assert_eq!(b.size(), Size::new(135.0, 58.0));
    }
}
