//! Bounded integer input with a description label.
//!
//! The value is always kept inside `[min, max]`. Every accepted change,
//! whether typed, stepped or set programmatically, is reported through the
//! `on_change` callback so the owner can observe edits uniformly.

use crate::callback::Callback;
use crate::event::{Event, Key, MouseButton};
use crate::layout::{Bounds, Point, Size};
use crate::renderer::{Color, Renderer};
use crate::text::TextMetrics;
use crate::widget::Widget;

const FONT_SIZE: f32 = 13.0;
const HEIGHT: f32 = 28.0;
/// Width reserved for the description label
const DESCRIPTION_WIDTH: f32 = 80.0;
/// Width of the increment/decrement arrows
const SPIN_WIDTH: f32 = 16.0;
const TEXT_PADDING: f32 = 6.0;
/// Amount the arrow keys and spin buttons change the value by.
const STEP: i64 = 1;

/// Number input widget
pub struct NumberInput<M> {
    description: String,
    value: i64,
    min: i64,
    max: i64,
    width: f32,
    visible: bool,
    /// Text being typed while focused
    editing: Option<String>,
    on_change: Callback<i64, M>,
}

impl<M> NumberInput<M> {
    /// Create an input for the range `[min, max]` starting at `min`.
    pub fn new(description: impl Into<String>, min: i64, max: i64) -> Self {
        let max = max.max(min);
        Self {
            description: description.into(),
            value: min,
            min,
            max,
            width: 240.0,
            visible: true,
            editing: None,
            on_change: Callback::none(),
        }
    }

    /// Initial value, clamped into range. Does not notify.
    pub fn value(mut self, value: i64) -> Self {
        self.value = value.clamp(self.min, self.max);
        self
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn on_change<F>(mut self, f: F) -> Self
    where
        F: Fn(i64) -> M + 'static,
    {
        self.on_change = Callback::new(f);
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn get(&self) -> i64 {
        self.value
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn is_focused(&self) -> bool {
        self.editing.is_some()
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Set the value, clamped into range.
    ///
    /// Returns the change notification when the stored value changed.
    pub fn set_value(&mut self, value: i64) -> Option<M> {
        let clamped = value.clamp(self.min, self.max);
        if clamped == self.value {
            return None;
        }
        log::trace!("{} {} -> {}", self.description, self.value, clamped);
        self.value = clamped;
        self.on_change.call(clamped)
    }

    fn text_bounds(&self, bounds: Bounds) -> Bounds {
        Bounds::new(
            bounds.x + DESCRIPTION_WIDTH,
            bounds.y,
            (bounds.width - DESCRIPTION_WIDTH).max(0.0),
            bounds.height,
        )
    }

    fn spin_bounds(&self, bounds: Bounds) -> Bounds {
        let field = self.text_bounds(bounds);
        Bounds::new(
            field.right() - SPIN_WIDTH,
            field.y,
            SPIN_WIDTH.min(field.width),
            field.height,
        )
    }

    /// Parse and apply the edit buffer, leaving edit mode.
    fn commit(&mut self) -> Option<M> {
        let text = self.editing.take()?;
        match text.trim().parse::<i64>() {
            Ok(value) => self.set_value(value),
            Err(_) => {
                log::debug!(
                    "Rejected non-integer input {:?} for {}",
                    text,
                    self.description
                );
                None
            }
        }
    }

    fn on_key(&mut self, key: Key) -> Option<M> {
        match key {
            Key::Enter | Key::Tab => self.commit(),
            Key::Escape => {
                self.editing = None;
                None
            }
            Key::Up => {
                self.editing = None;
                self.set_value(self.value.saturating_add(STEP))
            }
            Key::Down => {
                self.editing = None;
                self.set_value(self.value.saturating_sub(STEP))
            }
            Key::Backspace => {
                if let Some(text) = self.editing.as_mut() {
                    text.pop();
                }
                None
            }
            Key::Char(c) if c.is_ascii_digit() || c == '-' => {
                if let Some(text) = self.editing.as_mut() {
                    text.push(c);
                }
                None
            }
            _ => None,
        }
    }
}

impl<M> Widget<M> for NumberInput<M> {
    fn size(&self) -> Size {
        Size::new(self.width, HEIGHT)
    }

    fn draw(&self, renderer: &mut Renderer, bounds: Bounds) {
        let metrics = TextMetrics::new(FONT_SIZE);
        let text_top = bounds.y + (bounds.height - metrics.line_height()) / 2.0;

        let label_w = metrics.line_width(&self.description);
        renderer.draw_text(
            &self.description,
            Point::new(bounds.x + DESCRIPTION_WIDTH - TEXT_PADDING - label_w, text_top),
            FONT_SIZE,
            Color::TEXT,
        );

        let field = self.text_bounds(bounds);
        renderer.fill_rect(field, Color::WHITE);
        let border = if self.is_focused() {
            Color::ACCENT
        } else {
            Color::BORDER
        };
        renderer.stroke_rect(field, border, 1.0);

        let shown = match &self.editing {
            Some(text) => format!("{}|", text),
            None => self.value.to_string(),
        };
        renderer.with_clip(field, |r| {
            r.draw_text(
                &shown,
                Point::new(field.x + TEXT_PADDING, text_top),
                FONT_SIZE,
                Color::TEXT,
            );
        });

        let spin = self.spin_bounds(bounds);
        let mid = spin.y + spin.height / 2.0;
        let cx = spin.x + spin.width / 2.0;
        renderer.draw_line(Point::new(spin.x, spin.y), Point::new(spin.x, spin.bottom()), Color::BORDER, 1.0);
        renderer.draw_line(Point::new(cx - 3.0, mid - 3.0), Point::new(cx, mid - 6.0), Color::TEXT, 1.0);
        renderer.draw_line(Point::new(cx, mid - 6.0), Point::new(cx + 3.0, mid - 3.0), Color::TEXT, 1.0);
        renderer.draw_line(Point::new(cx - 3.0, mid + 3.0), Point::new(cx, mid + 6.0), Color::TEXT, 1.0);
        renderer.draw_line(Point::new(cx, mid + 6.0), Point::new(cx + 3.0, mid + 3.0), Color::TEXT, 1.0);
    }

    fn on_event(&mut self, event: &Event, bounds: Bounds) -> Vec<M> {
        let message = match event {
            Event::MousePressed {
                button: MouseButton::Left,
                position,
            } => {
                let spin = self.spin_bounds(bounds);
                if spin.contains(*position) {
                    let step = if position.y < spin.y + spin.height / 2.0 {
                        STEP
                    } else {
                        -STEP
                    };
                    self.editing = None;
                    self.set_value(self.value.saturating_add(step))
                } else if self.text_bounds(bounds).contains(*position) {
                    if self.editing.is_none() {
                        self.editing = Some(self.value.to_string());
                    }
                    None
                } else {
                    // Clicking elsewhere blurs the field
                    self.commit()
                }
            }
            Event::KeyPressed { key, .. } if self.is_focused() => self.on_key(*key),
            _ => None,
        };
        message.into_iter().collect()
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Create a bounded integer input
pub fn number_input<M>(description: impl Into<String>, min: i64, max: i64) -> NumberInput<M> {
    NumberInput::new(description, min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Modifiers;

    fn input() -> NumberInput<i64> {
        number_input("x", 0, 99).on_change(|v| v)
    }

    fn key(key: Key) -> Event {
        Event::KeyPressed {
            key,
            modifiers: Modifiers::default(),
        }
    }

    fn click(x: f32, y: f32) -> Event {
        Event::MousePressed {
            button: MouseButton::Left,
            position: Point::new(x, y),
        }
    }

    #[test]
    fn test_set_value_clamps_and_notifies() {
        let mut field = input();
        assert_eq!(field.set_value(150), Some(99));
        assert_eq!(field.get(), 99);
        assert_eq!(field.set_value(-4), Some(0));
        assert_eq!(field.set_value(0), None);
    }

    #[test]
    fn test_typed_value_commits_on_enter() {
        let mut field = input().value(3);
        let bounds = Bounds::from_size(field.size());
        field.on_event(&click(DESCRIPTION_WIDTH + 10.0, 10.0), bounds);
        assert!(field.is_focused());

        field.on_event(&key(Key::Backspace), bounds);
        field.on_event(&key(Key::Char('4')), bounds);
        field.on_event(&key(Key::Char('2')), bounds);
        let messages = field.on_event(&key(Key::Enter), bounds);

        assert_eq!(messages, vec![42]);
        assert!(!field.is_focused());
    }

    #[test]
    fn test_escape_discards_edit() {
        let mut field = input().value(3);
        let bounds = Bounds::from_size(field.size());
        field.on_event(&click(DESCRIPTION_WIDTH + 10.0, 10.0), bounds);
        field.on_event(&key(Key::Char('7')), bounds);
        assert!(field.on_event(&key(Key::Escape), bounds).is_empty());
        assert_eq!(field.get(), 3);
    }

    #[test]
    fn test_spin_arrows_step() {
        let mut field = input().value(10);
        let bounds = Bounds::from_size(field.size());
        let spin_x = bounds.width - SPIN_WIDTH / 2.0;
        assert_eq!(field.on_event(&click(spin_x, 2.0), bounds), vec![11]);
        assert_eq!(field.on_event(&click(spin_x, HEIGHT - 2.0), bounds), vec![10]);
    }
}
