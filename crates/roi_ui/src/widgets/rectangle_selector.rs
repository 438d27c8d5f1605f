//! Rubber-band rectangle selection on an axes.
//!
//! A left press inside the axes starts a drag, motion updates the live
//! rectangle and release completes it. Completed selections are reported as
//! a `(click, release)` pair of data points through `on_select`. With
//! `interactive` set, pressing inside the visible rectangle moves it
//! instead of starting a new one.

use crate::callback::Callback;
use crate::event::{Event, MouseButton};
use crate::layout::{Bounds, Point};
use crate::renderer::{Color, Renderer};
use crate::widgets::figure::{AxesTransform, DataPoint, PatchStyle};

/// Side of the square corner handles, in layout pixels
const HANDLE_SIZE: f32 = 6.0;

/// Selection rectangle in data coordinates, `min <= max` on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extents {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Extents {
    /// Extents spanned by two corners, in any order.
    pub fn from_corners(a: DataPoint, b: DataPoint) -> Self {
        Self {
            xmin: a.x.min(b.x),
            xmax: a.x.max(b.x),
            ymin: a.y.min(b.y),
            ymax: a.y.max(b.y),
        }
    }

    pub fn min_corner(&self) -> DataPoint {
        DataPoint::new(self.xmin, self.ymin)
    }

    pub fn max_corner(&self) -> DataPoint {
        DataPoint::new(self.xmax, self.ymax)
    }

    pub fn contains(&self, point: DataPoint) -> bool {
        (self.xmin..=self.xmax).contains(&point.x) && (self.ymin..=self.ymax).contains(&point.y)
    }

    fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            xmin: self.xmin + dx,
            xmax: self.xmax + dx,
            ymin: self.ymin + dy,
            ymax: self.ymax + dy,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Drag {
    /// Drawing a new rectangle from `origin`
    New { origin: DataPoint },
    /// Moving the existing rectangle grabbed at `grab`
    Move { grab: DataPoint, original: Extents },
}

/// Rectangle selector state attached to a figure canvas.
pub struct RectangleSelector<M> {
    on_select: Callback<(DataPoint, DataPoint), M>,
    /// Minimum span on each axis, in layout pixels
    minspan: f32,
    style: PatchStyle,
    interactive: bool,
    active: bool,
    visible: bool,
    extents: Option<Extents>,
    drag: Option<Drag>,
}

impl<M> RectangleSelector<M> {
    pub fn new<F>(on_select: F) -> Self
    where
        F: Fn((DataPoint, DataPoint)) -> M + 'static,
    {
        Self {
            on_select: Callback::new(on_select),
            minspan: 0.0,
            style: PatchStyle {
                linewidth: 1.2,
                edgecolor: Some(Color::RED),
                facecolor: None,
            },
            interactive: false,
            active: true,
            visible: true,
            extents: None,
            drag: None,
        }
    }

    pub fn minspan(mut self, minspan: f32) -> Self {
        self.minspan = minspan;
        self
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Inactive selectors ignore pointer input; an ongoing drag is dropped.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        if !active {
            self.drag = None;
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn extents(&self) -> Option<Extents> {
        self.extents
    }

    pub fn set_extents(&mut self, extents: Extents) {
        self.extents = Some(extents);
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Handle a pointer event for axes placed with `transform`.
    pub fn on_event(&mut self, event: &Event, transform: &AxesTransform) -> Option<M> {
        if !self.active {
            return None;
        }
        match event {
            Event::MousePressed {
                button: MouseButton::Left,
                position,
            } => {
                self.press(*position, transform);
                None
            }
            Event::MouseMoved { position } => {
                self.motion(*position, transform);
                None
            }
            Event::MouseReleased {
                button: MouseButton::Left,
                position,
            } => self.release(*position, transform),
            _ => None,
        }
    }

    fn press(&mut self, position: Point, transform: &AxesTransform) {
        if !transform.area.contains(position) {
            return;
        }
        let point = transform.clip(transform.to_data(position));
        let grabbed = match self.extents {
            Some(extents) if self.interactive && self.visible && extents.contains(point) => {
                Some(extents)
            }
            _ => None,
        };
        self.drag = Some(match grabbed {
            Some(original) => Drag::Move {
                grab: point,
                original,
            },
            None => {
                self.extents = Some(Extents::from_corners(point, point));
                Drag::New { origin: point }
            }
        });
        self.visible = true;
    }

    fn motion(&mut self, position: Point, transform: &AxesTransform) {
        let Some(drag) = self.drag else {
            return;
        };
        let point = transform.clip(transform.to_data(position));
        self.extents = Some(match drag {
            Drag::New { origin } => Extents::from_corners(origin, point),
            Drag::Move { grab, original } => {
                original.translated(point.x - grab.x, point.y - grab.y)
            }
        });
    }

    fn release(&mut self, position: Point, transform: &AxesTransform) -> Option<M> {
        if self.drag.is_none() {
            return None;
        }
        self.motion(position, transform);
        self.drag = None;
        let extents = self.extents?;

        let span = transform.rect_to_display(extents.min_corner(), extents.max_corner());
        if span.width < self.minspan || span.height < self.minspan {
            log::trace!(
                "Ignoring selection of {:.1}x{:.1} px (minspan {})",
                span.width,
                span.height,
                self.minspan
            );
            self.extents = None;
            self.visible = false;
            return None;
        }
        log::debug!(
            "Selected x {:.2}..{:.2}, y {:.2}..{:.2}",
            extents.xmin,
            extents.xmax,
            extents.ymin,
            extents.ymax
        );
        self.on_select
            .call((extents.min_corner(), extents.max_corner()))
    }

    /// Draw the rubber band, if any, for axes placed with `transform`.
    pub fn draw(&self, renderer: &mut Renderer, transform: &AxesTransform, dpi: f32) {
        if !self.visible {
            return;
        }
        let Some(extents) = self.extents else {
            return;
        };
        let rect = transform.rect_to_display(extents.min_corner(), extents.max_corner());
        if let Some(face) = self.style.facecolor {
            renderer.fill_rect(rect, face);
        }
        let edge = self.style.edgecolor.unwrap_or(Color::RED);
        renderer.stroke_rect(rect, edge, self.style.linewidth_px(dpi));

        if self.interactive && self.drag.is_none() {
            for (x, y) in [
                (rect.x, rect.y),
                (rect.right(), rect.y),
                (rect.x, rect.bottom()),
                (rect.right(), rect.bottom()),
            ] {
                let half = HANDLE_SIZE / 2.0;
                renderer.fill_rect(Bounds::new(x - half, y - half, HANDLE_SIZE, HANDLE_SIZE), edge);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 100x100 data units shown at 2 px per unit.
    fn transform() -> AxesTransform {
        AxesTransform {
            area: Bounds::new(0.0, 0.0, 200.0, 200.0),
            xlim: (-0.5, 99.5),
            ylim: (-0.5, 99.5),
        }
    }

    fn at(x: f64, y: f64) -> Point {
        transform().to_display(DataPoint::new(x, y))
    }

    type Pair = (DataPoint, DataPoint);

    fn drag(sel: &mut RectangleSelector<Pair>, from: Point, to: Point) -> Option<Pair> {
        let t = transform();
        sel.on_event(
            &Event::MousePressed {
                button: MouseButton::Left,
                position: from,
            },
            &t,
        );
        sel.on_event(&Event::MouseMoved { position: to }, &t);
        sel.on_event(
            &Event::MouseReleased {
                button: MouseButton::Left,
                position: to,
            },
            &t,
        )
    }

    fn selector() -> RectangleSelector<Pair> {
        RectangleSelector::new(|pair| pair).minspan(5.0).interactive(true)
    }

    #[test]
    fn test_drag_reports_sorted_corners() {
        let mut sel = selector();
        let (click, release) = drag(&mut sel, at(40.0, 30.0), at(10.0, 10.0)).unwrap();
        assert!((click.x - 10.0).abs() < 1e-3 && (click.y - 10.0).abs() < 1e-3);
        assert!((release.x - 40.0).abs() < 1e-3 && (release.y - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_dragging_between_press_and_release() {
        let mut sel = selector();
        let t = transform();
        sel.on_event(
            &Event::MousePressed {
                button: MouseButton::Left,
                position: at(10.0, 10.0),
            },
            &t,
        );
        assert!(sel.is_dragging());
        sel.on_event(
            &Event::MouseReleased {
                button: MouseButton::Left,
                position: at(50.0, 50.0),
            },
            &t,
        );
        assert!(!sel.is_dragging());
    }

    #[test]
    fn test_small_drag_is_discarded() {
        let mut sel = selector();
        assert!(drag(&mut sel, at(10.0, 10.0), at(11.0, 40.0)).is_none());
        assert!(sel.extents().is_none());
        assert!(!sel.is_visible());
    }

    #[test]
    fn test_release_outside_is_clipped() {
        let mut sel = selector();
        let (_, release) = drag(&mut sel, at(50.0, 50.0), Point::new(500.0, 500.0)).unwrap();
        assert_eq!(release, DataPoint::new(99.5, 99.5));
    }

    #[test]
    fn test_press_outside_axes_is_ignored() {
        let mut sel = selector();
        assert!(drag(&mut sel, Point::new(-10.0, 5.0), at(50.0, 50.0)).is_none());
        assert!(sel.extents().is_none());
    }

    #[test]
    fn test_interactive_move() {
        let mut sel = selector();
        drag(&mut sel, at(10.0, 10.0), at(40.0, 30.0)).unwrap();
        let (click, release) = drag(&mut sel, at(20.0, 20.0), at(25.0, 20.0)).unwrap();
        assert!((click.x - 15.0).abs() < 1e-3 && (click.y - 10.0).abs() < 1e-3);
        assert!((release.x - 45.0).abs() < 1e-3 && (release.y - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_hidden_selection_is_redrawn_not_moved() {
        let mut sel = selector();
        drag(&mut sel, at(10.0, 10.0), at(40.0, 30.0)).unwrap();
        sel.set_visible(false);
        let (click, _) = drag(&mut sel, at(20.0, 20.0), at(60.0, 60.0)).unwrap();
        assert!((click.x - 20.0).abs() < 1e-3);
        assert!(sel.is_visible());
    }

    #[test]
    fn test_inactive_selector_ignores_input() {
        let mut sel = selector();
        sel.set_active(false);
        assert!(drag(&mut sel, at(10.0, 10.0), at(40.0, 30.0)).is_none());
        assert!(sel.extents().is_none());
    }
}
