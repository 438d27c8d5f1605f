//! Layout and behavior defaults.

/// Minimum selection span, in canvas pixels, and the smallest box size.
pub const DEFAULT_MINSPAN: i64 = 5;

/// Selector figure size in inches (width, height).
pub const SELECTOR_FIGSIZE: (f32, f32) = (7.0, 5.0);

/// Cropped preview figure size in inches (width, height).
pub const DISPLAY_FIGSIZE: (f32, f32) = (3.0, 3.0);

/// Width of the Draw and Clear buttons.
pub const BUTTON_WIDTH: f32 = 105.0;

/// Width of each bounding box field.
pub const INPUT_WIDTH: f32 = 240.0;

/// Sidebar margin (top, right, bottom, left).
pub const SIDEBAR_MARGIN: (f32, f32, f32, f32) = (5.0, 0.0, 0.0, 0.0);

/// Margin around the button row (top, right, bottom, left).
pub const BUTTONS_MARGIN: (f32, f32, f32, f32) = (0.0, 0.0, 30.0, 30.0);

/// Gap between the Draw and Clear buttons.
pub const BUTTON_SPACING: f32 = 4.0;

/// Window title.
pub const WINDOW_TITLE: &str = "ROI Select";
