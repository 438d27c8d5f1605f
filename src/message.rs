//! Application messages.

use roi_ui::widgets::DataPoint;

/// One of the four bounding box fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BBoxField {
    X,
    Y,
    Width,
    Height,
}

impl BBoxField {
    pub const ALL: [BBoxField; 4] = [
        BBoxField::X,
        BBoxField::Y,
        BBoxField::Width,
        BBoxField::Height,
    ];

    /// Label shown next to the field.
    pub fn name(self) -> &'static str {
        match self {
            BBoxField::X => "x",
            BBoxField::Y => "y",
            BBoxField::Width => "width",
            BBoxField::Height => "height",
        }
    }
}

/// Messages produced by the selector's widgets.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Draw button clicked
    Draw,
    /// Clear button clicked
    Clear,
    /// A drag on the image completed
    Selected { click: DataPoint, release: DataPoint },
    /// A bounding box field changed value
    RegionEdited(BBoxField, i64),
}
