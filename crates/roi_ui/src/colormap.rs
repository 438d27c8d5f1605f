//! Scalar-to-color mapping for single-channel images.

use serde::{Deserialize, Serialize};

/// Linear normalization of data values into 0.0..=1.0 with clipping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalize {
    pub vmin: f64,
    pub vmax: f64,
}

impl Normalize {
    /// The fixed 8-bit display range used by every image plot.
    pub const EIGHT_BIT: Normalize = Normalize {
        vmin: 0.0,
        vmax: 255.0,
    };

    pub fn new(vmin: f64, vmax: f64) -> Self {
        Self { vmin, vmax }
    }

    pub fn apply(&self, value: f64) -> f64 {
        let span = self.vmax - self.vmin;
        if span <= 0.0 || value.is_nan() {
            return 0.0;
        }
        ((value - self.vmin) / span).clamp(0.0, 1.0)
    }

    /// Normalize and quantize to a byte.
    pub fn to_u8(&self, value: f64) -> u8 {
        (self.apply(value) * 255.0).round() as u8
    }
}

impl Default for Normalize {
    fn default() -> Self {
        Self::EIGHT_BIT
    }
}

/// Colormaps available for single-channel images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    #[default]
    Viridis,
    Gray,
}

/// Viridis sampled at nine evenly spaced stops.
const VIRIDIS: [[u8; 3]; 9] = [
    [68, 1, 84],
    [71, 44, 122],
    [59, 81, 139],
    [44, 113, 142],
    [33, 144, 141],
    [39, 173, 129],
    [92, 200, 99],
    [170, 220, 50],
    [253, 231, 37],
];

impl Colormap {
    /// Map a normalized value (0.0..=1.0) to RGB.
    pub fn map(&self, t: f64) -> [u8; 3] {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Colormap::Gray => {
                let v = (t * 255.0).round() as u8;
                [v, v, v]
            }
            Colormap::Viridis => {
                let scaled = t * (VIRIDIS.len() - 1) as f64;
                let i = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
                let frac = scaled - i as f64;
                let (a, b) = (VIRIDIS[i], VIRIDIS[i + 1]);
                let lerp = |k: usize| {
                    (f64::from(a[k]) + (f64::from(b[k]) - f64::from(a[k])) * frac).round() as u8
                };
                [lerp(0), lerp(1), lerp(2)]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_clips() {
        let n = Normalize::EIGHT_BIT;
        assert_eq!(n.apply(-10.0), 0.0);
        assert_eq!(n.apply(1000.0), 1.0);
        assert_eq!(n.to_u8(128.0), 128);
    }

    #[test]
    fn test_normalize_degenerate_range() {
        assert_eq!(Normalize::new(5.0, 5.0).apply(7.0), 0.0);
    }

    #[test]
    fn test_viridis_endpoints() {
        assert_eq!(Colormap::Viridis.map(0.0), [68, 1, 84]);
        assert_eq!(Colormap::Viridis.map(1.0), [253, 231, 37]);
        assert_eq!(Colormap::Viridis.map(0.5), [33, 144, 141]);
    }

    #[test]
    fn test_gray() {
        assert_eq!(Colormap::Gray.map(0.0), [0, 0, 0]);
        assert_eq!(Colormap::Gray.map(1.0), [255, 255, 255]);
    }
}
