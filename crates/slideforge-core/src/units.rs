//! Length units and the conversions between them.
//!
//! Three units coexist:
//! - EMU, the wire format's large-integer unit (12700 per point),
//! - points, the renderer's working unit,
//! - device pixels, used by the screen.
//!
//! Every conversion in the workspace goes through this module. The functions
//! are total: they never reject or clamp their input. Call sites clamp when
//! they need a bounded result.

use serde::{Deserialize, Serialize};

/// EMU per point.
pub const EMU_PER_POINT: f64 = 12_700.0;
/// EMU per inch (72 points).
pub const EMU_PER_INCH: f64 = 914_400.0;
/// Device pixels per point at 96 DPI.
pub const PIXELS_PER_POINT: f64 = 96.0 / 72.0;

/// Convert EMU to points.
pub fn emu_to_point(emu: f64) -> f64 {
    emu / EMU_PER_POINT
}

/// Convert points to EMU.
pub fn point_to_emu(pt: f64) -> f64 {
    pt * EMU_PER_POINT
}

/// Convert points to device pixels.
pub fn point_to_pixel(pt: f64) -> f64 {
    pt * PIXELS_PER_POINT
}

/// Convert device pixels to points.
pub fn pixel_to_point(px: f64) -> f64 {
    px / PIXELS_PER_POINT
}

/// Unit tag carried by dimensions and transforms on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    #[serde(rename = "EMU", alias = "UNIT_UNSPECIFIED")]
    Emu,
    #[serde(rename = "PT")]
    Pt,
}

impl Unit {
    /// Convert a magnitude in this unit to points.
    pub fn to_points(self, magnitude: f64) -> f64 {
        match self {
            Unit::Emu => emu_to_point(magnitude),
            Unit::Pt => magnitude,
        }
    }

    /// Convert a magnitude in points to this unit.
    pub fn from_points(self, pt: f64) -> f64 {
        match self {
            Unit::Emu => point_to_emu(pt),
            Unit::Pt => pt,
        }
    }
}

/// A length with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimension {
    #[serde(default)]
    pub magnitude: f64,
    #[serde(default)]
    pub unit: Unit,
}

impl Dimension {
    pub fn new(magnitude: f64, unit: Unit) -> Self {
        Self { magnitude, unit }
    }

    pub fn emu(magnitude: f64) -> Self {
        Self::new(magnitude, Unit::Emu)
    }

    pub fn pt(magnitude: f64) -> Self {
        Self::new(magnitude, Unit::Pt)
    }

    /// Length in points.
    pub fn to_points(self) -> f64 {
        self.unit.to_points(self.magnitude)
    }

    /// Length in device pixels (before zoom).
    pub fn to_pixels(self) -> f64 {
        point_to_pixel(self.to_points())
    }
}
