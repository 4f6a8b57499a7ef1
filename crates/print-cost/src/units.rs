//! Length units and millimeter-normalized sizes
//!
//! Catalog sizes may be stated in any supported unit; all geometry runs on
//! [`Size`], which is always in millimeters.

use crate::constants::{MM_PER_CM, MM_PER_INCH, MM_PER_POINT, MM2_PER_M2};
use crate::types::*;
use std::fmt;
use std::str::FromStr;

/// Unit a catalog or job dimension is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LengthUnit {
    #[default]
    Mm,
    Cm,
    In,
    Pt,
}

impl LengthUnit {
    pub fn name(self) -> &'static str {
        match self {
            LengthUnit::Mm => "mm",
            LengthUnit::Cm => "cm",
            LengthUnit::In => "in",
            LengthUnit::Pt => "pt",
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LengthUnit {
    type Err = CostError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mm" | "millimeter" | "millimeters" => Ok(LengthUnit::Mm),
            "cm" | "centimeter" | "centimeters" => Ok(LengthUnit::Cm),
            "in" | "inch" | "inches" => Ok(LengthUnit::In),
            "pt" | "point" | "points" => Ok(LengthUnit::Pt),
            other => Err(CostError::Config(format!("Unknown length unit: {}", other))),
        }
    }
}

/// Convert a length to millimeters
#[inline]
pub fn to_millimeters(value: f64, unit: LengthUnit) -> f64 {
    match unit {
        LengthUnit::Mm => value,
        LengthUnit::Cm => value * MM_PER_CM,
        LengthUnit::In => value * MM_PER_INCH,
        LengthUnit::Pt => value * MM_PER_POINT,
    }
}

/// A width/height pair in some unit, as supplied by the caller
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dimension {
    pub width: f64,
    pub height: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub unit: LengthUnit,
}

impl Dimension {
    pub fn new(width: f64, height: f64, unit: LengthUnit) -> Self {
        Self {
            width,
            height,
            unit,
        }
    }

    /// Dimension already in millimeters
    pub fn mm(width: f64, height: f64) -> Self {
        Self::new(width, height, LengthUnit::Mm)
    }

    /// Normalize to millimeters, rejecting non-positive or non-finite sides.
    ///
    /// The check runs on the converted values, so a side that only overflows
    /// once scaled to millimeters is rejected too. `context` names the entity
    /// for the error message (e.g. "print sheet 'SRA3'").
    pub fn to_size(&self, context: &str) -> Result<Size> {
        let size = Size::new(
            to_millimeters(self.width, self.unit),
            to_millimeters(self.height, self.unit),
        );
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(size.width_mm) || !valid(size.height_mm) {
            return Err(CostError::InvalidDimension {
                context: context.to_string(),
                width: self.width,
                height: self.height,
            });
        }
        Ok(size)
    }
}

/// A validated rectangle in millimeters
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl Size {
    pub fn new(width_mm: f64, height_mm: f64) -> Self {
        Self {
            width_mm,
            height_mm,
        }
    }

    /// The same rectangle turned 90°
    pub fn rotated(self) -> Self {
        Self::new(self.height_mm, self.width_mm)
    }

    /// Shrink by `margin_mm` on every side (may go non-positive)
    pub fn inset(self, margin_mm: f64) -> Self {
        Self::new(
            self.width_mm - 2.0 * margin_mm,
            self.height_mm - 2.0 * margin_mm,
        )
    }

    pub fn long_edge_mm(self) -> f64 {
        self.width_mm.max(self.height_mm)
    }

    pub fn short_edge_mm(self) -> f64 {
        self.width_mm.min(self.height_mm)
    }

    pub fn perimeter_mm(self) -> f64 {
        2.0 * (self.width_mm + self.height_mm)
    }

    pub fn area_mm2(self) -> f64 {
        self.width_mm * self.height_mm
    }

    pub fn area_m2(self) -> f64 {
        self.area_mm2() / MM2_PER_M2
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} x {:.1} mm", self.width_mm, self.height_mm)
    }
}
