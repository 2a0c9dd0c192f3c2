//! Value-to-color mapping over a renderer's discrete ramp.
//!
//! A [`ColorRamp`] is built once per visualized variable from the renderer's
//! ramp segments and statistic range, then answers `color_for` queries with a
//! clamped piecewise-linear walk over the deduplicated stop colors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Linear blend toward `other` by fraction `t` in `[0, 1]`.
    pub fn blend(&self, other: &Rgba, t: f64) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgba {
            r: lerp(self.r, other.r),
            g: lerp(self.g, other.g),
            b: lerp(self.b, other.b),
            a: lerp(self.a, other.a),
        }
    }

    /// CSS-style hex form, `#RRGGBBAA`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

/// One segment of a renderer's color ramp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RampSegment {
    pub from: Rgba,
    pub to: Rgba,
}

#[derive(Debug, Error)]
pub enum ColorRampError {
    /// Fewer than two distinct stop colors were collected.
    #[error("color ramp needs at least two distinct colors, got {0}")]
    TooFewColors(usize),

    /// The statistic range is empty or inverted.
    #[error("invalid statistic range [{0}, {1}]")]
    InvalidRange(f64, f64),
}

/// An ordered, deduplicated color list plus the `[min, max]` statistic range
/// of the variable it renders.
#[derive(Debug, Clone)]
pub struct ColorRamp {
    colors: Vec<Rgba>,
    min: f64,
    max: f64,
}

impl ColorRamp {
    /// Collect the distinct segment endpoint colors, in first-appearance
    /// order, and capture the variable's statistic range.
    pub fn from_segments(
        segments: &[RampSegment],
        min: f64,
        max: f64,
    ) -> Result<Self, ColorRampError> {
        if !(min.is_finite() && max.is_finite()) || min >= max {
            return Err(ColorRampError::InvalidRange(min, max));
        }

        let mut colors: Vec<Rgba> = Vec::new();
        for segment in segments {
            for color in [segment.from, segment.to] {
                if !colors.contains(&color) {
                    colors.push(color);
                }
            }
        }

        if colors.len() < 2 {
            return Err(ColorRampError::TooFewColors(colors.len()));
        }

        Ok(Self { colors, min, max })
    }

    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// The renderer's color for `value`.
    ///
    /// Clamps into `[min, max]`, walks the color list by fractional
    /// position, and blends the bracketing pair.
    pub fn color_for(&self, value: f64) -> Rgba {
        let value = value.clamp(self.min, self.max);
        let pos_along = self.colors.len() as f64 * ((value - self.min) / (self.max - self.min));
        let idx = (pos_along.floor() as usize).min(self.colors.len() - 2);
        self.colors[idx].blend(&self.colors[idx + 1], pos_along - idx as f64)
    }
}
