// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Portable lengths and backend metrics.
//!
//! Portable code speaks in device-independent pixels (DIPs) and in "sem"
//! units (multiples of the backend's default font height). A backend
//! reports how these map onto its device pixels through [`UiMetrics`].

use kurbo::{Insets, Rect, Size};

/// Tolerance used when snapping to the pixel grid, so that values which are
/// already on the grid (up to float noise) do not get pushed to the next
/// pixel.
const SNAP_EPSILON: f64 = 1e-7;

/// A length in portable units.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum UiLength {
    /// Device-independent pixels.
    Dip(f64),
    /// Multiples of the backend's sem size (see [`UiMetrics::sem_dips`]).
    Sem(f64),
}

impl UiLength {
    /// The zero length.
    pub const ZERO: Self = Self::Dip(0.0);

    /// Creates a length in DIPs.
    #[must_use]
    pub const fn dip(value: f64) -> Self {
        Self::Dip(value)
    }

    /// Creates a length in sem units.
    #[must_use]
    pub const fn sem(value: f64) -> Self {
        Self::Sem(value)
    }

    /// Resolves this length to DIPs.
    #[must_use]
    pub fn to_dips(self, metrics: &UiMetrics) -> f64 {
        match self {
            Self::Dip(v) => v,
            Self::Sem(v) => v * metrics.sem_dips,
        }
    }
}

impl Default for UiLength {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Margin or padding around an element, in portable units.
///
/// Component order follows the usual CSS convention: top, right, bottom, left.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct UiMargin {
    /// Space above.
    pub top: UiLength,
    /// Space to the right.
    pub right: UiLength,
    /// Space below.
    pub bottom: UiLength,
    /// Space to the left.
    pub left: UiLength,
}

impl UiMargin {
    /// A margin of zero on all sides.
    pub const ZERO: Self = Self::uniform(UiLength::ZERO);

    /// Creates a margin from four DIP values (top, right, bottom, left).
    #[must_use]
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top: UiLength::Dip(top),
            right: UiLength::Dip(right),
            bottom: UiLength::Dip(bottom),
            left: UiLength::Dip(left),
        }
    }

    /// Creates a margin with the same length on every side.
    #[must_use]
    pub const fn uniform(length: UiLength) -> Self {
        Self {
            top: length,
            right: length,
            bottom: length,
            left: length,
        }
    }

    /// Creates a margin from four arbitrary lengths (top, right, bottom, left).
    #[must_use]
    pub const fn from_lengths(
        top: UiLength,
        right: UiLength,
        bottom: UiLength,
        left: UiLength,
    ) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Resolves this margin to DIP insets.
    ///
    /// Negative components are clamped to zero.
    #[must_use]
    pub fn resolve(&self, metrics: &UiMetrics) -> Insets {
        let dips = |l: UiLength| l.to_dips(metrics).max(0.0);
        Insets::new(
            dips(self.left),
            dips(self.top),
            dips(self.right),
            dips(self.bottom),
        )
    }
}

/// Geometry facts about a backend.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UiMetrics {
    /// Number of device pixels per DIP.
    pub pixels_per_dip: f64,
    /// Size of one sem unit, in DIPs.
    pub sem_dips: f64,
}

impl Default for UiMetrics {
    fn default() -> Self {
        Self {
            pixels_per_dip: 1.0,
            sem_dips: 16.0,
        }
    }
}

impl UiMetrics {
    /// Creates metrics with the given pixel ratio and sem size.
    #[must_use]
    pub const fn new(pixels_per_dip: f64, sem_dips: f64) -> Self {
        Self {
            pixels_per_dip,
            sem_dips,
        }
    }

    /// Rounds a coordinate to the nearest device pixel.
    #[must_use]
    pub fn snap(&self, value: f64) -> f64 {
        (value * self.pixels_per_dip).round() / self.pixels_per_dip
    }

    /// Rounds a length up to the next device pixel.
    #[must_use]
    pub fn snap_up(&self, value: f64) -> f64 {
        (value * self.pixels_per_dip - SNAP_EPSILON).ceil() / self.pixels_per_dip
    }

    /// Rounds a size up to whole device pixels.
    #[must_use]
    pub fn snap_size_up(&self, size: Size) -> Size {
        Size::new(self.snap_up(size.width), self.snap_up(size.height))
    }

    /// Rounds every edge of a rectangle to the nearest device pixel.
    ///
    /// Edges are snapped independently, so two rectangles that share an edge
    /// still share it afterwards.
    #[must_use]
    pub fn snap_rect(&self, rect: Rect) -> Rect {
        Rect::new(
            self.snap(rect.x0),
            self.snap(rect.y0),
            self.snap(rect.x1),
            self.snap(rect.y1),
        )
    }
}
