//! Chart View Module
//! Backend-independent description of a rendered chart.

use crate::charts::config::{HexColor, MarkerStyle};
use crate::charts::highlighter::Highlighter;
use std::time::Duration;

/// Range multiplier applied when an axis has no explicit pad.
pub const DEFAULT_AXIS_PAD: f64 = 1.2;

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub x: f64,
    pub y: f64,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlottedSeries {
    pub color: HexColor,
    pub marker_size: f32,
    pub marker_style: MarkerStyle,
    pub show_line: bool,
    pub markers: Vec<Marker>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisView {
    pub show: bool,
    pub label: Option<String>,
    pub show_ticks: bool,
    pub range: (f64, f64),
}

/// Chart bound to a display region.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    pub(crate) region: String,
    pub(crate) generation: u64,
    pub(crate) title: String,
    pub(crate) series: Vec<PlottedSeries>,
    pub(crate) x_axis: AxisView,
    pub(crate) y_axis: AxisView,
    pub(crate) highlighter: Highlighter,
    pub(crate) entrance: Option<Duration>,
}

impl ChartView {
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Render counter of the owning renderer when this view was built.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn series(&self) -> &[PlottedSeries] {
        &self.series
    }

    pub fn marker_count(&self) -> usize {
        self.series.iter().map(|s| s.markers.len()).sum()
    }

    pub fn x_axis(&self) -> &AxisView {
        &self.x_axis
    }

    pub fn y_axis(&self) -> &AxisView {
        &self.y_axis
    }

    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    /// Entrance progress in `[0, 1]` after `elapsed`; 1 when not animated.
    pub fn entrance_progress(&self, elapsed: Duration) -> f64 {
        match self.entrance {
            Some(total) if !total.is_zero() => {
                (elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
            }
            _ => 1.0,
        }
    }

    /// Marker height during the entrance: rises from the bottom of the y range.
    pub fn animated_y(&self, y: f64, progress: f64) -> f64 {
        if progress >= 1.0 {
            return y;
        }
        let floor = self.y_axis.range.0;
        floor + (y - floor) * progress.max(0.0)
    }
}

/// Axis range around `bounds` expanded by `pad` (a span multiplier).
///
/// Pads at or below 1 leave the range tight. A zero span widens by one unit
/// each side; no bounds yields `[0, 1]`.
pub fn padded_range(bounds: Option<(f64, f64)>, pad: Option<f64>) -> (f64, f64) {
    let Some((lo, hi)) = bounds else {
        return (0.0, 1.0);
    };
    let span = hi - lo;
    if span <= f64::EPSILON {
        return (lo - 1.0, hi + 1.0);
    }
    let factor = pad.unwrap_or(DEFAULT_AXIS_PAD).max(1.0);
    let extra = span * (factor - 1.0) / 2.0;
    (lo - extra, hi + extra)
}

/// Text shown next to a marker.
pub fn point_label(value: f64) -> String {
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pad_adds_ten_percent_each_side() {
        let (lo, hi) = padded_range(Some((5.0, 10.0)), None);
        assert!((lo - 4.5).abs() < 1e-9);
        assert!((hi - 10.5).abs() < 1e-9);
    }

    #[test]
    fn zero_pad_is_tight() {
        assert_eq!(padded_range(Some((1.0, 5.0)), Some(0.0)), (1.0, 5.0));
    }

    #[test]
    fn degenerate_ranges() {
        assert_eq!(padded_range(Some((3.0, 3.0)), None), (2.0, 4.0));
        assert_eq!(padded_range(None, None), (0.0, 1.0));
    }

    #[test]
    fn point_labels_use_shortest_form() {
        assert_eq!(point_label(10.0), "10");
        assert_eq!(point_label(6.5), "6.5");
        assert_eq!(point_label(8.2), "8.2");
    }
}
