//! Hover Highlighter Module
//! Marker hit-testing and tooltip text for pointer hover.

use crate::charts::config::{ConfigError, HighlighterOptions, TooltipAxes, TooltipLocation};
use crate::charts::format::NumberFormat;
use crate::charts::view::ChartView;

/// Position of a marker inside a [`ChartView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerRef {
    pub series: usize,
    pub marker: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Highlighter {
    pub show: bool,
    pub show_label: bool,
    pub axes: TooltipAxes,
    pub location: TooltipLocation,
    pub size_adjust: f32,
    format: NumberFormat,
}

impl Highlighter {
    pub fn from_options(options: &HighlighterOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            show: options.show,
            show_label: options.show_label,
            axes: options.tooltip_axes,
            location: options.tooltip_location,
            size_adjust: options.size_adjust,
            format: NumberFormat::parse(&options.format_string)?,
        })
    }

    /// Diameter of the highlight drawn over a hovered marker.
    pub fn highlight_size(&self, marker_size: f32) -> f32 {
        marker_size + self.size_adjust
    }

    /// Pointer distance in pixels at which a marker counts as hovered.
    pub fn hit_radius(&self, marker_size: f32) -> f32 {
        self.highlight_size(marker_size) / 2.0
    }

    /// Tooltip text for a point.
    pub fn tooltip_text(&self, x: f64, y: f64) -> String {
        let fx = || self.format.format(x);
        let fy = || self.format.format(y);
        match self.axes {
            TooltipAxes::Y => fy(),
            TooltipAxes::X => fx(),
            TooltipAxes::Xy | TooltipAxes::Both => format!("{}, {}", fx(), fy()),
            TooltipAxes::Yx => format!("{}, {}", fy(), fx()),
        }
    }

    /// Nearest marker within its hit radius of `pointer`.
    ///
    /// `to_screen` maps a marker's plot coordinates to pixels.
    pub fn pick<F>(&self, view: &ChartView, pointer: [f32; 2], to_screen: F) -> Option<MarkerRef>
    where
        F: Fn(f64, f64) -> [f32; 2],
    {
        if !self.show {
            return None;
        }

        let mut best: Option<(f32, MarkerRef)> = None;
        for (s, series) in view.series().iter().enumerate() {
            let radius = self.hit_radius(series.marker_size);
            for (m, marker) in series.markers.iter().enumerate() {
                if !marker.y.is_finite() {
                    continue;
                }
                let [sx, sy] = to_screen(marker.x, marker.y);
                let distance = ((sx - pointer[0]).powi(2) + (sy - pointer[1]).powi(2)).sqrt();
                if distance > radius {
                    continue;
                }
                if best.map_or(true, |(d, _)| distance < d) {
                    best = Some((
                        distance,
                        MarkerRef {
                            series: s,
                            marker: m,
                        },
                    ));
                }
            }
        }
        best.map(|(_, hit)| hit)
    }
}

impl TooltipLocation {
    /// Unit offset in screen space (y grows downward).
    pub fn direction(self) -> (f32, f32) {
        match self {
            TooltipLocation::N => (0.0, -1.0),
            TooltipLocation::Ne => (1.0, -1.0),
            TooltipLocation::E => (1.0, 0.0),
            TooltipLocation::Se => (1.0, 1.0),
            TooltipLocation::S => (0.0, 1.0),
            TooltipLocation::Sw => (-1.0, 1.0),
            TooltipLocation::W => (-1.0, 0.0),
            TooltipLocation::Nw => (-1.0, -1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{ChartConfig, ChartRenderer, Surface};
    use crate::data::SampleSeries;

    fn highlighter() -> Highlighter {
        Highlighter::from_options(&HighlighterOptions::default()).unwrap()
    }

    #[test]
    fn tooltip_shows_y_with_two_decimals() {
        let h = highlighter();
        assert_eq!(h.tooltip_text(5.0, 8.2), "8.20");
        assert_eq!(h.tooltip_text(1.0, 10.0), "10.00");
    }

    #[test]
    fn tooltip_axes_variants() {
        let mut h = highlighter();
        h.axes = TooltipAxes::Xy;
        assert_eq!(h.tooltip_text(2.0, 6.5), "2.00, 6.50");
        h.axes = TooltipAxes::Yx;
        assert_eq!(h.tooltip_text(2.0, 6.5), "6.50, 2.00");
        h.axes = TooltipAxes::X;
        assert_eq!(h.tooltip_text(2.0, 6.5), "2.00");
    }

    #[test]
    fn hit_radius_includes_size_adjust() {
        let h = highlighter();
        assert_eq!(h.highlight_size(10.0), 17.5);
        assert_eq!(h.hit_radius(10.0), 8.75);
    }

    #[test]
    fn pick_finds_nearest_marker_in_range() {
        let surface = Surface::default();
        let mut renderer =
            ChartRenderer::attach(&surface, "chart1", ChartConfig::default()).unwrap();
        let view = renderer
            .render(&SampleSeries::from(vec![10.0, 6.5, 5.7, 9.0, 8.2]))
            .unwrap()
            .clone();
        let h = view.highlighter().clone();
        // 100 px per x unit, 10 px per y unit
        let to_screen = |x: f64, y: f64| [(x * 100.0) as f32, (200.0 - y * 10.0) as f32];

        let hit = h.pick(&view, [305.0, 146.0], to_screen);
        assert_eq!(hit, Some(MarkerRef { series: 0, marker: 2 }));
        assert_eq!(h.pick(&view, [350.0, 143.0], to_screen), None);

        let mut hidden = h.clone();
        hidden.show = false;
        assert_eq!(hidden.pick(&view, [300.0, 143.0], to_screen), None);
    }

    #[test]
    fn north_east_points_up_and_right() {
        assert_eq!(TooltipLocation::Ne.direction(), (1.0, -1.0));
    }
}
