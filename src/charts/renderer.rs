//! Chart Renderer
//! Builds the chart view for one display region.
//!
//! A renderer owns the view currently bound to its region. Every render
//! drops that view before building the next, so a region never shows
//! more than one chart and never keeps a stale one.

use crate::charts::config::{ChartConfig, ConfigError};
use crate::charts::highlighter::Highlighter;
use crate::charts::region::Surface;
use crate::charts::view::{padded_range, point_label, AxisView, ChartView, Marker, PlottedSeries};
use crate::data::SampleSeries;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Display region '{0}' not found")]
    RegionNotFound(String),
    #[error("Cannot render an empty series")]
    EmptySeries,
    #[error("Invalid chart configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Renders sample series into a single display region.
#[derive(Debug)]
pub struct ChartRenderer {
    region: String,
    config: ChartConfig,
    highlighter: Highlighter,
    view: Option<ChartView>,
    renders: u64,
}

impl ChartRenderer {
    /// Attach to `region` on `surface` with a validated configuration.
    pub fn attach(
        surface: &Surface,
        region: &str,
        config: ChartConfig,
    ) -> Result<Self, RenderError> {
        if !surface.contains(region) {
            tracing::warn!(
                region,
                available = ?surface.regions().collect::<Vec<_>>(),
                "unknown display region"
            );
            return Err(RenderError::RegionNotFound(region.to_string()));
        }
        config.validate()?;
        let highlighter = Highlighter::from_options(&config.highlighter)?;

        Ok(Self {
            region: region.to_string(),
            config,
            highlighter,
            view: None,
            renders: 0,
        })
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// The chart currently bound to the region.
    pub fn view(&self) -> Option<&ChartView> {
        self.view.as_ref()
    }

    /// Number of successful renders so far.
    pub fn render_count(&self) -> u64 {
        self.renders
    }

    /// Remove the bound chart.
    pub fn clear(&mut self) {
        if self.view.take().is_some() {
            tracing::debug!(region = %self.region, "cleared chart");
        }
    }

    /// Render one series, replacing whatever the region showed.
    pub fn render(&mut self, series: &SampleSeries) -> Result<&ChartView, RenderError> {
        self.render_all(std::slice::from_ref(series))
    }

    /// Render several series; colors follow the palette by series index.
    pub fn render_all(&mut self, series: &[SampleSeries]) -> Result<&ChartView, RenderError> {
        self.clear();
        if series.is_empty() || series.iter().any(SampleSeries::is_empty) {
            return Err(RenderError::EmptySeries);
        }
        if series.len() > self.config.series_colors.len() {
            tracing::debug!(
                series = series.len(),
                colors = self.config.series_colors.len(),
                "palette exhausted, reusing colors"
            );
        }

        self.renders += 1;
        let view = self.build_view(series);
        tracing::info!(
            region = %self.region,
            series = view.series.len(),
            markers = view.marker_count(),
            "rendered chart"
        );
        Ok(&*self.view.insert(view))
    }

    fn build_view(&self, series: &[SampleSeries]) -> ChartView {
        let plotted: Vec<PlottedSeries> = series
            .iter()
            .enumerate()
            .map(|(index, samples)| {
                let options = self.config.series_options(index);
                let markers = samples
                    .indexed_points()
                    .map(|(x, y)| Marker {
                        x,
                        y,
                        label: options.point_labels.show.then(|| point_label(y)),
                    })
                    .collect();
                PlottedSeries {
                    color: self.config.color_for(index),
                    marker_size: options.marker_options.size,
                    marker_style: options.marker_options.style,
                    show_line: options.show_line,
                    markers,
                }
            })
            .collect();

        let longest = series.iter().map(SampleSeries::len).max().unwrap_or(0);
        let x_bounds = (longest > 0).then(|| (1.0, longest as f64));
        let y_bounds = series
            .iter()
            .filter_map(SampleSeries::finite_bounds)
            .reduce(|(lo, hi), (l, h)| (lo.min(l), hi.max(h)));

        let axes = &self.config.axes;
        ChartView {
            region: self.region.clone(),
            generation: self.renders,
            title: self.config.title.clone(),
            series: plotted,
            x_axis: AxisView {
                show: axes.xaxis.show,
                label: Some(axes.xaxis.label.clone()).filter(|l| !l.is_empty()),
                show_ticks: axes.xaxis.show_ticks,
                range: padded_range(x_bounds, axes.xaxis.pad),
            },
            y_axis: AxisView {
                show: axes.yaxis.show,
                label: Some(axes.yaxis.label.clone()).filter(|l| !l.is_empty()),
                show_ticks: axes.yaxis.show_ticks,
                range: padded_range(y_bounds, axes.yaxis.pad),
            },
            highlighter: self.highlighter.clone(),
            entrance: self.config.entrance_duration(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::config::MarkerStyle;
    use std::time::Duration;

    fn renderer() -> ChartRenderer {
        ChartRenderer::attach(&Surface::default(), "chart1", ChartConfig::default()).unwrap()
    }

    fn placeholder() -> SampleSeries {
        SampleSeries::from(vec![10.0, 6.5, 5.7, 9.0, 8.2])
    }

    #[test]
    fn renders_labeled_markers_without_line() {
        let mut renderer = renderer();
        let view = renderer.render(&placeholder()).unwrap();

        assert_eq!(view.region(), "chart1");
        assert_eq!(view.series().len(), 1);
        let series = &view.series()[0];
        assert_eq!(series.markers.len(), 5);
        assert!(!series.show_line);
        assert_eq!(series.marker_style, MarkerStyle::FilledCircle);
        assert_eq!(series.marker_size, 10.0);

        let labels: Vec<_> = series
            .markers
            .iter()
            .map(|m| m.label.as_deref().unwrap())
            .collect();
        assert_eq!(labels, vec!["10", "6.5", "5.7", "9", "8.2"]);
        let xs: Vec<_> = series.markers.iter().map(|m| m.x).collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn x_axis_hidden_and_y_label_shown_for_any_length() {
        let mut renderer = renderer();
        for len in [1, 2, 5, 40] {
            let series: SampleSeries = (0..len).map(|i| i as f64).collect();
            let view = renderer.render(&series).unwrap();
            assert!(!view.x_axis().show);
            assert!(view.y_axis().show);
            assert_eq!(view.y_axis().label.as_deref(), Some("Y Axis"));
        }
    }

    #[test]
    fn x_range_is_tight_and_y_range_padded() {
        let mut renderer = renderer();
        let view = renderer.render(&placeholder()).unwrap();
        assert_eq!(view.x_axis().range, (1.0, 5.0));
        let (lo, hi) = view.y_axis().range;
        assert!(lo < 5.7 && hi > 10.0);
    }

    #[test]
    fn rerender_replaces_view() {
        let mut renderer = renderer();
        renderer.render(&placeholder()).unwrap();
        let view = renderer.render(&SampleSeries::from(vec![1.0, 2.0])).unwrap();
        assert_eq!(view.marker_count(), 2);
        assert_eq!(view.generation(), 2);
        assert_eq!(renderer.render_count(), 2);
    }

    #[test]
    fn palette_cycles_across_series() {
        let mut renderer = renderer();
        let series = vec![placeholder(), placeholder(), placeholder()];
        let view = renderer.render_all(&series).unwrap();
        let colors: Vec<String> = view.series().iter().map(|s| s.color.to_string()).collect();
        assert_eq!(colors, vec!["#7BB661", "#E03C31", "#7BB661"]);
    }

    #[test]
    fn empty_series_is_rejected_and_region_left_clear() {
        let mut renderer = renderer();
        renderer.render(&placeholder()).unwrap();
        assert_eq!(
            renderer.render(&SampleSeries::default()),
            Err(RenderError::EmptySeries)
        );
        assert!(renderer.view().is_none());
        assert_eq!(renderer.render_all(&[]), Err(RenderError::EmptySeries));
    }

    #[test]
    fn unknown_region_is_rejected() {
        let err = ChartRenderer::attach(&Surface::default(), "chart2", ChartConfig::default())
            .unwrap_err();
        assert_eq!(err, RenderError::RegionNotFound("chart2".to_string()));
    }

    #[test]
    fn invalid_config_is_rejected_on_attach() {
        let mut config = ChartConfig::default();
        config.series_colors.clear();
        let err = ChartRenderer::attach(&Surface::default(), "chart1", config).unwrap_err();
        assert_eq!(err, RenderError::Config(ConfigError::EmptyPalette));
    }

    #[test]
    fn labels_follow_point_label_option() {
        let mut config = ChartConfig::default();
        config.series[0].point_labels.show = false;
        let mut renderer = ChartRenderer::attach(&Surface::default(), "chart1", config).unwrap();
        let view = renderer.render(&placeholder()).unwrap();
        assert!(view.series()[0].markers.iter().all(|m| m.label.is_none()));
    }

    #[test]
    fn entrance_rises_from_range_floor() {
        let mut renderer = renderer();
        let view = renderer.render(&placeholder()).unwrap();
        assert_eq!(view.entrance, Some(Duration::from_millis(2000)));
        assert_eq!(view.entrance_progress(Duration::ZERO), 0.0);
        assert_eq!(view.entrance_progress(Duration::from_millis(1000)), 0.5);
        assert_eq!(view.entrance_progress(Duration::from_secs(5)), 1.0);

        let floor = view.y_axis().range.0;
        assert_eq!(view.animated_y(8.2, 0.0), floor);
        assert!((view.animated_y(8.2, 1.0) - 8.2).abs() < 1e-12);
    }
}
