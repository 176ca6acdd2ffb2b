//! Static Chart Exporter
//! Draws a rendered chart view to SVG or PNG with plotters.
//!
//! Layout:
//! 1. Title centered on top (omitted when empty)
//! 2. Plot area with the y axis on the left, x axis hidden unless configured
//! 3. Markers per series in palette color, value labels above each marker

use crate::charts::config::MarkerStyle;
use crate::charts::renderer::ChartRenderer;
use crate::charts::view::ChartView;
use image::{ImageBuffer, ImageFormat, Rgb};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fmt;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

/// Default export size in pixels.
pub const DEFAULT_EXPORT_SIZE: (u32, u32) = (800, 500);

const TITLE_FONT_SIZE: i32 = 22;
const LABEL_FONT_SIZE: i32 = 13;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Nothing rendered in region '{0}'")]
    NothingRendered(String),
    #[error("Invalid export size {0}x{1}")]
    InvalidSize(u32, u32),
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Svg,
}

impl ExportFormat {
    /// Format chosen by file extension.
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" => Ok(ExportFormat::Png),
            "svg" => Ok(ExportFormat::Svg),
            _ => Err(ExportError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Png => f.write_str("PNG"),
            ExportFormat::Svg => f.write_str("SVG"),
        }
    }
}

fn draw_err<E: fmt::Display>(err: E) -> ExportError {
    ExportError::Draw(err.to_string())
}

pub struct StaticChartExporter;

impl StaticChartExporter {
    /// Render the view as an SVG document.
    pub fn render_svg(view: &ChartView, size: (u32, u32)) -> Result<String, ExportError> {
        Self::check_size(size)?;
        let mut buffer = String::new();
        {
            let root = SVGBackend::with_string(&mut buffer, size).into_drawing_area();
            Self::draw(&root, view)?;
            root.present().map_err(draw_err)?;
        }
        Ok(buffer)
    }

    /// Render the view to in-memory PNG bytes.
    pub fn render_png_bytes(view: &ChartView, size: (u32, u32)) -> Result<Vec<u8>, ExportError> {
        Self::check_size(size)?;
        let (width, height) = size;
        let mut pixels = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut pixels, size).into_drawing_area();
            Self::draw(&root, view)?;
            root.present().map_err(draw_err)?;
        }

        let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_raw(width, height, pixels)
            .ok_or(ExportError::InvalidSize(width, height))?;
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Write the chart bound to the renderer's region to `path`.
    pub fn export_region(
        renderer: &ChartRenderer,
        path: &Path,
        size: (u32, u32),
    ) -> Result<ExportFormat, ExportError> {
        let view = renderer
            .view()
            .ok_or_else(|| ExportError::NothingRendered(renderer.region().to_string()))?;
        Self::export_to_file(view, path, size)
    }

    /// Write the view to `path`, format chosen by extension.
    pub fn export_to_file(
        view: &ChartView,
        path: &Path,
        size: (u32, u32),
    ) -> Result<ExportFormat, ExportError> {
        let format = ExportFormat::from_path(path)?;
        match format {
            ExportFormat::Svg => std::fs::write(path, Self::render_svg(view, size)?)?,
            ExportFormat::Png => std::fs::write(path, Self::render_png_bytes(view, size)?)?,
        }
        tracing::info!(
            path = %path.display(),
            %format,
            width = size.0,
            height = size.1,
            "exported chart"
        );
        Ok(format)
    }

    fn check_size((width, height): (u32, u32)) -> Result<(), ExportError> {
        if width == 0 || height == 0 {
            return Err(ExportError::InvalidSize(width, height));
        }
        Ok(())
    }

    fn draw<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        view: &ChartView,
    ) -> Result<(), ExportError> {
        root.fill(&WHITE).map_err(draw_err)?;

        let (x_min, x_max) = view.x_axis().range;
        let (y_min, y_max) = view.y_axis().range;
        let x_axis = view.x_axis();
        let y_axis = view.y_axis();

        // Tight x range puts edge markers on the border; keep room for them
        let largest_marker = view
            .series()
            .iter()
            .map(|s| s.marker_size)
            .fold(0.0f32, f32::max);
        let margin = 15i32.saturating_add(largest_marker.ceil() as i32);

        let mut builder = ChartBuilder::on(root);
        builder
            .margin(margin)
            .x_label_area_size(if x_axis.show { 40 } else { 0 })
            .y_label_area_size(if y_axis.show { 60 } else { 0 });
        if !view.title().is_empty() {
            builder.caption(view.title(), ("sans-serif", TITLE_FONT_SIZE));
        }
        let mut chart = builder
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(draw_err)?;

        {
            let mut mesh = chart.configure_mesh();
            mesh.disable_x_mesh();
            if x_axis.show && x_axis.show_ticks {
                mesh.x_labels(x_max.round().max(1.0) as usize);
            } else {
                mesh.x_labels(0);
            }
            if !x_axis.show {
                mesh.disable_x_axis();
            } else if let Some(label) = &x_axis.label {
                mesh.x_desc(label.as_str());
            }
            if !(y_axis.show && y_axis.show_ticks) {
                mesh.y_labels(0);
            }
            if !y_axis.show {
                mesh.disable_y_axis();
            } else if let Some(label) = &y_axis.label {
                mesh.y_desc(label.as_str());
            }
            mesh.draw().map_err(draw_err)?;
        }

        for series in view.series() {
            let color = RGBColor(series.color.r, series.color.g, series.color.b);
            let points: Vec<(f64, f64)> = series
                .markers
                .iter()
                .filter(|m| m.y.is_finite())
                .map(|m| (m.x, m.y))
                .collect();

            if series.show_line {
                chart
                    .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
                    .map_err(draw_err)?;
            }

            let radius = ((series.marker_size / 2.0).round() as i32).max(1);
            let style = if series.marker_style.is_filled() {
                color.filled()
            } else {
                color.stroke_width(2)
            };

            match series.marker_style {
                MarkerStyle::Circle | MarkerStyle::FilledCircle => {
                    chart
                        .draw_series(points.iter().map(|&p| Circle::new(p, radius, style)))
                        .map_err(draw_err)?;
                }
                MarkerStyle::Square | MarkerStyle::FilledSquare => {
                    chart
                        .draw_series(points.iter().map(|&p| {
                            EmptyElement::at(p)
                                + Rectangle::new([(-radius, -radius), (radius, radius)], style)
                        }))
                        .map_err(draw_err)?;
                }
                MarkerStyle::Diamond | MarkerStyle::FilledDiamond => {
                    chart
                        .draw_series(points.iter().map(|&p| {
                            EmptyElement::at(p)
                                + Polygon::new(
                                    vec![(0, -radius), (radius, 0), (0, radius), (-radius, 0)],
                                    style,
                                )
                        }))
                        .map_err(draw_err)?;
                }
                MarkerStyle::X => {
                    chart
                        .draw_series(points.iter().map(|&p| Cross::new(p, radius, style)))
                        .map_err(draw_err)?;
                }
                MarkerStyle::Plus => {
                    chart
                        .draw_series(points.iter().map(|&p| {
                            EmptyElement::at(p)
                                + PathElement::new(vec![(-radius, 0), (radius, 0)], style)
                                + PathElement::new(vec![(0, -radius), (0, radius)], style)
                        }))
                        .map_err(draw_err)?;
                }
            }

            let font = ("sans-serif", LABEL_FONT_SIZE).into_font().color(&BLACK);
            chart
                .draw_series(series.markers.iter().filter(|m| m.y.is_finite()).filter_map(
                    |m| {
                        m.label.as_ref().map(|label| {
                            EmptyElement::at((m.x, m.y))
                                + Text::new(label.clone(), (-radius, -radius - 16), font.clone())
                        })
                    },
                ))
                .map_err(draw_err)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{ChartConfig, ChartRenderer, Surface};
    use crate::data::SampleSeries;
    use std::path::PathBuf;

    /// A renderer whose drawing needs no font: no title, labels or ticks.
    fn textless_renderer() -> ChartRenderer {
        let mut config = ChartConfig::default();
        config.title.clear();
        config.series[0].point_labels.show = false;
        config.axes.yaxis.show = false;
        ChartRenderer::attach(&Surface::default(), "chart1", config).unwrap()
    }

    fn textless_view() -> ChartView {
        textless_renderer()
            .render(&SampleSeries::from(vec![10.0, 6.5, 5.7, 9.0, 8.2]))
            .unwrap()
            .clone()
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            ExportFormat::from_path(&PathBuf::from("out/chart.PNG")).unwrap(),
            ExportFormat::Png
        );
        assert_eq!(
            ExportFormat::from_path(&PathBuf::from("chart.svg")).unwrap(),
            ExportFormat::Svg
        );
        assert!(matches!(
            ExportFormat::from_path(&PathBuf::from("chart.pptx")),
            Err(ExportError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            ExportFormat::from_path(&PathBuf::from("chart")),
            Err(ExportError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn zero_size_is_rejected() {
        let view = textless_view();
        assert!(matches!(
            StaticChartExporter::render_svg(&view, (0, 400)),
            Err(ExportError::InvalidSize(0, 400))
        ));
    }

    #[test]
    fn svg_contains_one_circle_per_marker() {
        let view = textless_view();
        let svg = StaticChartExporter::render_svg(&view, (400, 300)).unwrap();
        assert_eq!(svg.matches("<circle").count(), 5);
        assert!(svg.contains("#7BB661") || svg.to_ascii_lowercase().contains("#7bb661"));
    }

    #[test]
    fn png_export_writes_file() {
        let view = textless_view();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        let format = StaticChartExporter::export_to_file(&view, &path, (320, 200)).unwrap();
        assert_eq!(format, ExportFormat::Png);

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (320, 200));
    }

    #[test]
    fn empty_region_has_nothing_to_export() {
        let renderer = textless_renderer();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.svg");

        let err = StaticChartExporter::export_region(&renderer, &path, (320, 200)).unwrap_err();
        assert!(matches!(err, ExportError::NothingRendered(ref region) if region == "chart1"));
        assert!(!path.exists());
    }

    #[test]
    fn export_region_writes_bound_chart() {
        let mut renderer = textless_renderer();
        renderer.render(&SampleSeries::from(vec![2.0, 4.0])).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.svg");

        let format = StaticChartExporter::export_region(&renderer, &path, (320, 200)).unwrap();
        assert_eq!(format, ExportFormat::Svg);
        let svg = std::fs::read_to_string(&path).unwrap();
        assert_eq!(svg.matches("<circle").count(), 2);
    }

    #[test]
    fn non_finite_samples_keep_slot_but_are_not_drawn() {
        let mut renderer = textless_renderer();
        let view = renderer
            .render(&SampleSeries::from(vec![1.0, f64::NAN, f64::INFINITY, 3.0]))
            .unwrap()
            .clone();

        assert_eq!(view.marker_count(), 4);
        assert_eq!(view.x_axis().range, (1.0, 4.0));
        let (y_min, y_max) = view.y_axis().range;
        assert!(y_min.is_finite() && y_max.is_finite());
        assert!((y_min - 0.8).abs() < 1e-9 && (y_max - 3.2).abs() < 1e-9);

        let svg = StaticChartExporter::render_svg(&view, (400, 300)).unwrap();
        assert_eq!(svg.matches("<circle").count(), 2);
    }
}
