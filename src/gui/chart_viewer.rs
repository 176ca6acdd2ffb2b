//! Chart Viewer Widget
//! Central panel drawing the bound chart view with egui_plot.
//! Handles the entrance animation and the hover highlighter.

use crate::charts::{ChartView, HexColor, Marker, MarkerStyle, PlottedSeries, TooltipLocation};
use egui::{Align2, Color32, RichText};
use egui_plot::{Line, MarkerShape, Plot, PlotBounds, PlotPoint, PlotPoints, Points, Text};
use std::time::Duration;

/// Gap in pixels between a marker and its value label.
const LABEL_GAP: f32 = 2.0;

/// Draws the chart of one display region.
#[derive(Default)]
pub struct ChartViewer {
    /// Generation of the view currently animating.
    seen_generation: Option<u64>,
    /// UI time at which that view first appeared.
    started_at: f64,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, ui: &mut egui::Ui, region: &str, view: Option<&ChartView>) {
        let Some(view) = view else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new(format!("No chart in '{}'", region)).size(20.0));
            });
            return;
        };

        let now = ui.input(|i| i.time);
        if self.seen_generation != Some(view.generation()) {
            self.seen_generation = Some(view.generation());
            self.started_at = now;
        }
        let elapsed = Duration::from_secs_f64((now - self.started_at).max(0.0));
        let progress = view.entrance_progress(elapsed);
        if progress < 1.0 {
            ui.ctx().request_repaint();
        }

        if !view.title().is_empty() {
            ui.vertical_centered(|ui| {
                ui.label(RichText::new(view.title()).size(18.0).strong());
            });
            ui.add_space(8.0);
        }

        let text_color = ui.visuals().text_color();
        let x_axis = view.x_axis();
        let y_axis = view.y_axis();

        let mut plot = Plot::new(format!("chart_{}", view.region()))
            .show_axes([x_axis.show, y_axis.show])
            .show_x(false)
            .show_y(false)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .set_margin_fraction(egui::Vec2::ZERO);
        if let (true, Some(label)) = (x_axis.show, &x_axis.label) {
            plot = plot.x_axis_label(label.clone());
        }
        if let (true, Some(label)) = (y_axis.show, &y_axis.label) {
            plot = plot.y_axis_label(label.clone());
        }
        if !y_axis.show_ticks {
            plot = plot.y_axis_formatter(|_mark, _range| String::new());
        }

        plot.show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(plot_bounds(view));
            let highlighter = view.highlighter();

            // Hit-test before drawing so the highlight lands on top
            let hit = plot_ui.pointer_coordinate().and_then(|pointer| {
                let pointer = plot_ui.screen_from_plot(pointer);
                highlighter.pick(view, [pointer.x, pointer.y], |x, y| {
                    let p = plot_ui.screen_from_plot(PlotPoint::new(x, view.animated_y(y, progress)));
                    [p.x, p.y]
                })
            });

            for series in view.series() {
                let color = to_color32(series.color);
                let drawn = drawn_markers(view, series, progress);
                let points: Vec<[f64; 2]> = drawn.iter().map(|&(_, point)| point).collect();

                if series.show_line {
                    plot_ui.line(Line::new(PlotPoints::from(points.clone())).color(color).width(2.0));
                }

                let radius = series.marker_size / 2.0;
                plot_ui.points(
                    Points::new(PlotPoints::from(points.clone()))
                        .shape(marker_shape(series.marker_style))
                        .filled(series.marker_style.is_filled())
                        .radius(radius)
                        .color(color),
                );

                for (marker, point) in &drawn {
                    let Some(label) = &marker.label else {
                        continue;
                    };
                    let screen = plot_ui.screen_from_plot(PlotPoint::new(point[0], point[1]));
                    let above = plot_ui.plot_from_screen(screen - egui::vec2(0.0, radius + LABEL_GAP));
                    plot_ui.text(
                        Text::new(above, RichText::new(label).size(11.0))
                            .anchor(Align2::CENTER_BOTTOM)
                            .color(text_color),
                    );
                }
            }

            if let Some(hit) = hit {
                let series = &view.series()[hit.series];
                let marker = &series.markers[hit.marker];
                let y = view.animated_y(marker.y, progress);
                let color = to_color32(series.color);

                plot_ui.points(
                    Points::new(PlotPoints::from(vec![[marker.x, y]]))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(highlighter.highlight_size(series.marker_size) / 2.0)
                        .color(color.gamma_multiply(0.5)),
                );

                if highlighter.show_label {
                    let (dx, dy) = highlighter.location.direction();
                    let offset = highlighter.hit_radius(series.marker_size);
                    let screen = plot_ui.screen_from_plot(PlotPoint::new(marker.x, y));
                    let at = plot_ui.plot_from_screen(screen + egui::vec2(dx * offset, dy * offset));
                    plot_ui.text(
                        Text::new(
                            at,
                            RichText::new(highlighter.tooltip_text(marker.x, marker.y)).strong(),
                        )
                        .anchor(tooltip_anchor(highlighter.location))
                        .color(text_color),
                    );
                }
            }
        });
    }
}

/// Exact plot window: the view's ranges without any extra margin.
fn plot_bounds(view: &ChartView) -> PlotBounds {
    let (x_min, x_max) = view.x_axis().range;
    let (y_min, y_max) = view.y_axis().range;
    PlotBounds::from_min_max([x_min, y_min], [x_max, y_max])
}

/// Markers with a finite value, paired with their animated position.
fn drawn_markers<'a>(
    view: &ChartView,
    series: &'a PlottedSeries,
    progress: f64,
) -> Vec<(&'a Marker, [f64; 2])> {
    series
        .markers
        .iter()
        .filter(|m| m.y.is_finite())
        .map(|m| (m, [m.x, view.animated_y(m.y, progress)]))
        .collect()
}

fn to_color32(color: HexColor) -> Color32 {
    Color32::from_rgb(color.r, color.g, color.b)
}

fn marker_shape(style: MarkerStyle) -> MarkerShape {
    match style {
        MarkerStyle::Circle | MarkerStyle::FilledCircle => MarkerShape::Circle,
        MarkerStyle::Square | MarkerStyle::FilledSquare => MarkerShape::Square,
        MarkerStyle::Diamond | MarkerStyle::FilledDiamond => MarkerShape::Diamond,
        MarkerStyle::X => MarkerShape::Cross,
        MarkerStyle::Plus => MarkerShape::Plus,
    }
}

/// Text anchor placing the tooltip on the `location` side of its point.
fn tooltip_anchor(location: TooltipLocation) -> Align2 {
    match location {
        TooltipLocation::N => Align2::CENTER_BOTTOM,
        TooltipLocation::Ne => Align2::LEFT_BOTTOM,
        TooltipLocation::E => Align2::LEFT_CENTER,
        TooltipLocation::Se => Align2::LEFT_TOP,
        TooltipLocation::S => Align2::CENTER_TOP,
        TooltipLocation::Sw => Align2::RIGHT_TOP,
        TooltipLocation::W => Align2::RIGHT_CENTER,
        TooltipLocation::Nw => Align2::RIGHT_BOTTOM,
    }
}
