//! Question Chart Main Application
//! Main window with control panel and chart viewer.

use crate::charts::StaticChartExporter;
use crate::data::{
    PlaceholderSource, QuestionNumber, ResultLoader, ResultTable, SeriesSource,
};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::refresh::RefreshController;
use crate::settings::AppSettings;
use egui::SidePanel;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::thread;

/// CSV loading result from background thread
enum LoadResult {
    Complete(ResultTable),
    Error(String),
}

/// Main application window.
pub struct QuestionChartApp {
    settings: AppSettings,
    controller: RefreshController<Box<dyn SeriesSource>>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl QuestionChartApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        settings: AppSettings,
        controller: RefreshController<Box<dyn SeriesSource>>,
        question: QuestionNumber,
    ) -> Self {
        let mut control_panel = ControlPanel::new();
        control_panel.question = question.0;
        control_panel.window_days = controller.window_days();
        control_panel.data_path = settings.data_file.clone();

        let mut app = Self {
            settings,
            controller,
            control_panel,
            chart_viewer: ChartViewer::new(),
            load_rx: None,
            is_loading: false,
        };
        app.handle_refresh();
        app
    }

    /// Clear and redraw the chart for the selected question
    fn handle_refresh(&mut self) {
        let question = QuestionNumber(self.control_panel.question);
        self.controller
            .set_window_days(self.control_panel.window_days.max(1));

        let status = match self.controller.refresh(question) {
            Ok(view) => format!("Showing {} ({} results)", question, view.marker_count()),
            Err(e) => {
                tracing::warn!(%question, error = %e, "refresh failed");
                format!("Error: {}", e)
            }
        };
        self.control_panel.export_enabled = self.controller.renderer().view().is_some();
        self.control_panel.set_status(status);
    }

    /// Pick a results CSV and load it in the background
    fn handle_browse_data(&mut self) {
        if self.is_loading {
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.control_panel.set_status("Loading results...");
            self.control_panel.data_path = Some(path.clone());
            self.is_loading = true;

            let (tx, rx) = channel();
            self.load_rx = Some(rx);

            thread::spawn(move || {
                let result = match ResultLoader::load_csv(&path) {
                    Ok(table) => LoadResult::Complete(table),
                    Err(e) => LoadResult::Error(e.to_string()),
                };
                let _ = tx.send(result);
            });
        }
    }

    /// Go back to the placeholder series
    fn handle_use_placeholder(&mut self) {
        self.control_panel.data_path = None;
        self.controller.set_source(Box::new(PlaceholderSource));
        self.handle_refresh();
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult::Complete(table)) => {
                tracing::info!(
                    rows = table.len(),
                    path = ?table.source_path(),
                    "switched to loaded results"
                );
                self.controller.set_source(Box::new(table));
                self.is_loading = false;
                self.handle_refresh();
            }
            Ok(LoadResult::Error(error)) => {
                self.control_panel.set_status(format!("Error: {}", error));
                self.control_panel.data_path = None;
                self.is_loading = false;
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => {
                self.load_rx = Some(rx);
            }
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.control_panel.set_status("Error: loader stopped unexpectedly");
                self.is_loading = false;
            }
        }
    }

    /// Export the current chart as PNG or SVG
    fn handle_export(&mut self) {
        let output_path: PathBuf = match rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .add_filter("SVG Image", &["svg"])
            .set_file_name("question_chart.png")
            .save_file()
        {
            Some(path) => path,
            None => return, // User cancelled
        };

        let size = self.settings.export.size();
        match StaticChartExporter::export_region(self.controller.renderer(), &output_path, size) {
            Ok(format) => {
                self.control_panel
                    .set_status(format!("Exported {} to {}", format, output_path.display()));
                if self.control_panel.open_after_export {
                    if let Err(e) = open::that(&output_path) {
                        tracing::warn!(error = %e, "could not open exported chart");
                    }
                }
            }
            Err(e) => {
                self.control_panel.set_status(format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for QuestionChartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui, self.is_loading);

                    match action {
                        ControlPanelAction::BrowseData => self.handle_browse_data(),
                        ControlPanelAction::UsePlaceholder => self.handle_use_placeholder(),
                        ControlPanelAction::Refresh => self.handle_refresh(),
                        ControlPanelAction::Export => self.handle_export(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            let renderer = self.controller.renderer();
            self.chart_viewer.show(ui, renderer.region(), renderer.view());
        });
    }
}
