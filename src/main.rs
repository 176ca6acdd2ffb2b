//! Question Chart - Scatter chart of a question's recent results
//!
//! Draws the answers to one question as a marker chart, either in a window
//! or straight to a PNG/SVG file.

mod charts;
mod data;
mod gui;
mod refresh;
mod settings;

use anyhow::{anyhow, Context, Result};
use charts::{ChartRenderer, StaticChartExporter, Surface};
use clap::Parser;
use data::{PlaceholderSource, QuestionNumber, ResultLoader, SeriesSource};
use eframe::egui;
use gui::QuestionChartApp;
use refresh::RefreshController;
use settings::AppSettings;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "question_chart")]
#[command(about = "Chart the recent results of a question", long_about = None)]
struct Args {
    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Answer history CSV (question, value, answered_at)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Question to chart
    #[arg(short, long, default_value_t = 1)]
    question: u32,

    /// Look-back window in days
    #[arg(long)]
    days: Option<u32>,

    /// Write the chart to a .png or .svg file instead of opening a window
    #[arg(long)]
    export: Option<PathBuf>,

    /// Print the chart options as JSON and exit
    #[arg(long)]
    print_options: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log.as_ref())?;

    let mut settings = match &args.config {
        Some(path) => AppSettings::load(path)?,
        None => AppSettings::default(),
    };
    if let Some(data) = &args.data {
        settings.data_file = Some(data.clone());
    }
    if let Some(days) = args.days {
        settings.window_days = days;
    }
    settings.validate()?;

    if args.print_options {
        let options = settings.chart.to_plot_options()?;
        println!("{}", serde_json::to_string_pretty(&options)?);
        return Ok(());
    }

    let source: Box<dyn SeriesSource> = match &settings.data_file {
        Some(path) => {
            let table = ResultLoader::load_csv(path)
                .with_context(|| format!("loading results from {}", path.display()))?;
            Box::new(table)
        }
        None => Box::new(PlaceholderSource),
    };

    let surface = Surface::new([settings.region.as_str()]);
    let renderer = ChartRenderer::attach(&surface, &settings.region, settings.chart.clone())?;
    let mut controller = RefreshController::new(source, renderer, settings.window_days);
    let question = QuestionNumber(args.question);

    if let Some(output) = &args.export {
        controller.refresh(question)?;
        let format =
            StaticChartExporter::export_region(controller.renderer(), output, settings.export.size())?;
        println!("Exported {} chart of {} to {}", format, question, output.display());
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 700.0])
            .with_min_inner_size([800.0, 500.0])
            .with_title("Question Chart"),
        ..Default::default()
    };

    eframe::run_native(
        "Question Chart",
        options,
        Box::new(move |cc| {
            Ok(Box::new(QuestionChartApp::new(
                cc, settings, controller, question,
            )))
        }),
    )
    .map_err(|e| anyhow!(e.to_string()))
}

/// Install the global subscriber; `RUST_LOG` overrides the `info` default.
fn init_logging(log_path: Option<&PathBuf>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_path {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| anyhow!(e.to_string()))?;
        }
        None => {
            builder
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| anyhow!(e.to_string()))?;
        }
    }
    tracing::info!("Starting Question Chart");
    Ok(())
}
