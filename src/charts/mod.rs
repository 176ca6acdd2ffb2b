//! Charts module - Chart configuration, rendering and export

mod config;
mod export;
mod format;
mod highlighter;
mod region;
mod renderer;
mod view;

pub use config::{
    AxisOptions, ChartConfig, ConfigError, HexColor, HighlighterOptions, MarkerStyle,
    SeriesOptions, TooltipAxes, TooltipLocation, DEFAULT_SERIES_COLORS,
};
pub use export::{ExportError, ExportFormat, StaticChartExporter, DEFAULT_EXPORT_SIZE};
pub use format::{FormatError, NumberFormat};
pub use highlighter::{Highlighter, MarkerRef};
pub use region::{Surface, DEFAULT_REGION};
pub use renderer::{ChartRenderer, RenderError};
pub use view::{AxisView, ChartView, Marker, PlottedSeries};
