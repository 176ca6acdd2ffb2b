//! Chart Configuration Module
//! Typed plot options with the fixed question-chart presentation as defaults.
//!
//! Field names serialize to the option keys understood by browser plotting
//! widgets (`seriesColors`, `axesDefaults`, `highlighter.formatString`, ...),
//! so a validated configuration can be handed to either renderer.

use crate::charts::format::{FormatError, NumberFormat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Largest accepted marker diameter in pixels.
pub const MAX_MARKER_SIZE: f32 = 100.0;
/// Largest accepted highlight enlargement in pixels.
pub const MAX_SIZE_ADJUST: f32 = 100.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("seriesColors must contain at least one color")]
    EmptyPalette,
    #[error("Invalid color '{0}', expected #RRGGBB or #RGB")]
    InvalidColor(String),
    #[error("Marker size must be in (0, {max}], got {0}", max = MAX_MARKER_SIZE)]
    InvalidMarkerSize(f32),
    #[error("Animation speed must be positive when animate is on")]
    InvalidAnimationSpeed,
    #[error("sizeAdjust must be in [0, {max}], got {0}", max = MAX_SIZE_ADJUST)]
    InvalidSizeAdjust(f32),
    #[error("Invalid highlighter format: {0}")]
    Format(#[from] FormatError),
}

/// sRGB color written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for HexColor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let r = channel(&hex[0..1])?;
                let g = channel(&hex[1..2])?;
                let b = channel(&hex[2..3])?;
                Ok(Self::rgb(r * 17, g * 17, b * 17))
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for HexColor {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Palette of the question chart: green, then red.
pub const DEFAULT_SERIES_COLORS: [HexColor; 2] =
    [HexColor::rgb(0x7B, 0xB6, 0x61), HexColor::rgb(0xE0, 0x3C, 0x31)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerStyle {
    Circle,
    FilledCircle,
    Square,
    FilledSquare,
    Diamond,
    FilledDiamond,
    X,
    Plus,
}

impl MarkerStyle {
    pub fn is_filled(self) -> bool {
        matches!(
            self,
            MarkerStyle::FilledCircle | MarkerStyle::FilledSquare | MarkerStyle::FilledDiamond
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarkerOptions {
    pub size: f32,
    pub style: MarkerStyle,
}

impl Default for MarkerOptions {
    fn default() -> Self {
        Self {
            size: 10.0,
            style: MarkerStyle::FilledCircle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointLabels {
    pub show: bool,
}

impl Default for PointLabels {
    fn default() -> Self {
        Self { show: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Animation {
    /// Entrance duration in milliseconds.
    pub speed: u64,
}

impl Default for Animation {
    fn default() -> Self {
        Self { speed: 2000 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererOptions {
    pub animation: Animation,
}

/// Options for one plotted series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeriesOptions {
    pub marker_options: MarkerOptions,
    pub point_labels: PointLabels,
    pub renderer_options: RendererOptions,
    pub show_line: bool,
}

impl Default for SeriesOptions {
    fn default() -> Self {
        Self {
            marker_options: MarkerOptions::default(),
            point_labels: PointLabels::default(),
            renderer_options: RendererOptions::default(),
            show_line: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotatedText {
    /// Rotation in degrees, counter-clockwise negative.
    pub angle: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AxesDefaults {
    pub tick_renderer: String,
    pub label_renderer: String,
    pub tick_options: RotatedText,
    pub label_options: RotatedText,
}

impl Default for AxesDefaults {
    fn default() -> Self {
        Self {
            tick_renderer: "CanvasAxisTickRenderer".to_string(),
            label_renderer: "CanvasAxisLabelRenderer".to_string(),
            tick_options: RotatedText { angle: -20.0 },
            label_options: RotatedText { angle: -45.0 },
        }
    }
}

impl Default for RotatedText {
    fn default() -> Self {
        Self { angle: 0.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AxisOptions {
    pub show: bool,
    pub label: String,
    /// Range padding factor; 0 lets points sit on the grid edge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pad: Option<f64>,
    pub show_ticks: bool,
}

impl Default for AxisOptions {
    fn default() -> Self {
        Self {
            show: true,
            label: String::new(),
            pad: None,
            show_ticks: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Axes {
    pub xaxis: AxisOptions,
    pub yaxis: AxisOptions,
}

impl Default for Axes {
    fn default() -> Self {
        Self {
            xaxis: AxisOptions {
                show: false,
                label: "X Axis".to_string(),
                pad: Some(0.0),
                show_ticks: true,
            },
            yaxis: AxisOptions {
                label: "Y Axis".to_string(),
                ..AxisOptions::default()
            },
        }
    }
}

/// Which coordinates the tooltip reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TooltipAxes {
    X,
    Y,
    Xy,
    Yx,
    Both,
}

/// Compass position of the tooltip relative to the highlighted marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TooltipLocation {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HighlighterOptions {
    pub show: bool,
    pub show_label: bool,
    /// Number of y values per data point. Only passed through to the
    /// options object; every sample here carries a single y.
    #[serde(rename = "yvalues")]
    pub y_values: u32,
    pub tooltip_axes: TooltipAxes,
    pub format_string: String,
    /// Pixels added to the marker size for the highlight and its hit area.
    pub size_adjust: f32,
    pub tooltip_location: TooltipLocation,
}

impl Default for HighlighterOptions {
    fn default() -> Self {
        Self {
            show: true,
            show_label: true,
            y_values: 3,
            tooltip_axes: TooltipAxes::Y,
            format_string: "%#.2f".to_string(),
            size_adjust: 7.5,
            tooltip_location: TooltipLocation::Ne,
        }
    }
}

/// Complete chart configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfig {
    pub title: String,
    pub animate: bool,
    /// Per-series options by index; series past the end use the defaults.
    pub series: Vec<SeriesOptions>,
    pub axes_defaults: AxesDefaults,
    pub axes: Axes,
    pub series_colors: Vec<HexColor>,
    pub highlighter: HighlighterOptions,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: "Graph Of a question".to_string(),
            animate: true,
            series: vec![SeriesOptions::default()],
            axes_defaults: AxesDefaults::default(),
            axes: Axes::default(),
            series_colors: DEFAULT_SERIES_COLORS.to_vec(),
            highlighter: HighlighterOptions::default(),
        }
    }
}

impl ChartConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.series_colors.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        for options in &self.series {
            let size = options.marker_options.size;
            if !(size > 0.0 && size <= MAX_MARKER_SIZE) {
                return Err(ConfigError::InvalidMarkerSize(size));
            }
            if self.animate && options.renderer_options.animation.speed == 0 {
                return Err(ConfigError::InvalidAnimationSpeed);
            }
        }
        let adjust = self.highlighter.size_adjust;
        if !(adjust >= 0.0 && adjust <= MAX_SIZE_ADJUST) {
            return Err(ConfigError::InvalidSizeAdjust(adjust));
        }
        self.tooltip_format()?;
        Ok(())
    }

    /// Options of the series at `index`.
    pub fn series_options(&self, index: usize) -> SeriesOptions {
        self.series.get(index).cloned().unwrap_or_default()
    }

    /// Palette color for the series at `index`; the palette repeats.
    pub fn color_for(&self, index: usize) -> HexColor {
        if self.series_colors.is_empty() {
            return DEFAULT_SERIES_COLORS[index % DEFAULT_SERIES_COLORS.len()];
        }
        self.series_colors[index % self.series_colors.len()]
    }

    pub fn tooltip_format(&self) -> Result<NumberFormat, FormatError> {
        NumberFormat::parse(&self.highlighter.format_string)
    }

    /// Entrance animation length, `None` when animation is off.
    pub fn entrance_duration(&self) -> Option<Duration> {
        self.animate.then(|| {
            Duration::from_millis(self.series_options(0).renderer_options.animation.speed)
        })
    }

    /// Options object in plotting-widget form.
    pub fn to_plot_options(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
