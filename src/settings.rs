//! Application Settings
//! JSON settings file with every field optional.

use crate::charts::{ChartConfig, ConfigError, DEFAULT_EXPORT_SIZE, DEFAULT_REGION};
use crate::data::DEFAULT_WINDOW_DAYS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid chart settings: {0}")]
    Chart(#[from] ConfigError),
    #[error("window_days must be at least 1")]
    EmptyWindow,
    #[error("region must not be empty")]
    EmptyRegion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_EXPORT_SIZE.0,
            height: DEFAULT_EXPORT_SIZE.1,
        }
    }
}

impl ExportSettings {
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Display region the chart is bound to.
    pub region: String,
    /// Look-back window for question results, in days.
    pub window_days: u32,
    /// Answer history CSV; the placeholder series is used when absent.
    pub data_file: Option<PathBuf>,
    pub export: ExportSettings,
    pub chart: ChartConfig,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            window_days: DEFAULT_WINDOW_DAYS,
            data_file: None,
            export: ExportSettings::default(),
            chart: ChartConfig::default(),
        }
    }
}

impl AppSettings {
    /// Load and validate a settings file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&text)?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.region.trim().is_empty() {
            return Err(SettingsError::EmptyRegion);
        }
        if self.window_days == 0 {
            return Err(SettingsError::EmptyWindow);
        }
        self.chart.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_object_gives_defaults() {
        let settings = AppSettings::from_json("{}").unwrap();
        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.region, "chart1");
        assert_eq!(settings.window_days, 7);
        assert_eq!(settings.export.size(), (800, 500));
    }

    #[test]
    fn overrides_are_applied() {
        let settings = AppSettings::from_json(
            r#"{
                "region": "history",
                "window_days": 30,
                "data_file": "results.csv",
                "chart": { "title": "Sleep quality", "animate": false }
            }"#,
        )
        .unwrap();
        assert_eq!(settings.region, "history");
        assert_eq!(settings.window_days, 30);
        assert_eq!(settings.data_file, Some(PathBuf::from("results.csv")));
        assert_eq!(settings.chart.title, "Sleep quality");
        assert!(!settings.chart.animate);
        assert_eq!(settings.chart.highlighter.format_string, "%#.2f");
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            AppSettings::from_json(r#"{ "window_days": 0 }"#),
            Err(SettingsError::EmptyWindow)
        ));
        assert!(matches!(
            AppSettings::from_json(r#"{ "region": " " }"#),
            Err(SettingsError::EmptyRegion)
        ));
        assert!(matches!(
            AppSettings::from_json(r#"{ "chart": { "seriesColors": [] } }"#),
            Err(SettingsError::Chart(ConfigError::EmptyPalette))
        ));
        assert!(matches!(
            AppSettings::from_json("{ nope"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "window_days": 14 }}"#).unwrap();
        file.flush().unwrap();

        let settings = AppSettings::load(file.path()).unwrap();
        assert_eq!(settings.window_days, 14);

        let missing = AppSettings::load(Path::new("/definitely/not/here.json"));
        assert!(matches!(missing, Err(SettingsError::Read { .. })));
    }
}
