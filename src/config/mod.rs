//! Configuration types for the `.vec` analysis pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for sentinel-based range detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentinelConfig {
    /// First-field marker that closes the Error range (e.g., "16")
    #[serde(default = "default_error_marker")]
    pub error_marker: String,

    /// First-field marker that closes the Area range (e.g., "17")
    #[serde(default = "default_area_marker")]
    pub area_marker: String,

    /// 1-indexed line where the Error range begins
    #[serde(default = "default_error_start_line")]
    pub error_start_line: usize,
}

fn default_error_marker() -> String {
    "16".to_string()
}

fn default_area_marker() -> String {
    "17".to_string()
}

fn default_error_start_line() -> usize {
    21
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self {
            error_marker: default_error_marker(),
            area_marker: default_area_marker(),
            error_start_line: default_error_start_line(),
        }
    }
}

/// Configuration for the numeric columns extracted from each record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnConfig {
    /// 0-indexed tab-delimited field holding the x value (sample time)
    #[serde(default = "default_x_index")]
    pub x_index: usize,

    /// 0-indexed tab-delimited field holding the y value (measurement)
    #[serde(default = "default_y_index")]
    pub y_index: usize,
}

fn default_x_index() -> usize {
    2
}

fn default_y_index() -> usize {
    3
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            x_index: default_x_index(),
            y_index: default_y_index(),
        }
    }
}

/// Configuration for plot rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotConfig {
    /// Plot width in pixels (18.5 in at 100 DPI)
    #[serde(default = "default_plot_width")]
    pub width: u32,

    /// Plot height in pixels (10.5 in at 100 DPI)
    #[serde(default = "default_plot_height")]
    pub height: u32,

    /// Number of histogram bins
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,

    /// RGB color of the series line
    #[serde(default = "default_line_color")]
    pub line_color: [u8; 3],
}

fn default_plot_width() -> u32 {
    1850
}

fn default_plot_height() -> u32 {
    1050
}

fn default_histogram_bins() -> usize {
    10
}

fn default_line_color() -> [u8; 3] {
    [255, 165, 0] // orange
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: default_plot_width(),
            height: default_plot_height(),
            histogram_bins: default_histogram_bins(),
            line_color: default_line_color(),
        }
    }
}

/// Configuration for input-file archiving.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Directory receiving timestamped copies of the input file
    #[serde(default = "default_backup_dir")]
    pub directory: String,

    /// chrono format string for the archive file stem
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

fn default_backup_dir() -> String {
    "backup".to_string()
}

fn default_timestamp_format() -> String {
    "%d-%m-%Y %Hh%Mm%Ss".to_string()
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            directory: default_backup_dir(),
            timestamp_format: default_timestamp_format(),
        }
    }
}

/// Main analyzer configuration combining all sub-configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub sentinels: SentinelConfig,

    #[serde(default)]
    pub columns: ColumnConfig,

    #[serde(default)]
    pub plot: PlotConfig,

    #[serde(default)]
    pub backup: BackupConfig,
}

impl AnalyzerConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: AnalyzerConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a YAML file.
    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
