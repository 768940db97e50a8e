//! Analysis pipeline for indoor-localization `.vec` measurement logs.
//!
//! This crate provides tools for:
//! - Loading tab-delimited `.vec` exports and locating sentinel-delimited record ranges
//! - Archiving the input log to a timestamped backup copy
//! - Extracting per-range (x, y) sample series and computing descriptive statistics
//! - Rendering line plots and histograms of the extracted series as PNG images
//!
//! # Example
//!
//! ```no_run
//! use veclog_pipeline::config::SentinelConfig;
//! use veclog_pipeline::core::loaders::load_vec_log;
//!
//! let sentinels = SentinelConfig::default();
//! let log = load_vec_log("General-0.vec", &sentinels).unwrap();
//! let (error_range, area_range) = log.ranges(&sentinels).unwrap();
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod processors;
pub mod visualization;

pub use config::{AnalyzerConfig, BackupConfig, ColumnConfig, PlotConfig, SentinelConfig};
pub use core::loaders::{RecordRange, VecLog};
pub use processors::extraction::SampleSeries;
pub use processors::stats::DescriptiveStats;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
