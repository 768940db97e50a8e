//! Loader for `.vec` measurement log exports.
//!
//! This module parses the tab-delimited text export of the localization
//! instrument. While reading, it scans each record's first field for the two
//! sentinel markers that delimit the "Error" and "Area" record ranges.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::info;
use thiserror::Error;

use crate::config::SentinelConfig;

/// Errors that can occur during log loading.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Empty file: {0}")]
    EmptyFile(PathBuf),

    #[error("Sentinel row '{marker}' not found in {path}")]
    MissingSentinel { marker: String, path: PathBuf },

    #[error("Invalid range '{name}': lines {start}..{end}")]
    InvalidRange {
        name: String,
        start: usize,
        end: usize,
    },
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

/// A contiguous, 1-indexed inclusive span of log lines with a category label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRange {
    /// First line of the range (1-indexed, inclusive).
    pub start: usize,
    /// Last line of the range (1-indexed, inclusive).
    pub end: usize,
    /// Category label, e.g. "Error" or "Area".
    pub name: String,
}

impl RecordRange {
    /// Returns the number of lines covered by this range.
    #[inline]
    pub fn len(&self) -> usize {
        (self.end + 1).saturating_sub(self.start)
    }

    /// Returns true if the range covers no lines.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

/// Container for a loaded `.vec` log.
#[derive(Debug, Clone)]
pub struct VecLog {
    /// Raw lines of the file, trailing newlines stripped.
    pub lines: Vec<String>,
    /// 1-indexed line of the Error-range sentinel, if found.
    pub error_sentinel: Option<usize>,
    /// 1-indexed line of the Area-range sentinel, if found.
    pub area_sentinel: Option<usize>,
    /// Source file path.
    pub source_path: PathBuf,
}

impl VecLog {
    /// Returns the number of loaded lines.
    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if no lines were loaded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Derive the Error and Area record ranges from the discovered sentinels.
    ///
    /// The Error range spans `[error_start_line, error_sentinel]` and the Area
    /// range `[error_sentinel + 1, area_sentinel]`, both 1-indexed inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::MissingSentinel`] if either marker was absent
    /// from the file, and [`LoaderError::InvalidRange`] if the sentinels
    /// produce an inverted interval.
    pub fn ranges(&self, config: &SentinelConfig) -> Result<(RecordRange, RecordRange)> {
        let end_error = self.error_sentinel.ok_or_else(|| LoaderError::MissingSentinel {
            marker: config.error_marker.clone(),
            path: self.source_path.clone(),
        })?;
        let end_area = self.area_sentinel.ok_or_else(|| LoaderError::MissingSentinel {
            marker: config.area_marker.clone(),
            path: self.source_path.clone(),
        })?;

        let error_range = RecordRange {
            start: config.error_start_line,
            end: end_error,
            name: "Error".to_string(),
        };
        let area_range = RecordRange {
            start: end_error + 1,
            end: end_area,
            name: "Area".to_string(),
        };

        for range in [&error_range, &area_range] {
            if range.end < range.start || range.end > self.lines.len() {
                return Err(LoaderError::InvalidRange {
                    name: range.name.clone(),
                    start: range.start,
                    end: range.end,
                });
            }
        }

        Ok((error_range, area_range))
    }
}

/// Load a `.vec` log file and locate the sentinel rows.
///
/// Reads the file line by line, collecting the raw lines and recording the
/// 1-indexed line number of the first record whose leading tab-delimited
/// field equals each configured sentinel marker. If a marker appears more
/// than once, the last occurrence wins (matching the instrument export,
/// which writes each sentinel exactly once).
///
/// # Arguments
///
/// * `path` - Path to the `.vec` file
/// * `config` - Sentinel markers to scan for
///
/// # Errors
///
/// Returns an error if the file cannot be read or contains no lines.
pub fn load_vec_log<P: AsRef<Path>>(path: P, config: &SentinelConfig) -> Result<VecLog> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut lines = Vec::with_capacity(1024);
    let mut error_sentinel = None;
    let mut area_sentinel = None;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let first_field = line.split('\t').next().unwrap_or("");

        if first_field == config.error_marker {
            error_sentinel = Some(idx + 1);
        }
        if first_field == config.area_marker {
            area_sentinel = Some(idx + 1);
        }

        lines.push(line);
    }

    if lines.is_empty() {
        return Err(LoaderError::EmptyFile(path.to_path_buf()));
    }

    info!(
        "Loaded {} lines from {} (error sentinel: {:?}, area sentinel: {:?})",
        lines.len(),
        path.display(),
        error_sentinel,
        area_sentinel
    );

    Ok(VecLog {
        lines,
        error_sentinel,
        area_sentinel,
        source_path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    /// Write a .vec file with `total` data lines, placing the sentinel
    /// markers at the given 1-indexed lines.
    fn create_test_vec(
        dir: &Path,
        name: &str,
        total: usize,
        error_line: usize,
        area_line: usize,
    ) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        for i in 1..=total {
            let first = if i == error_line {
                "16".to_string()
            } else if i == area_line {
                "17".to_string()
            } else {
                format!("{}", i + 100)
            };
            writeln!(file, "{}\tvector\t{}.5\t{}.25", first, i, i).unwrap();
        }
        path
    }

    #[test]
    fn test_load_finds_sentinels() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_test_vec(temp_dir.path(), "log.vec", 30, 24, 28);

        let log = load_vec_log(&path, &SentinelConfig::default()).unwrap();
        assert_eq!(log.len(), 30);
        assert_eq!(log.error_sentinel, Some(24));
        assert_eq!(log.area_sentinel, Some(28));
    }

    #[test]
    fn test_ranges_from_sentinels() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_test_vec(temp_dir.path(), "log.vec", 30, 24, 28);

        let config = SentinelConfig::default();
        let log = load_vec_log(&path, &config).unwrap();
        let (error_range, area_range) = log.ranges(&config).unwrap();

        assert_eq!(error_range.start, 21);
        assert_eq!(error_range.end, 24);
        assert_eq!(error_range.name, "Error");
        assert_eq!(area_range.start, 25);
        assert_eq!(area_range.end, 28);
        assert_eq!(area_range.name, "Area");
    }

    #[test]
    fn test_single_line_ranges() {
        // Sentinel at line 21 closes a one-row Error range; sentinel at 23
        // closes a two-row Area range.
        let temp_dir = TempDir::new().unwrap();
        let path = create_test_vec(temp_dir.path(), "log.vec", 25, 21, 23);

        let config = SentinelConfig::default();
        let log = load_vec_log(&path, &config).unwrap();
        let (error_range, area_range) = log.ranges(&config).unwrap();

        assert_eq!((error_range.start, error_range.end), (21, 21));
        assert_eq!(error_range.len(), 1);
        assert_eq!((area_range.start, area_range.end), (22, 23));
        assert_eq!(area_range.len(), 2);
    }

    #[test]
    fn test_missing_sentinel_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("no_sentinel.vec");
        let mut file = File::create(&path).unwrap();
        for i in 0..25 {
            writeln!(file, "{}\tvector\t{}.0\t{}.0", i + 100, i, i).unwrap();
        }

        let config = SentinelConfig::default();
        let log = load_vec_log(&path, &config).unwrap();
        let err = log.ranges(&config).unwrap_err();
        assert!(matches!(err, LoaderError::MissingSentinel { ref marker, .. } if marker == "16"));
    }

    #[test]
    fn test_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.vec");
        File::create(&path).unwrap();

        let result = load_vec_log(&path, &SentinelConfig::default());
        assert!(matches!(result, Err(LoaderError::EmptyFile(_))));
    }

    #[test]
    fn test_inverted_range_rejected() {
        // Area sentinel before the error sentinel inverts the Area range.
        let temp_dir = TempDir::new().unwrap();
        let path = create_test_vec(temp_dir.path(), "log.vec", 30, 28, 24);

        let config = SentinelConfig::default();
        let log = load_vec_log(&path, &config).unwrap();
        let err = log.ranges(&config).unwrap_err();
        assert!(matches!(err, LoaderError::InvalidRange { ref name, .. } if name == "Area"));
    }
}
