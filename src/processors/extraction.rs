//! Extraction of numeric sample series from sentinel-delimited record ranges.

use thiserror::Error;

use crate::config::ColumnConfig;
use crate::core::loaders::{RecordRange, VecLog};

/// Errors that can occur during series extraction.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("range '{name}' ({start}..{end}) exceeds the {total} loaded lines")]
    RangeOutOfBounds {
        name: String,
        start: usize,
        end: usize,
        total: usize,
    },

    #[error("line {line}: expected at least {expected} fields, found {found}")]
    ShortLine {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}, field {field}: cannot parse '{value}' as a number")]
    BadNumber {
        line: usize,
        field: usize,
        value: String,
    },
}

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Parallel x/y sample sequences extracted from one record range.
#[derive(Debug, Clone)]
pub struct SampleSeries {
    /// Range label the series was extracted from.
    pub name: String,
    /// Sample x values (time column).
    pub x: Vec<f64>,
    /// Sample y values (measurement column).
    pub y: Vec<f64>,
}

impl SampleSeries {
    /// Returns the number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns true if the series holds no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// First-difference sequence of the x values (inter-sample delays).
    ///
    /// For input `[x0, x1, ..., xn]` the result is
    /// `[x1 - x0, ..., xn - x(n-1)]`, one element shorter than the input.
    pub fn delays(&self) -> Vec<f64> {
        super::stats::first_difference(&self.x)
    }
}

/// Extract the x/y sample series covered by a record range.
///
/// Slices `log.lines[start - 1 .. end]` (the range is 1-indexed inclusive),
/// splits each line on tabs and parses the configured column indices as
/// `f64`. Every line of the range must carry both columns; a short or
/// non-numeric line aborts the extraction with an error naming the
/// offending 1-indexed line.
pub fn extract_series(
    log: &VecLog,
    range: &RecordRange,
    columns: &ColumnConfig,
) -> Result<SampleSeries> {
    if range.start < 1 || range.end > log.lines.len() {
        return Err(ExtractionError::RangeOutOfBounds {
            name: range.name.clone(),
            start: range.start,
            end: range.end,
            total: log.lines.len(),
        });
    }

    let needed = columns.x_index.max(columns.y_index) + 1;
    let mut x = Vec::with_capacity(range.len());
    let mut y = Vec::with_capacity(range.len());

    for (offset, line) in log.lines[range.start - 1..range.end].iter().enumerate() {
        let line_no = range.start + offset;
        let fields: Vec<&str> = line.trim_end().split('\t').collect();

        if fields.len() < needed {
            return Err(ExtractionError::ShortLine {
                line: line_no,
                expected: needed,
                found: fields.len(),
            });
        }

        x.push(parse_field(fields[columns.x_index], line_no, columns.x_index)?);
        y.push(parse_field(fields[columns.y_index], line_no, columns.y_index)?);
    }

    Ok(SampleSeries {
        name: range.name.clone(),
        x,
        y,
    })
}

fn parse_field(value: &str, line: usize, field: usize) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| ExtractionError::BadNumber {
            line,
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_log(lines: &[&str]) -> VecLog {
        VecLog {
            lines: lines.iter().map(|s| s.to_string()).collect(),
            error_sentinel: None,
            area_sentinel: None,
            source_path: PathBuf::from("test.vec"),
        }
    }

    fn range(start: usize, end: usize) -> RecordRange {
        RecordRange {
            start,
            end,
            name: "Error".to_string(),
        }
    }

    #[test]
    fn test_extract_parses_configured_columns() {
        let log = test_log(&[
            "105\tvector\t0.5\t1.25",
            "106\tvector\t1.0\t2.50",
            "107\tvector\t1.5\t3.75",
        ]);

        let series = extract_series(&log, &range(1, 3), &ColumnConfig::default()).unwrap();
        assert_eq!(series.x, vec![0.5, 1.0, 1.5]);
        assert_eq!(series.y, vec![1.25, 2.50, 3.75]);
        assert_eq!(series.name, "Error");
    }

    #[test]
    fn test_extract_sub_range() {
        let log = test_log(&[
            "a\tb\t0.0\t0.0",
            "a\tb\t1.0\t10.0",
            "a\tb\t2.0\t20.0",
            "a\tb\t3.0\t30.0",
        ]);

        let series = extract_series(&log, &range(2, 3), &ColumnConfig::default()).unwrap();
        assert_eq!(series.x, vec![1.0, 2.0]);
        assert_eq!(series.y, vec![10.0, 20.0]);
    }

    #[test]
    fn test_delays_are_first_differences() {
        let log = test_log(&[
            "a\tb\t1.0\t0.0",
            "a\tb\t2.5\t0.0",
            "a\tb\t4.5\t0.0",
        ]);

        let series = extract_series(&log, &range(1, 3), &ColumnConfig::default()).unwrap();
        assert_eq!(series.delays(), vec![1.5, 2.0]);
    }

    #[test]
    fn test_short_line_reports_line_number() {
        let log = test_log(&["a\tb\t0.5\t1.0", "a\tb\t0.5"]);

        let err = extract_series(&log, &range(1, 2), &ColumnConfig::default()).unwrap_err();
        assert!(matches!(err, ExtractionError::ShortLine { line: 2, .. }));
    }

    #[test]
    fn test_bad_number_reports_field() {
        let log = test_log(&["a\tb\t0.5\tnot-a-number"]);

        let err = extract_series(&log, &range(1, 1), &ColumnConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::BadNumber { line: 1, field: 3, .. }
        ));
    }

    #[test]
    fn test_range_out_of_bounds() {
        let log = test_log(&["a\tb\t0.5\t1.0"]);

        let err = extract_series(&log, &range(1, 5), &ColumnConfig::default()).unwrap_err();
        assert!(matches!(err, ExtractionError::RangeOutOfBounds { .. }));
    }
}
