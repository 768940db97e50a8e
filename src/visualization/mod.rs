//! Plot rendering for extracted sample series.
//!
//! This module renders line plots and histograms of the extracted series as
//! PNG images using the plotters library.

use std::path::Path;

use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use thiserror::Error;

use crate::config::PlotConfig;
use crate::processors::extraction::SampleSeries;

/// Errors that can occur during plot rendering.
#[derive(Error, Debug)]
pub enum VisualizationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Plotting error: {0}")]
    PlottingError(String),

    #[error("Empty series")]
    EmptySeries,
}

/// Result type for visualization operations.
pub type Result<T> = std::result::Result<T, VisualizationError>;

/// Plot a sample series as a line of y over x and save as PNG.
///
/// The image uses the configured size (default 1850x1050, the original
/// 18.5x10.5 in at 100 DPI), a white background and the configured line
/// color. Axis text is not drawn, so rendering works without system fonts.
pub fn plot_series_line(output_path: &Path, series: &SampleSeries, config: &PlotConfig) -> Result<()> {
    if series.is_empty() {
        return Err(VisualizationError::EmptySeries);
    }

    let (x_min, x_max) = padded_bounds(&series.x);
    let (y_min, y_max) = padded_bounds(&series.y);

    let root = BitMapBackend::new(output_path, (config.width, config.height)).into_drawing_area();

    root.fill(&WHITE)
        .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .draw()
        .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;

    let [r, g, b] = config.line_color;
    let color = RGBColor(r, g, b);

    chart
        .draw_series(LineSeries::new(
            series.x.iter().zip(series.y.iter()).map(|(&x, &y)| (x, y)),
            &color,
        ))
        .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;

    root.present()
        .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;

    Ok(())
}

/// Plot a histogram of a value sequence and save as PNG.
///
/// Bins are equal-width over `[min, max]` with the configured bin count.
/// Values falling on the upper edge are counted in the last bin.
pub fn plot_histogram(output_path: &Path, values: &[f64], config: &PlotConfig) -> Result<()> {
    if values.is_empty() {
        return Err(VisualizationError::EmptySeries);
    }

    let bins = config.histogram_bins.max(1);
    let (min, max) = padded_or_exact_bounds(values);
    let bin_width = (max - min) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - min) / bin_width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    let max_count = counts.iter().copied().max().unwrap_or(0) as f64;

    let root = BitMapBackend::new(output_path, (config.width, config.height)).into_drawing_area();

    root.fill(&WHITE)
        .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .build_cartesian_2d(min..max, 0.0..(max_count * 1.05))
        .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .draw()
        .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;

    let [r, g, b] = config.line_color;
    let fill = RGBColor(r, g, b);

    chart
        .draw_series(counts.iter().enumerate().map(|(i, &count)| {
            let x0 = min + bin_width * i as f64;
            let x1 = x0 + bin_width;
            Rectangle::new([(x0, 0.0), (x1, count as f64)], fill.filled())
        }))
        .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;

    root.present()
        .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;

    Ok(())
}

/// Min/max of a sequence, widened by 5% padding (or by 1.0 if degenerate).
fn padded_bounds(values: &[f64]) -> (f64, f64) {
    let (min, max) = min_max(values);

    if (max - min).abs() < f64::EPSILON {
        (min - 1.0, max + 1.0)
    } else {
        let padding = (max - min) * 0.05;
        (min - padding, max + padding)
    }
}

/// Min/max of a sequence, widened only when all values coincide.
fn padded_or_exact_bounds(values: &[f64]) -> (f64, f64) {
    let (min, max) = min_max(values);

    if (max - min).abs() < f64::EPSILON {
        (min - 1.0, max + 1.0)
    } else {
        (min, max)
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    let mut min = f64::MAX;
    let mut max = f64::MIN;

    for &v in values {
        if v < min {
            min = v;
        }
        if v > max {
            max = v;
        }
    }

    (min, max)
}
