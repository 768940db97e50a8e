//! Command-line interface for the `.vec` analysis pipeline.

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::AnalyzerConfig;
use crate::core::backup::backup_file;
use crate::core::loaders::{load_vec_log, RecordRange, VecLog};
use crate::core::writers::{write_series_csv, write_stats_csv};
use crate::processors::extraction::{extract_series, SampleSeries};
use crate::processors::stats::describe;
use crate::visualization::{plot_histogram, plot_series_line};

#[derive(Parser)]
#[command(name = "veclog-pipeline")]
#[command(about = "Localization .vec log analysis pipeline", version)]
pub struct Cli {
    /// Path to YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Write log records to log/log-<timestamp> under this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: backup, range extraction, statistics and plots
    Analyze {
        /// Input .vec file
        input: PathBuf,
        /// Directory for the generated PNG images
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
        /// Skip the timestamped backup copy
        #[arg(long)]
        no_backup: bool,
        /// Range whose x-differences feed the delay histogram
        #[arg(long, default_value = "error")]
        delay_range: String,
        /// Export extracted series and statistics as CSV into this directory
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },

    /// Print descriptive statistics for both ranges without plotting
    Stats {
        /// Input .vec file
        input: PathBuf,
    },

    /// Archive the input file to a timestamped backup copy
    Backup {
        /// Input .vec file
        input: PathBuf,
    },

    /// Render the line plot and histogram for a single range
    Plot {
        /// Input .vec file
        input: PathBuf,
        /// Range to plot ("error" or "area")
        #[arg(short, long)]
        range: String,
        /// Directory for the generated PNG images
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },
}

/// Create a spinner for indeterminate operations
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Print a summary box
fn print_summary(title: &str, items: &[(&str, String)]) {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║ {:<62} ║", title);
    println!("╠══════════════════════════════════════════════════════════════╣");
    for (key, value) in items {
        let display_value = if value.len() > 39 {
            format!("{}...", &value[..36])
        } else {
            value.clone()
        };
        println!("║ {:<20}: {:<39} ║", key, display_value);
    }
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
}

pub fn run() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity (must come first)
    let filter = match (cli.verbose, &cli.log_dir) {
        (0, None) => log::LevelFilter::Warn,
        (0, Some(_)) | (1, _) => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(filter).format_timestamp_secs();

    if let Some(dir) = &cli.log_dir {
        match open_log_file(dir) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => {
                eprintln!("Failed to open log file under {}: {}", dir.display(), e);
                std::process::exit(1);
            }
        }
    }

    builder.init();

    // Load config
    let config = match &cli.config {
        Some(path) => match AnalyzerConfig::from_yaml(path) {
            Ok(cfg) => {
                info!("Loaded config from: {}", path.display());
                cfg
            }
            Err(e) => {
                log::warn!(
                    "Failed to load config from {}: {}, using defaults",
                    path.display(),
                    e
                );
                AnalyzerConfig::default()
            }
        },
        None => AnalyzerConfig::default(),
    };

    // Dispatch to subcommands
    match cli.command {
        Commands::Analyze {
            input,
            output_dir,
            no_backup,
            delay_range,
            export_dir,
        } => {
            cmd_analyze(&input, &output_dir, no_backup, &delay_range, export_dir, &config);
        }
        Commands::Stats { input } => {
            cmd_stats(&input, &config);
        }
        Commands::Backup { input } => {
            cmd_backup(&input, &config);
        }
        Commands::Plot {
            input,
            range,
            output_dir,
        } => {
            cmd_plot(&input, &range, &output_dir, &config);
        }
    }
}

/// Open `log/log-<timestamp>` under the given directory for appending.
fn open_log_file(dir: &Path) -> std::io::Result<File> {
    fs::create_dir_all(dir)?;
    let stamp = Local::now().format("%d-%m-%Y %Hh%Mm%Ss");
    File::create(dir.join(format!("log-{}", stamp)))
}

fn cmd_analyze(
    input: &Path,
    output_dir: &Path,
    no_backup: bool,
    delay_range: &str,
    export_dir: Option<PathBuf>,
    config: &AnalyzerConfig,
) {
    let start = Instant::now();

    println!("Analyzing localization log...");
    println!("Input: {}", input.display());
    println!("Output directory: {}", output_dir.display());

    let spinner = create_spinner("Loading .vec log...");

    match run_analysis(input, output_dir, no_backup, delay_range, export_dir, config) {
        Ok(mut items) => {
            spinner.finish_and_clear();
            items.push(("Duration", format!("{:.2?}", start.elapsed())));
            print_summary("Analysis Complete", &items);
        }
        Err(e) => {
            spinner.finish_and_clear();
            error!("Analysis failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run_analysis(
    input: &Path,
    output_dir: &Path,
    no_backup: bool,
    delay_range: &str,
    export_dir: Option<PathBuf>,
    config: &AnalyzerConfig,
) -> Result<Vec<(&'static str, String)>> {
    let log = load_vec_log(input, &config.sentinels)
        .with_context(|| format!("loading {}", input.display()))?;

    let backup_path = if no_backup {
        None
    } else {
        Some(backup_file(input, &config.backup).context("archiving input file")?)
    };

    let (error_range, area_range) = log.ranges(&config.sentinels)?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    // Same processing order as the original tooling: Area first, then Error.
    let mut series = Vec::with_capacity(2);
    let mut stats_entries = Vec::with_capacity(2);

    for range in [&area_range, &error_range] {
        let extracted = extract_range(&log, range, config)?;

        let stats = describe(&extracted.y)
            .ok_or_else(|| anyhow!("range '{}' holds no samples", range.name))?;
        info!("{} statistics:\n{}", range.name, stats);
        println!("{}", range.name);
        println!("{}", stats);

        plot_series_line(
            &output_dir.join(format!("{}.png", range.name)),
            &extracted,
            &config.plot,
        )
        .with_context(|| format!("plotting {} series", range.name))?;

        plot_histogram(
            &output_dir.join(format!("{}_hist.png", range.name)),
            &extracted.y,
            &config.plot,
        )
        .with_context(|| format!("plotting {} histogram", range.name))?;

        stats_entries.push((range.name.clone(), stats));
        series.push(extracted);
    }

    // Delay histogram over the explicitly requested range.
    let delay_source = find_series(&series, delay_range)
        .ok_or_else(|| anyhow!("unknown delay range '{}'", delay_range))?;
    let delays = delay_source.delays();

    let delay_summary = match describe(&delays) {
        Some(stats) => {
            info!("Delay statistics ({}):\n{}", delay_source.name, stats);
            println!("Delay ({})", delay_source.name);
            println!("{}", stats);

            plot_histogram(
                &output_dir.join("Delay_hist.png"),
                &delays,
                &config.plot,
            )
            .context("plotting delay histogram")?;

            stats_entries.push((format!("Delay ({})", delay_source.name), stats));
            format!("{} samples", delays.len())
        }
        None => {
            info!(
                "Range '{}' has a single sample, no delays to describe",
                delay_source.name
            );
            "skipped (single sample)".to_string()
        }
    };

    if let Some(dir) = &export_dir {
        for s in &series {
            write_series_csv(&dir.join(format!("{}_series.csv", s.name)), s)
                .with_context(|| format!("exporting {} series", s.name))?;
        }
        write_stats_csv(&dir.join("stats.csv"), &stats_entries)
            .context("exporting statistics")?;
    }

    let mut items = vec![
        ("Input file", input.display().to_string()),
        ("Lines loaded", log.len().to_string()),
        (
            "Error range",
            format!("lines {}-{}", error_range.start, error_range.end),
        ),
        (
            "Area range",
            format!("lines {}-{}", area_range.start, area_range.end),
        ),
        ("Delay source", delay_source.name.clone()),
        ("Delays", delay_summary),
        ("Plots", output_dir.display().to_string()),
    ];

    if let Some(path) = backup_path {
        items.push(("Backup", path.display().to_string()));
    }
    if let Some(dir) = export_dir {
        items.push(("CSV export", dir.display().to_string()));
    }

    Ok(items)
}

fn cmd_stats(input: &Path, config: &AnalyzerConfig) {
    let start = Instant::now();

    match run_stats(input, config) {
        Ok(items) => {
            let mut items = items;
            items.push(("Duration", format!("{:.2?}", start.elapsed())));
            print_summary("Statistics Complete", &items);
        }
        Err(e) => {
            error!("Statistics failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run_stats(input: &Path, config: &AnalyzerConfig) -> Result<Vec<(&'static str, String)>> {
    let log = load_vec_log(input, &config.sentinels)
        .with_context(|| format!("loading {}", input.display()))?;
    let (error_range, area_range) = log.ranges(&config.sentinels)?;

    for range in [&area_range, &error_range] {
        let extracted = extract_range(&log, range, config)?;
        let stats = describe(&extracted.y)
            .ok_or_else(|| anyhow!("range '{}' holds no samples", range.name))?;
        println!("{}", range.name);
        println!("{}", stats);
    }

    Ok(vec![
        ("Input file", input.display().to_string()),
        ("Lines loaded", log.len().to_string()),
        (
            "Error range",
            format!("lines {}-{}", error_range.start, error_range.end),
        ),
        (
            "Area range",
            format!("lines {}-{}", area_range.start, area_range.end),
        ),
    ])
}

fn cmd_backup(input: &Path, config: &AnalyzerConfig) {
    let start = Instant::now();

    match backup_file(input, &config.backup) {
        Ok(dest) => {
            print_summary(
                "Backup Complete",
                &[
                    ("Input file", input.display().to_string()),
                    ("Backup", dest.display().to_string()),
                    ("Duration", format!("{:.2?}", start.elapsed())),
                ],
            );
        }
        Err(e) => {
            error!("Backup failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_plot(input: &Path, range_name: &str, output_dir: &Path, config: &AnalyzerConfig) {
    let start = Instant::now();

    let spinner = create_spinner("Loading .vec log...");

    match run_plot(input, range_name, output_dir, config) {
        Ok(items) => {
            spinner.finish_and_clear();
            let mut items = items;
            items.push(("Duration", format!("{:.2?}", start.elapsed())));
            print_summary("Plot Complete", &items);
        }
        Err(e) => {
            spinner.finish_and_clear();
            error!("Plot failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run_plot(
    input: &Path,
    range_name: &str,
    output_dir: &Path,
    config: &AnalyzerConfig,
) -> Result<Vec<(&'static str, String)>> {
    let log = load_vec_log(input, &config.sentinels)
        .with_context(|| format!("loading {}", input.display()))?;
    let (error_range, area_range) = log.ranges(&config.sentinels)?;

    let range = [&error_range, &area_range]
        .into_iter()
        .find(|r| r.name.eq_ignore_ascii_case(range_name))
        .ok_or_else(|| anyhow!("unknown range '{}'", range_name))?;

    let extracted = extract_range(&log, range, config)?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    let line_path = output_dir.join(format!("{}.png", range.name));
    let hist_path = output_dir.join(format!("{}_hist.png", range.name));

    plot_series_line(&line_path, &extracted, &config.plot)
        .with_context(|| format!("plotting {} series", range.name))?;
    plot_histogram(&hist_path, &extracted.y, &config.plot)
        .with_context(|| format!("plotting {} histogram", range.name))?;

    Ok(vec![
        ("Input file", input.display().to_string()),
        ("Range", format!("{} (lines {}-{})", range.name, range.start, range.end)),
        ("Samples", extracted.len().to_string()),
        ("Line plot", line_path.display().to_string()),
        ("Histogram", hist_path.display().to_string()),
    ])
}

fn extract_range(
    log: &VecLog,
    range: &RecordRange,
    config: &AnalyzerConfig,
) -> Result<SampleSeries> {
    let series = extract_series(log, range, &config.columns)
        .with_context(|| format!("extracting range '{}'", range.name))?;
    info!("Extracted {} samples from range '{}'", series.len(), series.name);
    Ok(series)
}

fn find_series<'a>(series: &'a [SampleSeries], name: &str) -> Option<&'a SampleSeries> {
    series.iter().find(|s| s.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_test_log(dir: &Path) -> PathBuf {
        let path = dir.join("General-0.vec");
        let mut file = File::create(&path).unwrap();
        // 25 lines; sentinel "16" at line 21, "17" at line 23.
        for i in 1..=25u32 {
            let first = match i {
                21 => "16".to_string(),
                23 => "17".to_string(),
                _ => format!("{}", i + 100),
            };
            writeln!(file, "{}\tvector\t{}.0\t{}.5", first, i, i * 2).unwrap();
        }
        path
    }

    #[test]
    fn test_run_analysis_end_to_end() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_test_log(temp_dir.path());
        let output_dir = temp_dir.path().join("plots");
        let export_dir = temp_dir.path().join("export");

        let mut config = AnalyzerConfig::default();
        config.backup.directory = temp_dir.path().join("backup").display().to_string();

        let items = run_analysis(
            &input,
            &output_dir,
            false,
            "error",
            Some(export_dir.clone()),
            &config,
        )
        .unwrap();

        // Error range is the single line 21, Area covers lines 22-23.
        let error_entry = items.iter().find(|(k, _)| *k == "Error range").unwrap();
        assert_eq!(error_entry.1, "lines 21-21");
        let area_entry = items.iter().find(|(k, _)| *k == "Area range").unwrap();
        assert_eq!(area_entry.1, "lines 22-23");

        assert!(output_dir.join("Error.png").exists());
        assert!(output_dir.join("Error_hist.png").exists());
        assert!(output_dir.join("Area.png").exists());
        assert!(output_dir.join("Area_hist.png").exists());
        // Error range has one sample, so no delay histogram.
        assert!(!output_dir.join("Delay_hist.png").exists());

        assert!(export_dir.join("Error_series.csv").exists());
        assert!(export_dir.join("Area_series.csv").exists());
        assert!(export_dir.join("stats.csv").exists());
    }

    #[test]
    fn test_run_analysis_delay_from_area() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_test_log(temp_dir.path());
        let output_dir = temp_dir.path().join("plots");

        let config = AnalyzerConfig::default();
        let items = run_analysis(&input, &output_dir, true, "area", None, &config).unwrap();

        // The two-sample Area range yields one delay.
        let delays = items.iter().find(|(k, _)| *k == "Delays").unwrap();
        assert_eq!(delays.1, "1 samples");
        assert!(output_dir.join("Delay_hist.png").exists());
    }

    #[test]
    fn test_run_analysis_unknown_delay_range() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_test_log(temp_dir.path());

        let config = AnalyzerConfig::default();
        let result = run_analysis(
            &input,
            &temp_dir.path().join("plots"),
            true,
            "bogus",
            None,
            &config,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_run_stats_reports_ranges() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_test_log(temp_dir.path());

        let config = AnalyzerConfig::default();
        let items = run_stats(&input, &config).unwrap();

        let lines = items.iter().find(|(k, _)| *k == "Lines loaded").unwrap();
        assert_eq!(lines.1, "25");
    }

    #[test]
    fn test_run_plot_single_range() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_test_log(temp_dir.path());
        let output_dir = temp_dir.path().join("plots");

        let config = AnalyzerConfig::default();
        run_plot(&input, "area", &output_dir, &config).unwrap();

        assert!(output_dir.join("Area.png").exists());
        assert!(output_dir.join("Area_hist.png").exists());
    }
}
