//! Data processing modules.

pub mod extraction;
pub mod stats;

// Re-export key types for convenience
pub use extraction::{extract_series, ExtractionError, SampleSeries};
pub use stats::{describe, first_difference, DescriptiveStats};
