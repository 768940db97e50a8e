//! Core data types and I/O operations.

pub mod backup;
pub mod loaders;
pub mod writers;

pub use backup::backup_file;
pub use loaders::{load_vec_log, RecordRange, VecLog};
pub use writers::{write_series_csv, write_stats_csv, WriteError};
