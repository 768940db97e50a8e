//! Timestamped archiving of the input log file.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use log::info;
use thiserror::Error;

use crate::config::BackupConfig;

/// Errors that can occur during backup operations.
#[derive(Error, Debug)]
pub enum BackupError {
    #[error("failed to create backup directory '{path}': {source}")]
    CreateDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to copy '{src}' to '{dest}': {source}")]
    Copy {
        src: String,
        dest: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for backup operations.
pub type Result<T> = std::result::Result<T, BackupError>;

/// Copy the input file into the backup directory under a timestamped name.
///
/// The destination file is named by formatting the current local time with
/// the configured format (default `%d-%m-%Y %Hh%Mm%Ss`), keeping the source
/// file's extension. The backup directory is created if it does not exist.
/// Two invocations within the same second overwrite each other.
///
/// # Returns
///
/// The path of the archive copy.
pub fn backup_file(src: &Path, config: &BackupConfig) -> Result<PathBuf> {
    let backup_dir = PathBuf::from(&config.directory);
    fs::create_dir_all(&backup_dir).map_err(|e| BackupError::CreateDirectory {
        path: backup_dir.display().to_string(),
        source: e,
    })?;

    let stamp = Local::now().format(&config.timestamp_format).to_string();
    let extension = src
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    let dest = backup_dir.join(format!("{}{}", stamp, extension));

    fs::copy(src, &dest).map_err(|e| BackupError::Copy {
        src: src.display().to_string(),
        dest: dest.display().to_string(),
        source: e,
    })?;

    info!("Backed up {} to {}", src.display(), dest.display());

    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_backup_is_byte_identical() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("input.vec");
        let mut file = File::create(&src).unwrap();
        writeln!(file, "16\tvector\t1.0\t2.0").unwrap();
        writeln!(file, "17\tvector\t3.0\t4.0").unwrap();

        let config = BackupConfig {
            directory: temp_dir.path().join("backup").display().to_string(),
            ..BackupConfig::default()
        };

        let dest = backup_file(&src, &config).unwrap();
        assert!(dest.exists());
        assert_eq!(dest.extension().unwrap(), "vec");
        assert_eq!(fs::read(&src).unwrap(), fs::read(&dest).unwrap());
    }

    #[test]
    fn test_backup_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("input.vec");
        File::create(&src).unwrap();

        let nested = temp_dir.path().join("a").join("b");
        let config = BackupConfig {
            directory: nested.display().to_string(),
            ..BackupConfig::default()
        };

        let dest = backup_file(&src, &config).unwrap();
        assert!(nested.exists());
        assert!(dest.starts_with(&nested));
    }

    #[test]
    fn test_backup_missing_source_fails() {
        let temp_dir = TempDir::new().unwrap();
        let config = BackupConfig {
            directory: temp_dir.path().join("backup").display().to_string(),
            ..BackupConfig::default()
        };

        let result = backup_file(&temp_dir.path().join("absent.vec"), &config);
        assert!(matches!(result, Err(BackupError::Copy { .. })));
    }
}
