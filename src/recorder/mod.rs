//! Dataset persistence
//!
//! Owns the output CSV lifecycle: creation with a date-stamped name, header
//! emission, per-row append with immediate flush, and idempotent close.

mod row;

pub use row::OutputRow;

use chrono::Local;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{CaptureError, Result};

/// Append-only CSV dataset handle
///
/// Starts closed; `open` replaces any prior file. `close` on a closed or
/// never-opened handle is a no-op.
#[derive(Debug, Default)]
pub struct CsvRecorder {
    file: Option<File>,
    path: Option<PathBuf>,
}

impl CsvRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the dataset for the current date and emit the header row
    pub fn open(&mut self, dir: &Path, symbol: &str, depth: usize) -> Result<PathBuf> {
        self.close()?;

        fs::create_dir_all(dir)?;

        let date = Local::now().format("%Y_%m_%d");
        let path = dir.join(format!("{symbol}_orderbook_{date}.csv"));

        let mut file = File::create(&path)?;
        writeln!(file, "{}", OutputRow::header(depth).join(","))?;
        file.flush()?;

        self.file = Some(file);
        self.path = Some(path.clone());

        Ok(path)
    }

    /// Append one row, flushing before returning
    pub fn append(&mut self, row: &OutputRow) -> Result<()> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| CaptureError::DatasetError("dataset is not open".to_string()))?;

        writeln!(file, "{}", row.fields().join(","))?;
        file.flush()?;

        Ok(())
    }

    /// Flush and close the dataset; safe to call repeatedly
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
            if let Some(path) = &self.path {
                info!(path = %path.display(), "Dataset file closed");
            }
        }
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Path of the current (or most recently opened) dataset
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
