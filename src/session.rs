//! Capture session state
//!
//! One instance per process, shared between the connection manager and the
//! shutdown coordinator. The message counter spans reconnects; the dataset
//! handle and connection start time are per-connection.

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::config::Config;
use crate::error::Result;
use crate::recorder::{CsvRecorder, OutputRow};

/// Shared handle to the process-wide session
pub type SharedSession = Arc<Mutex<Session>>;

#[derive(Debug, Default)]
pub struct Session {
    recorder: CsvRecorder,
    message_count: u64,
    connection_start: Option<Instant>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedSession {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Open a fresh dataset for a newly established connection
    ///
    /// Resets the connection start time; the cumulative message counter is
    /// left untouched.
    pub fn open_dataset(&mut self, config: &Config) -> Result<()> {
        let path = self.recorder.open(
            std::path::Path::new(&config.output_dir),
            &config.symbol,
            config.price_levels,
        )?;
        self.connection_start = Some(Instant::now());

        info!(
            path = %path.display(),
            levels = config.price_levels,
            symbol = %config.symbol,
            "Connected - logging order book data"
        );
        Ok(())
    }

    /// Count one received message and return the cumulative total
    pub fn count_message(&mut self) -> u64 {
        self.message_count += 1;
        self.message_count
    }

    pub fn write_row(&mut self, row: &OutputRow) -> Result<()> {
        self.recorder.append(row)
    }

    pub fn message_count(&self) -> u64 {
        self.message_count
    }

    pub fn connection_start(&self) -> Option<Instant> {
        self.connection_start
    }

    pub fn dataset_open(&self) -> bool {
        self.recorder.is_open()
    }

    /// Close the dataset and log the session summary
    ///
    /// Used by both the connection-close path and signal shutdown; close
    /// errors are logged, never raised. Repeated calls are no-ops.
    pub fn close_dataset(&mut self) {
        if let Err(e) = self.recorder.close() {
            error!(error = %e, "Error closing dataset file");
        }

        if let Some(started) = self.connection_start.take() {
            info!(
                duration_secs = started.elapsed().as_secs_f64(),
                total_messages = self.message_count,
                "Connection closed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(dir: &std::path::Path) -> Config {
        Config {
            output_dir: dir.to_string_lossy().to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_counter_survives_dataset_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new();

        session.open_dataset(&test_config(dir.path())).unwrap();
        assert_eq!(session.count_message(), 1);
        assert_eq!(session.count_message(), 2);
        session.close_dataset();

        session.open_dataset(&test_config(dir.path())).unwrap();
        assert_eq!(session.count_message(), 3);
        session.close_dataset();
    }

    #[test]
    fn test_close_without_open_is_safe() {
        let mut session = Session::new();
        session.close_dataset();
        session.close_dataset();
        assert_eq!(session.message_count(), 0);
        assert!(!session.dataset_open());
    }

    #[test]
    fn test_open_resets_connection_start() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new();
        assert!(session.connection_start().is_none());

        session.open_dataset(&test_config(dir.path())).unwrap();
        assert!(session.connection_start().is_some());
        assert!(session.dataset_open());

        session.close_dataset();
        assert!(session.connection_start().is_none());
    }
}
