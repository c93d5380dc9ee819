//! Graceful shutdown on termination signals
//!
//! Listens for SIGINT/SIGTERM, drains the session through the same close
//! routine used on connection close, logs final statistics, and exits 0.
//! The termination signal is the only path that ends the process.

use tracing::{error, info};

use crate::session::SharedSession;

pub struct ShutdownCoordinator {
    session: SharedSession,
}

impl ShutdownCoordinator {
    /// Register the signal handlers; call exactly once at process start
    pub fn install(session: SharedSession) {
        tokio::spawn(async move {
            let coordinator = Self { session };
            coordinator.run().await;
        });
        info!("Graceful shutdown handler registered");
    }

    async fn run(self) {
        if let Err(e) = wait_for_signal().await {
            error!(error = %e, "Failed to listen for shutdown signals");
            return;
        }

        info!("Shutdown signal received, initiating graceful shutdown");
        self.finalize().await;
    }

    /// Drain and exit; never panics past the final statistics log
    async fn finalize(self) {
        let mut session = self.session.lock().await;

        let total_messages = session.message_count();
        let connection_start = session.connection_start();

        session.close_dataset();

        if let Some(started) = connection_start {
            let runtime_secs = started.elapsed().as_secs_f64();
            let rate = if runtime_secs > 0.0 {
                total_messages as f64 / runtime_secs
            } else {
                0.0
            };
            info!(
                runtime_secs,
                total_messages,
                messages_per_sec = rate,
                "Final statistics"
            );
        } else {
            info!(total_messages, "Final statistics");
        }

        std::process::exit(0);
    }
}

#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::select! {
        _ = sigint.recv() => {},
        _ = sigterm.recv() => {},
    }
    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
