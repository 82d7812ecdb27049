//! Graceful shutdown handling for the application.
//!
//! Provides signal handling and the cleanup run before the process exits.

use crate::model::world::World;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Manages graceful shutdown of the application.
#[derive(Clone)]
pub struct ShutdownManager {
    shutdown_requested: Arc<AtomicBool>,
    notify: Arc<Notify>,
    save_on_exit: bool,
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownManager {
    pub fn new() -> Self {
        Self {
            shutdown_requested: Arc::new(AtomicBool::new(false)),
            notify: Arc::new(Notify::new()),
            save_on_exit: true,
        }
    }

    /// Sets whether the tunables are written on exit.
    pub fn set_save_on_exit(&mut self, save: bool) {
        self.save_on_exit = save;
    }

    pub fn request_shutdown(&self) {
        self.shutdown_requested.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
        tracing::info!("Shutdown requested");
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::SeqCst)
    }

    pub fn should_save_on_exit(&self) -> bool {
        self.save_on_exit
    }

    /// Requests shutdown when the process receives Ctrl-C.
    pub fn listen_for_ctrl_c(&self) {
        let manager = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Ctrl+C received, initiating graceful shutdown...");
                manager.request_shutdown();
            }
        });
    }

    /// Resolves once shutdown has been requested.
    pub async fn wait(&self) {
        loop {
            let notified = self.notify.notified();
            if self.is_shutdown_requested() {
                return;
            }
            notified.await;
        }
    }

    /// Performs cleanup operations before shutdown. Failures are logged.
    pub fn cleanup(&self, world: &World) {
        tracing::info!("Performing shutdown cleanup...");
        if self.save_on_exit {
            if let Err(e) = world.save_config() {
                tracing::warn!(error = %e, "Failed to save tunables on exit");
            }
        }
        tracing::info!(tick = world.tick, "Cleanup complete");
    }
}
