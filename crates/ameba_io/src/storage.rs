use crate::persistence::ConfigStore;
use ameba_core::Tunables;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Commands for the background writer thread.
pub enum WriterCommand {
    /// Writes the tunables unless they match the last successful write.
    Persist(Tunables),
    /// Replies once every earlier command has been handled.
    Flush(Sender<()>),
    /// Shutdown the writer thread.
    Stop,
}

/// Counters shared with the writer thread.
#[derive(Debug, Default)]
pub struct WriterStats {
    pub written: AtomicU64,
    pub skipped: AtomicU64,
    pub failed: AtomicU64,
}

/// Persists tunables off the tick path.
///
/// Requests are queued and handled in order by a dedicated thread. A
/// request whose fingerprint equals the last successful write is skipped.
pub struct ConfigWriter {
    sender: Sender<WriterCommand>,
    stats: Arc<WriterStats>,
    handle: Option<JoinHandle<()>>,
}

impl ConfigWriter {
    pub fn spawn(store: ConfigStore) -> Self {
        let (tx, rx) = mpsc::channel();
        let stats = Arc::new(WriterStats::default());
        let thread_stats = Arc::clone(&stats);

        let handle = thread::spawn(move || {
            let mut last_fingerprint: Option<String> = None;
            while let Ok(cmd) = rx.recv() {
                match cmd {
                    WriterCommand::Persist(tunables) => {
                        let fingerprint = tunables.fingerprint();
                        if last_fingerprint.as_deref() == Some(fingerprint.as_str()) {
                            thread_stats.skipped.fetch_add(1, Ordering::Relaxed);
                            continue;
                        }
                        match store.save(&tunables) {
                            Ok(()) => {
                                tracing::debug!(path = %store.path().display(), "Persisted tunables");
                                thread_stats.written.fetch_add(1, Ordering::Relaxed);
                                last_fingerprint = Some(fingerprint);
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "Failed to persist tunables");
                                thread_stats.failed.fetch_add(1, Ordering::Relaxed);
                            }
                        }
                    }
                    WriterCommand::Flush(reply) => {
                        let _ = reply.send(());
                    }
                    WriterCommand::Stop => break,
                }
            }
        });

        Self {
            sender: tx,
            stats,
            handle: Some(handle),
        }
    }

    /// Queues a write. Never blocks; a stopped writer drops the request.
    pub fn persist(&self, tunables: Tunables) {
        let _ = self.sender.send(WriterCommand::Persist(tunables));
    }

    /// Blocks until every queued request has been handled.
    pub fn flush(&self) {
        let (tx, rx) = mpsc::channel();
        if self.sender.send(WriterCommand::Flush(tx)).is_ok() {
            let _ = rx.recv();
        }
    }

    #[must_use]
    pub fn stats(&self) -> &WriterStats {
        &self.stats
    }

    /// Drains the queue and joins the thread.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let _ = self.sender.send(WriterCommand::Stop);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ConfigWriter {
    fn drop(&mut self) {
        self.shutdown();
    }
}
