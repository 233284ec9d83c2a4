//! Fire-and-forget visit recording.
//!
//! Handlers hold a [`VisitorTracker`] and enqueue visits without waiting. A
//! single [`VisitorWorker`] drains the bounded channel into the repository.
//! When the channel is full or closed the visit is dropped with a warning;
//! the response is never delayed or failed by tracking.

use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use crate::config::VisitorConfig;
use crate::models::VisitTrack;
use crate::repository::VisitorRepository;

#[derive(Clone)]
pub struct VisitorTracker {
    tx: mpsc::Sender<VisitTrack>,
}

impl VisitorTracker {
    /// Enqueues a visit. Returns false if it was dropped.
    pub fn track(&self, visit: VisitTrack) -> bool {
        match self.tx.try_send(visit) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(visit)) => {
                warn!(page = %visit.page, "Visit channel full, dropping visit");
                false
            }
            Err(mpsc::error::TrySendError::Closed(visit)) => {
                warn!(page = %visit.page, "Visit channel closed, dropping visit");
                false
            }
        }
    }
}

pub struct VisitorWorker<R: VisitorRepository> {
    repository: Arc<R>,
    rx: mpsc::Receiver<VisitTrack>,
}

/// Creates the tracker handed to handlers and the worker that persists.
pub fn visitor_channel<R: VisitorRepository>(
    repository: Arc<R>,
    config: &VisitorConfig,
) -> (VisitorTracker, VisitorWorker<R>) {
    let (tx, rx) = mpsc::channel(config.channel_capacity);
    (VisitorTracker { tx }, VisitorWorker { repository, rx })
}

impl<R: VisitorRepository> VisitorWorker<R> {
    /// Persists visits until shutdown, then writes whatever is still
    /// buffered. Also stops once every tracker has been dropped.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        info!("Visitor worker started");

        loop {
            tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    info!("Received shutdown signal, draining visit queue");
                    break;
                }
                visit = self.rx.recv() => match visit {
                    Some(visit) => self.persist(visit).await,
                    None => {
                        info!("All visit trackers dropped, stopping worker");
                        return;
                    }
                },
            }
        }

        self.rx.close();
        let mut drained = 0usize;
        while let Some(visit) = self.rx.recv().await {
            self.persist(visit).await;
            drained += 1;
        }
        info!(drained, "Visitor worker stopped");
    }

    async fn persist(&self, visit: VisitTrack) {
        match self.repository.insert(&visit).await {
            Ok(()) => debug!(page = %visit.page, "Visit recorded"),
            Err(e) => warn!(error = %e, page = %visit.page, "Failed to record visit"),
        }
    }
}
