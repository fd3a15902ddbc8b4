use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::events::{HostSubscriber, JobEvent};

/// Subscriber that forwards every event into a bounded channel.
///
/// When the channel is full, delivery waits for the receiver to catch up,
/// which is how tests simulate a slow subscriber.
#[derive(Debug, Clone)]
pub struct ChannelSubscriber {
    tx: mpsc::Sender<JobEvent>,
}

impl ChannelSubscriber {
    pub fn new(capacity: usize) -> (Self, EventReceiver) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, EventReceiver { rx })
    }
}

#[async_trait]
impl HostSubscriber for ChannelSubscriber {
    async fn deliver(&self, event: JobEvent) {
        if let Err(e) = self.tx.send(event).await {
            // Receiver dropped, nobody is listening any more
            tracing::debug!(
                job_id = %e.0.job_id,
                kind = %e.0.kind,
                "Event receiver closed, event dropped"
            );
        }
    }
}

/// Receiving half of a [`ChannelSubscriber`].
#[derive(Debug)]
pub struct EventReceiver {
    rx: mpsc::Receiver<JobEvent>,
}

impl EventReceiver {
    /// Wait for the next event. Returns `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<JobEvent> {
        self.rx.recv().await
    }

    /// Wait up to `timeout` for the next event.
    pub async fn recv_timeout(&mut self, timeout: Duration) -> Option<JobEvent> {
        tokio::time::timeout(timeout, self.rx.recv())
            .await
            .ok()
            .flatten()
    }

    pub fn try_recv(&mut self) -> Option<JobEvent> {
        self.rx.try_recv().ok()
    }

    /// Take every event that is already buffered.
    pub fn drain(&mut self) -> Vec<JobEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}
