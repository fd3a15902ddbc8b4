use std::sync::Arc;
use std::time::Duration;

use crate::events::{HostSubscriber, JobEvent, JobEventKind};

/// Delivers lifecycle events to host subscribers.
#[derive(Debug, Clone)]
pub struct EventDispatcher {
    start_delay: Duration,
}

impl EventDispatcher {
    pub fn new(start_delay: Duration) -> Self {
        Self { start_delay }
    }

    pub fn start_delay(&self) -> Duration {
        self.start_delay
    }

    /// Spawn a task that sends a start event for `job_id` after the start delay.
    ///
    /// Fire-and-forget: the task is detached and cannot be cancelled. It does
    /// not look at cluster state, so the event is still sent if the job was
    /// removed in the meantime. Must be called from within a tokio runtime.
    pub fn schedule_start(&self, subscriber: Arc<dyn HostSubscriber>, host_id: &str, job_id: &str) {
        let delay = self.start_delay;
        let event = JobEvent::new(host_id, JobEventKind::Start, job_id);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::debug!(
                host_id = %event.host_id,
                job_id = %event.job_id,
                "Delivering start event"
            );
            subscriber.deliver(event).await;
        });
    }

    /// Deliver an event inline, waiting for the subscriber to accept it.
    pub async fn deliver_now(&self, subscriber: &dyn HostSubscriber, event: JobEvent) {
        tracing::debug!(
            host_id = %event.host_id,
            job_id = %event.job_id,
            kind = %event.kind,
            "Delivering event"
        );
        subscriber.deliver(event).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ChannelSubscriber;

    #[tokio::test(start_paused = true)]
    async fn start_event_waits_for_delay() {
        let dispatcher = EventDispatcher::new(Duration::from_millis(100));
        let (subscriber, mut rx) = ChannelSubscriber::new(8);

        dispatcher.schedule_start(Arc::new(subscriber), "h1", "j1");

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_none());

        tokio::time::sleep(Duration::from_millis(60)).await;
        let event = rx.try_recv().expect("start event after delay");
        assert_eq!(event, JobEvent::new("h1", JobEventKind::Start, "j1"));
    }

    #[tokio::test]
    async fn deliver_now_is_immediate() {
        let dispatcher = EventDispatcher::new(Duration::from_secs(60));
        let (subscriber, mut rx) = ChannelSubscriber::new(8);

        dispatcher
            .deliver_now(&subscriber, JobEvent::new("h1", JobEventKind::Stop, "j1"))
            .await;

        assert_eq!(rx.try_recv().map(|e| e.kind), Some(JobEventKind::Stop));
    }
}
