//! Job lifecycle events and the subscribers that receive them.
//!
//! The cluster never implements a subscriber itself; it only calls
//! [`HostSubscriber::deliver`] on whatever handle was registered for a host.
//!
//! # Delivery
//!
//! - **start**: sent by [`EventDispatcher::schedule_start`] on its own task
//!   after the configured delay, so it always lands after `add_jobs` returned.
//! - **stop** / **error**: sent by [`EventDispatcher::deliver_now`] once the
//!   removal is committed and the host map lock has been released.
//!
//! Delivery has no error channel. A subscriber that fails or blocks only
//! affects itself.

pub mod channel;
pub mod dispatcher;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use channel::{ChannelSubscriber, EventReceiver};
pub use dispatcher::EventDispatcher;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobEventKind {
    Start,
    Stop,
    Error,
}

impl JobEventKind {
    /// Kind reported when a job is removed from its host.
    pub fn for_removal(failed: bool) -> Self {
        if failed {
            JobEventKind::Error
        } else {
            JobEventKind::Stop
        }
    }
}

impl std::fmt::Display for JobEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobEventKind::Start => write!(f, "start"),
            JobEventKind::Stop => write!(f, "stop"),
            JobEventKind::Error => write!(f, "error"),
        }
    }
}

/// A lifecycle transition of one job on one host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobEvent {
    pub host_id: String,
    pub kind: JobEventKind,
    pub job_id: String,
}

impl JobEvent {
    pub fn new(host_id: impl Into<String>, kind: JobEventKind, job_id: impl Into<String>) -> Self {
        Self {
            host_id: host_id.into(),
            kind,
            job_id: job_id.into(),
        }
    }
}

/// Capability to receive lifecycle events for the jobs of a single host.
///
/// Called outside any cluster lock, possibly from a spawned task. Implementations
/// may be slow or block on backpressure; they must not panic.
#[async_trait]
pub trait HostSubscriber: Send + Sync + 'static {
    async fn deliver(&self, event: JobEvent);
}
