use std::time::Duration;

/// How `add_jobs` treats a job whose id is already tracked on the target host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateJobPolicy {
    /// Drop the duplicate and log a warning. No start event is scheduled for it.
    #[default]
    Skip,
    /// Append it anyway, as a real host agent that does no bookkeeping would.
    Allow,
}

/// Configuration for a [`ClusterState`](crate::cluster::ClusterState).
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    /// Delay before a "start" event is delivered for a newly added job.
    ///
    /// Gives the caller of `add_jobs` time to record which host a job landed
    /// on before hearing that it started. A zero delay gives up that ordering:
    /// the start event may be delivered before `add_jobs` has returned.
    pub start_event_delay: Duration,
    pub duplicate_jobs: DuplicateJobPolicy,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            start_event_delay: Duration::from_millis(100),
            duplicate_jobs: DuplicateJobPolicy::Skip,
        }
    }
}

impl ClusterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start_event_delay(mut self, delay: Duration) -> Self {
        self.start_event_delay = delay;
        self
    }

    pub fn with_duplicate_jobs(mut self, policy: DuplicateJobPolicy) -> Self {
        self.duplicate_jobs = policy;
        self
    }
}
