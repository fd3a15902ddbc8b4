use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::cluster::host::{Host, HostMap};
use crate::cluster::job::Job;
use crate::config::{ClusterConfig, DuplicateJobPolicy};
use crate::error::{ClusterError, Result};
use crate::events::{EventDispatcher, HostSubscriber, JobEvent, JobEventKind};

/// In-memory record of which jobs run on which hosts.
///
/// # Locking
///
/// The whole host map sits behind one `RwLock`. Snapshot reads share it,
/// `add_jobs` and `remove_job` take it exclusively. There are no per-host locks,
/// so every mutation is serialized across the cluster.
///
/// Subscribers live in a separate map. Events are always delivered after the
/// host map guard is dropped, so a slow subscriber never holds up other
/// callers.
///
/// # Snapshots
///
/// Every host returned to a caller is a clone taken under the lock. The clone
/// owns its job list and shares only the immutable attributes.
pub struct ClusterState {
    hosts: RwLock<HostMap>,
    subscribers: RwLock<HashMap<String, Arc<dyn HostSubscriber>>>,
    dispatcher: EventDispatcher,
    config: ClusterConfig,
}

impl Default for ClusterState {
    fn default() -> Self {
        Self::new(ClusterConfig::default())
    }
}

impl std::fmt::Debug for ClusterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ClusterState {
    pub fn new(config: ClusterConfig) -> Self {
        Self {
            hosts: RwLock::new(HashMap::new()),
            subscribers: RwLock::new(HashMap::new()),
            dispatcher: EventDispatcher::new(config.start_event_delay),
            config,
        }
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    /// Replace the whole topology. Meant for test setup before any scheduler
    /// activity starts.
    pub async fn seed(&self, hosts: HostMap) {
        tracing::debug!(hosts = hosts.len(), "Seeding cluster");
        *self.hosts.write().await = hosts;
    }

    /// Register the subscriber that receives events for `host_id`.
    ///
    /// Replaces any earlier registration. The host does not need to be seeded yet.
    pub async fn register_subscriber(
        &self,
        host_id: impl Into<String>,
        subscriber: Arc<dyn HostSubscriber>,
    ) {
        let host_id = host_id.into();
        let replaced = self
            .subscribers
            .write()
            .await
            .insert(host_id.clone(), subscriber)
            .is_some();
        tracing::debug!(host_id = %host_id, replaced, "Subscriber registered");
    }

    /// Subscriber handle for a host, as a real cluster client would dial it.
    pub async fn dial_host(&self, host_id: &str) -> Result<Arc<dyn HostSubscriber>> {
        self.subscriber(host_id)
            .await
            .ok_or_else(|| ClusterError::UnknownHost(host_id.to_string()))
    }

    /// Snapshot of every host, taken at a single instant.
    pub async fn list_hosts(&self) -> Result<HostMap> {
        let hosts = self.hosts.read().await;
        tracing::trace!(hosts = hosts.len(), "Listing hosts");
        Ok(snapshot(&hosts))
    }

    /// Snapshot of one host, or `None` if it is not tracked.
    pub async fn get_host(&self, host_id: &str) -> Option<Host> {
        self.hosts.read().await.get(host_id).cloned()
    }

    /// Tracked host ids, sorted.
    pub async fn host_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.hosts.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Total number of jobs across all hosts.
    pub async fn job_count(&self) -> usize {
        self.hosts.read().await.values().map(|h| h.jobs.len()).sum()
    }

    /// Append jobs to hosts and return the resulting cluster snapshot.
    ///
    /// All-or-nothing: if any host id is unknown the call fails before any host
    /// is touched. Host ids are checked in sorted order so the reported host is
    /// deterministic.
    ///
    /// For every job actually added to a host with a registered subscriber a
    /// start event is scheduled on its own task. With a non-zero start delay it
    /// arrives after this call has returned.
    pub async fn add_jobs(&self, host_jobs: HashMap<String, Vec<Job>>) -> Result<HostMap> {
        let mut added: Vec<(String, String)> = Vec::new();

        let state = {
            let mut hosts = self.hosts.write().await;

            let mut requested: Vec<&String> = host_jobs.keys().collect();
            requested.sort();
            if let Some(missing) = requested.into_iter().find(|id| !hosts.contains_key(*id)) {
                tracing::warn!(host_id = %missing, "add_jobs referenced unknown host");
                return Err(ClusterError::UnknownHost(missing.clone()));
            }

            for (host_id, jobs) in host_jobs {
                let Some(host) = hosts.get_mut(&host_id) else {
                    continue;
                };
                for job in jobs {
                    if self.config.duplicate_jobs == DuplicateJobPolicy::Skip
                        && host.has_job(&job.id)
                    {
                        tracing::warn!(
                            host_id = %host_id,
                            job_id = %job.id,
                            "Job already on host, skipped"
                        );
                        continue;
                    }
                    tracing::debug!(host_id = %host_id, job_id = %job.id, "Job added");
                    added.push((host_id.clone(), job.id.clone()));
                    host.jobs.push(job);
                }
            }

            snapshot(&hosts)
        };

        let subscribers = self.subscribers.read().await;
        for (host_id, job_id) in &added {
            if let Some(subscriber) = subscribers.get(host_id) {
                self.dispatcher
                    .schedule_start(Arc::clone(subscriber), host_id, job_id);
            }
        }

        Ok(state)
    }

    /// Remove a job from a host and notify the host's subscriber.
    ///
    /// Removing a job the host does not have is not an error; an unknown host
    /// is. The stop (or error, when `failed`) event is delivered after the
    /// removal is committed and the host map lock is released, and is sent
    /// even if the job was not on the host.
    pub async fn remove_job(&self, host_id: &str, job_id: &str, failed: bool) -> Result<()> {
        {
            let mut hosts = self.hosts.write().await;
            let host = hosts
                .get_mut(host_id)
                .ok_or_else(|| ClusterError::UnknownHost(host_id.to_string()))?;
            if host.remove_job(job_id) {
                tracing::debug!(host_id, job_id, failed, "Job removed");
            } else {
                tracing::debug!(host_id, job_id, "Job not on host, nothing removed");
            }
        }

        if let Some(subscriber) = self.subscriber(host_id).await {
            let event = JobEvent::new(host_id, JobEventKind::for_removal(failed), job_id);
            self.dispatcher.deliver_now(subscriber.as_ref(), event).await;
        }
        Ok(())
    }

    async fn subscriber(&self, host_id: &str) -> Option<Arc<dyn HostSubscriber>> {
        self.subscribers.read().await.get(host_id).cloned()
    }
}

/// Copy every host while the caller holds the map guard.
fn snapshot(hosts: &HostMap) -> HostMap {
    hosts
        .iter()
        .map(|(id, host)| (id.clone(), host.clone()))
        .collect()
}
