use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cluster::job::Job;

/// Host id to host record, as returned by cluster-wide snapshots.
pub type HostMap = HashMap<String, Host>;

/// A simulated worker node and the jobs currently believed to run on it.
///
/// Attributes are fixed once the host is seeded, so clones share them. The
/// job list is owned per clone, which is what makes a clone a safe snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub id: String,
    pub attributes: Arc<BTreeMap<String, String>>,
    pub jobs: Vec<Job>,
}

impl Host {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: Arc::new(BTreeMap::new()),
            jobs: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.attributes).insert(key.into(), value.into());
        self
    }

    pub fn with_job(mut self, job: Job) -> Self {
        self.jobs.push(job);
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn has_job(&self, job_id: &str) -> bool {
        self.jobs.iter().any(|j| j.id == job_id)
    }

    pub fn job_ids(&self) -> Vec<&str> {
        self.jobs.iter().map(|j| j.id.as_str()).collect()
    }

    /// Drop the job with `job_id`. Returns false if it was not on this host.
    pub(crate) fn remove_job(&mut self, job_id: &str) -> bool {
        let before = self.jobs.len();
        self.jobs.retain(|j| j.id != job_id);
        before != self.jobs.len()
    }
}
