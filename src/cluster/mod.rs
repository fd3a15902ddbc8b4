//! Fake cluster state: hosts, their jobs, and the subscribers that hear
//! about job transitions.
//!
//! - [`ClusterState`]: the authoritative host map and the operations on it
//! - [`Host`] / [`Job`]: the records handed out as snapshots

pub mod host;
pub mod job;
pub mod state;

pub use host::{Host, HostMap};
pub use job::Job;
pub use state::ClusterState;
