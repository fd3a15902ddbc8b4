pub mod cluster;
pub mod config;
pub mod error;
pub mod events;

pub use cluster::{ClusterState, Host, HostMap, Job};
pub use config::{ClusterConfig, DuplicateJobPolicy};
pub use error::{ClusterError, Result};
pub use events::{ChannelSubscriber, EventReceiver, HostSubscriber, JobEvent, JobEventKind};
