use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClusterError {
    #[error("FakeCluster: unknown host {0}")]
    UnknownHost(String),
}

pub type Result<T> = std::result::Result<T, ClusterError>;
