use thiserror::Error;
use treebolic_core::{ModelError, NodeId};

#[derive(Error, Debug)]
pub enum ViewError {
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),
    #[error("Node {0} is not a mount point")]
    NotMountable(NodeId),
    #[error("Could not graft {mounted} at {mounting}")]
    GraftRejected { mounting: NodeId, mounted: NodeId },
    #[error("Could not prune {0}")]
    PruneRejected(NodeId),
    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, ViewError>;
