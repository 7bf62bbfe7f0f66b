use crate::NodeId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),
    #[error("Node {0} has no parent")]
    Detached(NodeId),
    #[error("Invalid color value: {0}")]
    InvalidColor(String),
    #[error("Invalid orientation: {0}")]
    InvalidOrientation(String),
    #[error("Failed to read settings from {path}: {source}")]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read graph from {path}: {source}")]
    GraphIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Graph has no nodes")]
    EmptyGraph,
    #[error("No single root, candidates: {}", .0.join(", "))]
    NoSingleRoot(Vec<String>),
    #[error("Edge {edge} refers to missing node {node}")]
    DanglingEdge { edge: usize, node: usize },
}

pub type Result<T> = std::result::Result<T, ModelError>;
