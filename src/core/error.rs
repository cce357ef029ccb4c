//! Error types for the scene manager

use thiserror::Error;

use crate::scene::node::NodeId;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown scene node {0:?}")]
    UnknownNode(NodeId),

    #[error("node {0:?} is a leaf and cannot have children")]
    NotComposite(NodeId),

    #[error("invalid configuration: {0}")]
    Config(String),
}
