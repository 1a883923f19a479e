//! Error types for scene graph operations.

use crate::NodeHandle;
use thiserror::Error;

/// Errors that can occur when mutating the scene graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("Node not found in scene: {0}")]
    NodeNotFound(NodeHandle),

    #[error("The root node cannot be removed")]
    RootRemoval,

    #[error("Node {0} does not carry box geometry")]
    NotABox(NodeHandle),
}
