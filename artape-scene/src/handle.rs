use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Non-owning handle to a node in a [`SceneGraph`](crate::SceneGraph).
///
/// Handles are unique for the lifetime of the process, so a stale handle
/// never aliases a newer node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle {
    id: u64,
}

impl NodeHandle {
    pub(crate) fn next() -> Self {
        Self {
            id: NODE_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.id)
    }
}

/// Handle ID generator
static NODE_ID: AtomicU64 = AtomicU64::new(1);
