//! Scene graph for AR overlay nodes
//!
//! Nodes live in an arena keyed by [`NodeHandle`]. Every node except the
//! root has exactly one parent, and a node is in the graph if and only if
//! it is reachable from the root.

use crate::{Geometry, NodeHandle, SceneError};
use glam::{Mat4, Vec3};
use std::collections::HashMap;
use tracing::trace;

/// A node in the scene graph.
#[derive(Debug, Clone)]
pub struct Node {
    /// Optional debug name.
    pub name: Option<String>,
    /// Transform relative to the parent node.
    pub transform: Mat4,
    /// What the node draws, if anything.
    pub geometry: Option<Geometry>,
    parent: Option<NodeHandle>,
    children: Vec<NodeHandle>,
}

impl Node {
    /// Create an empty node at the parent's origin.
    pub fn new() -> Self {
        Self {
            name: None,
            transform: Mat4::IDENTITY,
            geometry: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.set_position(position);
        self
    }

    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    /// Translation relative to the parent.
    pub fn position(&self) -> Vec3 {
        self.transform.w_axis.truncate()
    }

    /// Replace the translation, keeping rotation and scale.
    pub fn set_position(&mut self, position: Vec3) {
        self.transform.w_axis = position.extend(1.0);
    }

    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

/// Tree of nodes rooted at a single root node.
#[derive(Debug)]
pub struct SceneGraph {
    nodes: HashMap<NodeHandle, Node>,
    root: NodeHandle,
}

impl SceneGraph {
    /// Create an empty scene containing only the root node.
    pub fn new() -> Self {
        let root = NodeHandle::next();
        let mut nodes = HashMap::new();
        nodes.insert(root, Node::new().with_name("root"));
        Self { nodes, root }
    }

    pub fn root(&self) -> NodeHandle {
        self.root
    }

    /// Attach `node` as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeHandle, mut node: Node) -> Result<NodeHandle, SceneError> {
        let handle = NodeHandle::next();
        let parent_node = self
            .nodes
            .get_mut(&parent)
            .ok_or(SceneError::NodeNotFound(parent))?;
        parent_node.children.push(handle);

        node.parent = Some(parent);
        node.children.clear();
        self.nodes.insert(handle, node);
        trace!("Attached {} to {}", handle, parent);
        Ok(handle)
    }

    /// Detach a node from its parent and drop it together with its subtree.
    ///
    /// Returns the removed node without its children.
    pub fn remove_from_parent(&mut self, handle: NodeHandle) -> Result<Node, SceneError> {
        if handle == self.root {
            return Err(SceneError::RootRemoval);
        }
        let mut node = self
            .nodes
            .remove(&handle)
            .ok_or(SceneError::NodeNotFound(handle))?;

        if let Some(parent) = node.parent.take() {
            if let Some(parent_node) = self.nodes.get_mut(&parent) {
                parent_node.children.retain(|child| *child != handle);
            }
        }

        let mut pending = std::mem::take(&mut node.children);
        while let Some(child) = pending.pop() {
            if let Some(removed) = self.nodes.remove(&child) {
                pending.extend(removed.children);
            }
        }
        trace!("Detached {}", handle);
        Ok(node)
    }

    /// Whether the handle refers to a node currently attached to the scene.
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(&handle)
    }

    pub fn node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(&handle)
    }

    pub fn node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(&handle)
    }

    pub fn get(&self, handle: NodeHandle) -> Result<&Node, SceneError> {
        self.node(handle).ok_or(SceneError::NodeNotFound(handle))
    }

    pub fn get_mut(&mut self, handle: NodeHandle) -> Result<&mut Node, SceneError> {
        self.node_mut(handle).ok_or(SceneError::NodeNotFound(handle))
    }

    pub fn set_position(&mut self, handle: NodeHandle, position: Vec3) -> Result<(), SceneError> {
        self.get_mut(handle)?.set_position(position);
        Ok(())
    }

    pub fn set_transform(&mut self, handle: NodeHandle, transform: Mat4) -> Result<(), SceneError> {
        self.get_mut(handle)?.transform = transform;
        Ok(())
    }

    /// Node-to-world transform, composed from the root down.
    pub fn world_transform(&self, handle: NodeHandle) -> Result<Mat4, SceneError> {
        let mut node = self.get(handle)?;
        let mut transform = node.transform;
        while let Some(parent) = node.parent {
            node = self.get(parent)?;
            transform = node.transform * transform;
        }
        Ok(transform)
    }

    pub fn world_position(&self, handle: NodeHandle) -> Result<Vec3, SceneError> {
        Ok(self.world_transform(handle)?.w_axis.truncate())
    }

    /// Number of nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the root remains.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeHandle, &Node)> {
        self.nodes.iter().map(|(handle, node)| (*handle, node))
    }

    /// Remove every node except the root.
    pub fn clear(&mut self) {
        let root = self.root;
        self.nodes.retain(|handle, _| *handle == root);
        if let Some(root_node) = self.nodes.get_mut(&root) {
            root_node.children.clear();
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
