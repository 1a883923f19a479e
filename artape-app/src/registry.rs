//! Anchor to plane-overlay registry.

use crate::MeasureError;
use artape_data::{AnchorId, PlaneAnchor};
use artape_scene::{NodeHandle, PlaneOverlay, SceneError, SceneGraph};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Overlays for every tracked plane, keyed by anchor identity.
///
/// Holds exactly one overlay per live anchor. Overlays are only touched from
/// the scene thread.
#[derive(Debug, Default)]
pub struct PlaneRegistry {
    planes: HashMap<AnchorId, PlaneOverlay>,
}

impl PlaneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an overlay for `anchor` under `host`.
    ///
    /// A second add for the same anchor replaces the first overlay.
    pub fn on_anchor_added(
        &mut self,
        scene: &mut SceneGraph,
        anchor: &PlaneAnchor,
        host: NodeHandle,
    ) -> Result<(), SceneError> {
        let overlay = PlaneOverlay::spawn(scene, host, anchor)?;
        debug!("Plane overlay for {} ({:.2} x {:.2})", anchor.id, anchor.width(), anchor.length());
        if let Some(previous) = self.planes.insert(anchor.id, overlay) {
            warn!("Duplicate add for {}, replacing overlay", anchor.id);
            detach_overlay(scene, previous)?;
        }
        Ok(())
    }

    /// Resize and recenter the overlay for `anchor`.
    pub fn on_anchor_updated(&self, scene: &mut SceneGraph, anchor: &PlaneAnchor) -> Result<(), MeasureError> {
        let overlay = self
            .planes
            .get(&anchor.id)
            .ok_or(MeasureError::StaleAnchor(anchor.id))?;
        overlay.update_with(scene, anchor)?;
        Ok(())
    }

    /// Detach and forget the overlay for `id`.
    pub fn on_anchor_removed(&mut self, scene: &mut SceneGraph, id: AnchorId) -> Result<(), MeasureError> {
        let overlay = self.planes.remove(&id).ok_or(MeasureError::StaleAnchor(id))?;
        detach_overlay(scene, overlay)?;
        Ok(())
    }

    pub fn get(&self, id: AnchorId) -> Option<&PlaneOverlay> {
        self.planes.get(&id)
    }

    pub fn contains(&self, id: AnchorId) -> bool {
        self.planes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = AnchorId> + '_ {
        self.planes.keys().copied()
    }

    /// Detach every overlay.
    pub fn clear(&mut self, scene: &mut SceneGraph) -> Result<(), SceneError> {
        for (_, overlay) in self.planes.drain() {
            detach_overlay(scene, overlay)?;
        }
        Ok(())
    }
}

// Overlays whose host already left the scene are gone with it.
fn detach_overlay(scene: &mut SceneGraph, overlay: PlaneOverlay) -> Result<(), SceneError> {
    match overlay.despawn(scene) {
        Ok(()) | Err(SceneError::NodeNotFound(_)) => Ok(()),
        Err(err) => Err(err),
    }
}
