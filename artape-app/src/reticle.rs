//! Screen-centre ray casting.

use crate::MeasureError;
use artape_track::{HitResult, HitTestKind, HitTester, Viewport};
use glam::{Vec2, Vec3};
use tracing::trace;

/// The fixed aiming point at the centre of the view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reticle {
    point: Vec2,
}

impl Reticle {
    pub fn centered(viewport: Viewport) -> Self {
        Self {
            point: viewport.center(),
        }
    }

    pub fn point(&self) -> Vec2 {
        self.point
    }

    /// Nearest hit on an existing plane (within its extent) under the reticle.
    pub fn try_hit<H: HitTester + ?Sized>(&self, tester: &H) -> Result<Vec3, MeasureError> {
        let hits = tester.hit_test(self.point, HitTestKind::ExistingPlaneUsingExtent)?;
        hits.first().map(HitResult::position).ok_or(MeasureError::NoHit)
    }

    /// Like [`Reticle::try_hit`], with every failure collapsed to `None`.
    pub fn hit_center_on_existing_plane<H: HitTester + ?Sized>(&self, tester: &H) -> Option<Vec3> {
        match self.try_hit(tester) {
            Ok(position) => Some(position),
            Err(err) => {
                trace!("No reticle hit: {}", err);
                None
            }
        }
    }
}
