//! In-memory world-tracking session.
//!
//! The session keeps a set of tracked plane anchors and a pinhole camera.
//! Whoever drives it (a test, a scenario runner, another thread) adds,
//! updates and removes planes, moves the camera and advances frames; the
//! registered listeners are notified synchronously on the driving thread.

use crate::session::{
    AnchorListener, FrameListener, HitResult, HitTestKind, HitTester, TrackingConfiguration,
    TrackingError, TrackingSession, Viewport,
};
use artape_data::{AnchorId, PlaneAnchor};
use glam::{Mat4, Quat, Vec2, Vec3};
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, trace};

/// Pinhole camera looking down its local -Z axis with +Y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedCamera {
    /// Camera-to-world transform.
    pub transform: Mat4,
    /// Vertical field of view in radians.
    pub vertical_fov: f32,
    pub viewport: Viewport,
}

impl SimulatedCamera {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            transform: Mat4::IDENTITY,
            vertical_fov: std::f32::consts::FRAC_PI_3,
            viewport,
        }
    }

    /// Place the camera `height` meters above `target`, looking straight down.
    pub fn look_down_at(&mut self, target: Vec3, height: f32) {
        let eye = target + Vec3::Y * height;
        self.transform =
            Mat4::from_rotation_translation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2), eye);
    }

    pub fn position(&self) -> Vec3 {
        self.transform.w_axis.truncate()
    }

    /// World-space ray through a view point: (origin, unit direction).
    pub fn ray_through(&self, point: Vec2) -> (Vec3, Vec3) {
        let ndc_x = 2.0 * point.x / self.viewport.width - 1.0;
        let ndc_y = 1.0 - 2.0 * point.y / self.viewport.height;
        let tan_half = (self.vertical_fov * 0.5).tan();
        let local = Vec3::new(ndc_x * tan_half * self.viewport.aspect(), ndc_y * tan_half, -1.0);
        let direction = self.transform.transform_vector3(local).normalize();
        (self.position(), direction)
    }
}

struct World {
    planes: BTreeMap<AnchorId, PlaneAnchor>,
    camera: SimulatedCamera,
    running: bool,
}

#[derive(Default)]
struct Listeners {
    anchor: Option<Box<dyn AnchorListener>>,
    frame: Option<Box<dyn FrameListener>>,
}

/// Height used when aiming the camera at a point.
const AIM_HEIGHT: f32 = 1.0;

/// Cheaply clonable handle to a simulated tracking session.
///
/// Clones share the same world, so one clone can be owned by the scene
/// thread while another drives the session from elsewhere.
#[derive(Clone)]
pub struct SimulatedSession {
    world: Arc<RwLock<World>>,
    listeners: Arc<RwLock<Listeners>>,
}

impl SimulatedSession {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            world: Arc::new(RwLock::new(World {
                planes: BTreeMap::new(),
                camera: SimulatedCamera::new(viewport),
                running: false,
            })),
            listeners: Arc::new(RwLock::new(Listeners::default())),
        }
    }

    fn world(&self) -> RwLockReadGuard<'_, World> {
        self.world.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn world_mut(&self) -> RwLockWriteGuard<'_, World> {
        self.world.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn listeners(&self) -> RwLockReadGuard<'_, Listeners> {
        self.listeners.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn listeners_mut(&self) -> RwLockWriteGuard<'_, Listeners> {
        self.listeners.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start tracking a new plane. Returns false if paused or already tracked.
    pub fn add_plane(&self, anchor: PlaneAnchor) -> bool {
        {
            let mut world = self.world_mut();
            if !world.running || world.planes.contains_key(&anchor.id) {
                return false;
            }
            world.planes.insert(anchor.id, anchor);
        }
        debug!("Tracking plane {}", anchor.id);
        if let Some(listener) = self.listeners().anchor.as_ref() {
            listener.did_add(&anchor);
        }
        true
    }

    /// Refine a tracked plane. Returns false if paused or not tracked.
    pub fn update_plane(&self, anchor: PlaneAnchor) -> bool {
        {
            let mut world = self.world_mut();
            if !world.running {
                return false;
            }
            match world.planes.get_mut(&anchor.id) {
                Some(tracked) => *tracked = anchor,
                None => return false,
            }
        }
        let listeners = self.listeners();
        if let Some(listener) = listeners.anchor.as_ref() {
            listener.will_update(&anchor);
            listener.did_update(&anchor);
        }
        true
    }

    /// Stop tracking a plane. Returns false if paused or not tracked.
    pub fn remove_plane(&self, id: AnchorId) -> bool {
        let removed = {
            let mut world = self.world_mut();
            if !world.running {
                return false;
            }
            world.planes.remove(&id)
        };
        let Some(anchor) = removed else {
            return false;
        };
        debug!("Lost plane {}", id);
        if let Some(listener) = self.listeners().anchor.as_ref() {
            listener.did_remove(&anchor);
        }
        true
    }

    /// Point the reticle at `target` from one meter above it.
    pub fn aim_at(&self, target: Vec3) {
        self.world_mut().camera.look_down_at(target, AIM_HEIGHT);
    }

    pub fn set_camera_transform(&self, transform: Mat4) {
        self.world_mut().camera.transform = transform;
    }

    pub fn camera(&self) -> SimulatedCamera {
        self.world().camera
    }

    /// Render one frame. Returns false when paused.
    pub fn advance(&self, time: f64) -> bool {
        if !self.world().running {
            return false;
        }
        trace!("Frame at {:.3}s", time);
        if let Some(listener) = self.listeners().frame.as_ref() {
            listener.on_frame(time);
        }
        true
    }

    pub fn tracked_planes(&self) -> Vec<PlaneAnchor> {
        self.world().planes.values().copied().collect()
    }
}

fn intersect(plane: &PlaneAnchor, origin: Vec3, direction: Vec3, kind: HitTestKind) -> Option<HitResult> {
    let normal = plane.normal();
    let denom = normal.dot(direction);
    if denom.abs() < 1e-6 {
        return None;
    }
    let distance = normal.dot(plane.origin() - origin) / denom;
    if distance < 0.0 {
        return None;
    }
    let point = origin + direction * distance;

    if kind == HitTestKind::ExistingPlaneUsingExtent {
        let local = plane.transform.inverse().transform_point3(point);
        if !plane.contains_local(local) {
            return None;
        }
    }

    let mut world_transform = plane.transform;
    world_transform.w_axis = point.extend(1.0);
    Some(HitResult {
        anchor: plane.id,
        distance,
        world_transform,
    })
}

impl HitTester for SimulatedSession {
    fn hit_test(&self, point: Vec2, kind: HitTestKind) -> Result<Vec<HitResult>, TrackingError> {
        let world = self.world();
        if !world.running {
            return Err(TrackingError::SessionPaused);
        }
        if world.planes.is_empty() {
            return Err(TrackingError::NotReady);
        }
        let (origin, direction) = world.camera.ray_through(point);
        let mut hits: Vec<HitResult> = world
            .planes
            .values()
            .filter_map(|plane| intersect(plane, origin, direction, kind))
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        Ok(hits)
    }
}

impl TrackingSession for SimulatedSession {
    fn run(&mut self, config: &TrackingConfiguration) -> Result<(), TrackingError> {
        config.validate()?;
        self.world_mut().running = true;
        info!("Tracking session running ({:?})", config.plane_detection);
        Ok(())
    }

    fn pause(&mut self) {
        self.world_mut().running = false;
        info!("Tracking session paused");
    }

    fn is_running(&self) -> bool {
        self.world().running
    }

    fn set_anchor_listener(&mut self, listener: Box<dyn AnchorListener>) {
        self.listeners_mut().anchor = Some(listener);
    }

    fn set_frame_listener(&mut self, listener: Box<dyn FrameListener>) {
        self.listeners_mut().frame = Some(listener);
    }

    fn viewport(&self) -> Viewport {
        self.world().camera.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn running_session() -> SimulatedSession {
        let mut session = SimulatedSession::new(Viewport::default());
        session.run(&TrackingConfiguration::horizontal_planes()).unwrap();
        session
    }

    fn floor(id: u64, extent: Vec2) -> PlaneAnchor {
        PlaneAnchor::horizontal(AnchorId(id), Vec3::ZERO, extent)
    }

    fn center_hits(session: &SimulatedSession) -> Result<Vec<HitResult>, TrackingError> {
        let center = session.viewport().center();
        session.hit_test(center, HitTestKind::ExistingPlaneUsingExtent)
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl AnchorListener for Arc<Recorder> {
        fn did_add(&self, anchor: &PlaneAnchor) {
            self.events.lock().unwrap().push(format!("add {}", anchor.id.0));
        }
        fn will_update(&self, anchor: &PlaneAnchor) {
            self.events.lock().unwrap().push(format!("will {}", anchor.id.0));
        }
        fn did_update(&self, anchor: &PlaneAnchor) {
            self.events.lock().unwrap().push(format!("update {}", anchor.id.0));
        }
        fn did_remove(&self, anchor: &PlaneAnchor) {
            self.events.lock().unwrap().push(format!("remove {}", anchor.id.0));
        }
    }

    impl FrameListener for Arc<Recorder> {
        fn on_frame(&self, time: f64) {
            self.events.lock().unwrap().push(format!("frame {time}"));
        }
    }

    #[test]
    fn test_ray_through_center_points_forward() {
        let camera = SimulatedCamera::new(Viewport::new(100.0, 200.0));
        let (origin, direction) = camera.ray_through(Vec2::new(50.0, 100.0));
        assert_eq!(origin, Vec3::ZERO);
        assert!(direction.abs_diff_eq(Vec3::NEG_Z, 1e-6));
    }

    #[test]
    fn test_no_planes_is_not_ready() {
        let session = running_session();
        assert_eq!(center_hits(&session), Err(TrackingError::NotReady));
    }

    #[test]
    fn test_paused_session_reports_paused() {
        let mut session = running_session();
        session.add_plane(floor(1, Vec2::ONE));
        session.pause();
        assert_eq!(center_hits(&session), Err(TrackingError::SessionPaused));
        assert!(!session.advance(0.0));
        assert!(!session.add_plane(floor(2, Vec2::ONE)));
    }

    #[test]
    fn test_hit_inside_extent() {
        let session = running_session();
        session.add_plane(floor(1, Vec2::new(1.0, 1.0)));
        session.aim_at(Vec3::new(0.25, 0.0, -0.25));

        let hits = center_hits(&session).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].anchor, AnchorId(1));
        assert!(hits[0].position().abs_diff_eq(Vec3::new(0.25, 0.0, -0.25), 1e-5));
        assert!((hits[0].distance - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_extent_limits_hits() {
        let session = running_session();
        session.add_plane(floor(1, Vec2::new(1.0, 1.0)));
        session.aim_at(Vec3::new(0.8, 0.0, 0.0));

        assert!(center_hits(&session).unwrap().is_empty());
        let infinite = session
            .hit_test(session.viewport().center(), HitTestKind::ExistingPlane)
            .unwrap();
        assert_eq!(infinite.len(), 1);
    }

    #[test]
    fn test_extent_follows_center_offset() {
        let session = running_session();
        let anchor = floor(1, Vec2::new(2.0, 3.0)).with_center(Vec3::new(0.5, 0.0, -0.25));
        session.add_plane(anchor);
        session.aim_at(Vec3::new(1.4, 0.0, -1.6));
        assert_eq!(center_hits(&session).unwrap().len(), 1);
        session.aim_at(Vec3::new(-0.6, 0.0, 0.0));
        assert!(center_hits(&session).unwrap().is_empty());
    }

    #[test]
    fn test_hits_are_nearest_first() {
        let session = running_session();
        session.add_plane(floor(1, Vec2::splat(4.0)));
        session.add_plane(PlaneAnchor::horizontal(
            AnchorId(2),
            Vec3::new(0.0, 0.5, 0.0),
            Vec2::splat(1.0),
        ));
        session.aim_at(Vec3::ZERO);

        let hits = center_hits(&session).unwrap();
        let order: Vec<AnchorId> = hits.iter().map(|h| h.anchor).collect();
        assert_eq!(order, vec![AnchorId(2), AnchorId(1)]);
    }

    #[test]
    fn test_removed_plane_is_not_hit() {
        let session = running_session();
        session.add_plane(floor(1, Vec2::ONE));
        session.add_plane(PlaneAnchor::horizontal(AnchorId(2), Vec3::new(5.0, 0.0, 0.0), Vec2::ONE));
        session.aim_at(Vec3::ZERO);
        assert_eq!(center_hits(&session).unwrap().len(), 1);

        assert!(session.remove_plane(AnchorId(1)));
        assert!(center_hits(&session).unwrap().is_empty());
        assert!(!session.remove_plane(AnchorId(1)));
    }

    #[test]
    fn test_listeners_receive_events_in_order() {
        let mut session = running_session();
        let recorder = Arc::new(Recorder::default());
        session.set_anchor_listener(Box::new(recorder.clone()));
        session.set_frame_listener(Box::new(recorder.clone()));

        let anchor = floor(4, Vec2::ONE);
        session.add_plane(anchor);
        session.update_plane(anchor.with_extent(2.0, 2.0));
        session.advance(0.5);
        session.remove_plane(AnchorId(4));
        assert!(!session.update_plane(anchor));

        let events = recorder.events.lock().unwrap().clone();
        assert_eq!(
            events,
            vec!["add 4", "will 4", "update 4", "frame 0.5", "remove 4"]
        );
    }

    #[test]
    fn test_run_rejects_vertical_detection() {
        let mut session = SimulatedSession::new(Viewport::default());
        let config = TrackingConfiguration {
            plane_detection: vec![artape_data::PlaneAlignment::Vertical],
        };
        assert!(session.run(&config).is_err());
        assert!(!session.is_running());
    }
}
