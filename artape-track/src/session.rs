//! Tracking session types and traits.

use artape_data::{AnchorId, PlaneAlignment, PlaneAnchor, position_from_transform};
use glam::{Mat4, Vec2, Vec3};
use thiserror::Error;

/// Errors reported by a tracking session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrackingError {
    #[error("Tracking session is paused")]
    SessionPaused,

    #[error("Tracking has not detected any planes yet")]
    NotReady,

    #[error("Unsupported tracking configuration: {0}")]
    UnsupportedConfiguration(String),
}

/// World-tracking configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingConfiguration {
    /// Plane orientations to detect.
    pub plane_detection: Vec<PlaneAlignment>,
}

impl TrackingConfiguration {
    /// World tracking with horizontal plane detection only.
    pub fn horizontal_planes() -> Self {
        Self {
            plane_detection: vec![PlaneAlignment::Horizontal],
        }
    }

    /// Check that horizontal planes are the only detection mode.
    pub fn validate(&self) -> Result<(), TrackingError> {
        match self.plane_detection.as_slice() {
            [PlaneAlignment::Horizontal] => Ok(()),
            other => Err(TrackingError::UnsupportedConfiguration(format!(
                "plane detection must be horizontal only, got {other:?}"
            ))),
        }
    }
}

impl Default for TrackingConfiguration {
    fn default() -> Self {
        Self::horizontal_planes()
    }
}

/// Size of the view the session renders into, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Centre of the view; the reticle position.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height.max(1.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1170.0, 2532.0)
    }
}

/// What a hit test is allowed to hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTestKind {
    /// Tracked planes, within their detected extent only.
    ExistingPlaneUsingExtent,
    /// Tracked planes, treated as infinite.
    ExistingPlane,
}

/// A single hit-test result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResult {
    /// Plane that was hit.
    pub anchor: AnchorId,
    /// Distance from the camera along the ray.
    pub distance: f32,
    /// World transform of the hit; its translation is the hit point.
    pub world_transform: Mat4,
}

impl HitResult {
    pub fn position(&self) -> Vec3 {
        position_from_transform(&self.world_transform)
    }
}

/// Receives plane anchor events. Called on the tracking thread.
pub trait AnchorListener: Send + Sync {
    fn did_add(&self, anchor: &PlaneAnchor);

    /// Called right before `did_update`. Does nothing by default.
    fn will_update(&self, _anchor: &PlaneAnchor) {}

    fn did_update(&self, anchor: &PlaneAnchor);

    fn did_remove(&self, anchor: &PlaneAnchor);
}

/// Receives one tick per rendered frame. Called on the render thread.
pub trait FrameListener: Send + Sync {
    /// `time` is in seconds since the session started.
    fn on_frame(&self, time: f64);
}

/// Ray casts from a view point into the tracked world.
pub trait HitTester {
    /// Hits ordered nearest first. An empty list means nothing was hit.
    fn hit_test(&self, point: Vec2, kind: HitTestKind) -> Result<Vec<HitResult>, TrackingError>;
}

/// A world-tracking session.
pub trait TrackingSession: HitTester {
    /// Start (or restart) tracking with `config`.
    fn run(&mut self, config: &TrackingConfiguration) -> Result<(), TrackingError>;

    /// Pause tracking. Anchor events and frame ticks stop.
    fn pause(&mut self);

    fn is_running(&self) -> bool;

    fn set_anchor_listener(&mut self, listener: Box<dyn AnchorListener>);

    fn set_frame_listener(&mut self, listener: Box<dyn FrameListener>);

    fn viewport(&self) -> Viewport;
}
