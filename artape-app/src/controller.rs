//! The session façade.
//!
//! [`MeasureController`] owns everything the measuring tool mutates: the
//! scene view, the plane registry, the measurement state and the reticle.
//! Tracking callbacks never touch it directly. They go through a
//! [`SceneDispatcher`] into a queue that [`MeasureController::pump`] drains
//! on the scene thread, in dispatch order.

use crate::config::{MeasureConfig, ViewOptions};
use crate::dispatch::{ActionListener, SceneDispatcher, SceneMessage};
use crate::errors::MeasureError;
use crate::measurement::{Measurement, MeasurementState};
use crate::registry::PlaneRegistry;
use crate::reticle::Reticle;
use crate::tick;
use crate::view::{FrameStatistics, MeasurementLabel, SceneView};
use artape_data::{AnchorId, PlaneAnchor};
use artape_scene::{Node, NodeHandle, SceneError, SceneGraph};
use artape_track::{TrackingConfiguration, TrackingSession};
use std::collections::HashMap;
use std::sync::mpsc::Receiver;
use tracing::{debug, info, instrument, trace, warn};

/// Owning controller for one measuring view.
pub struct MeasureController<S: TrackingSession> {
    session: S,
    tracking: TrackingConfiguration,
    view: SceneView,
    registry: PlaneRegistry,
    hosts: HashMap<AnchorId, NodeHandle>,
    measurement: Measurement,
    reticle: Reticle,
    dispatcher: SceneDispatcher,
    inbox: Receiver<SceneMessage>,
}

impl<S: TrackingSession> MeasureController<S> {
    /// Configure the view, create an empty scene and register for session
    /// events. The session is not started.
    pub fn setup(mut session: S, options: ViewOptions, config: MeasureConfig) -> Self {
        let (dispatcher, inbox) = SceneDispatcher::channel();
        session.set_anchor_listener(Box::new(dispatcher.clone()));
        session.set_frame_listener(Box::new(dispatcher.clone()));

        let viewport = config.viewport.unwrap_or_else(|| session.viewport());
        info!(
            "Measuring view {}x{} (statistics: {}, policy: {:?})",
            viewport.width, viewport.height, options.shows_statistics, config.start_policy
        );

        Self {
            session,
            tracking: TrackingConfiguration::horizontal_planes(),
            view: SceneView::new(options, viewport),
            registry: PlaneRegistry::new(),
            hosts: HashMap::new(),
            measurement: Measurement::new(&config),
            reticle: Reticle::centered(viewport),
            dispatcher,
            inbox,
        }
    }

    /// Run world tracking with horizontal plane detection.
    pub fn start(&mut self) -> Result<(), MeasureError> {
        self.session.run(&self.tracking)?;
        Ok(())
    }

    /// Pause the session. Already queued events are still delivered.
    pub fn stop(&mut self) {
        self.session.pause();
    }

    /// A sender for posting work, including the "add" action, from any thread.
    pub fn dispatcher(&self) -> SceneDispatcher {
        self.dispatcher.clone()
    }

    /// Handle every queued message. Returns how many were handled.
    #[instrument(level = "trace", skip_all)]
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(message) = self.inbox.try_recv() {
            self.handle(message);
            handled += 1;
        }
        handled
    }

    fn handle(&mut self, message: SceneMessage) {
        let result = match message {
            SceneMessage::AnchorAdded(anchor) => self.on_anchor_added(&anchor),
            SceneMessage::AnchorUpdated(anchor) => self.on_anchor_updated(&anchor),
            SceneMessage::AnchorRemoved(anchor) => self.on_anchor_removed(&anchor),
            SceneMessage::Frame { time } => self.on_frame(time).map(|_| ()),
            SceneMessage::AddPressed => self.add_pressed().map(|_| ()),
        };
        match result {
            Ok(()) => {}
            Err(err) if err.is_recoverable() => trace!("Skipped: {}", err),
            Err(err) => warn!("Scene update failed: {}", err),
        }
    }

    /// Give the anchor a host node and build its overlay.
    pub fn on_anchor_added(&mut self, anchor: &PlaneAnchor) -> Result<(), MeasureError> {
        let scene = &mut self.view.scene;
        let host = scene.add_child(
            scene.root(),
            Node::new().with_name(anchor.id.to_string()).with_transform(anchor.transform),
        )?;
        self.registry.on_anchor_added(scene, anchor, host)?;
        if let Some(previous) = self.hosts.insert(anchor.id, host) {
            detach_host(scene, previous)?;
        }
        Ok(())
    }

    pub fn on_anchor_updated(&mut self, anchor: &PlaneAnchor) -> Result<(), MeasureError> {
        let scene = &mut self.view.scene;
        self.registry.on_anchor_updated(scene, anchor)?;
        if let Some(host) = self.hosts.get(&anchor.id) {
            scene.set_transform(*host, anchor.transform)?;
        }
        Ok(())
    }

    /// Unknown anchors are reported as stale and otherwise ignored.
    pub fn on_anchor_removed(&mut self, anchor: &PlaneAnchor) -> Result<(), MeasureError> {
        let scene = &mut self.view.scene;
        let removed = self.registry.on_anchor_removed(scene, anchor.id);
        if let Some(host) = self.hosts.remove(&anchor.id) {
            detach_host(scene, host)?;
        }
        removed
    }

    /// Frame tick. Returns the live length in meters while measuring.
    pub fn on_frame(&mut self, time: f64) -> Result<Option<f32>, MeasureError> {
        let _span = tracing::trace_span!("frame", time).entered();
        self.view.record_frame(time);
        tick::on_frame(
            &mut self.measurement,
            &self.reticle,
            &self.session,
            &mut self.view.scene,
            &mut self.view.label,
        )
    }

    /// Anchor a measurement under the reticle. Returns false on a miss.
    pub fn add_pressed(&mut self) -> Result<bool, MeasureError> {
        let Some(point) = self.reticle.hit_center_on_existing_plane(&self.session) else {
            debug!("Add pressed without a plane under the reticle");
            return Ok(false);
        };
        self.measurement.anchor_at(&mut self.view.scene, point)?;
        Ok(true)
    }

    /// Drop the current measurement and any kept start dots.
    pub fn clear_measurement(&mut self) -> Result<(), MeasureError> {
        self.measurement.clear(&mut self.view.scene)?;
        self.view.label.reset();
        Ok(())
    }

    /// Pause tracking and release everything the view created.
    pub fn teardown(&mut self) {
        self.session.pause();
        let dropped = self.inbox.try_iter().count();
        if let Err(err) = self.measurement.clear(&mut self.view.scene) {
            warn!("Failed to clear measurement: {}", err);
        }
        if let Err(err) = self.registry.clear(&mut self.view.scene) {
            warn!("Failed to clear plane overlays: {}", err);
        }
        self.hosts.clear();
        self.view.reset();
        info!("Measuring view torn down ({} queued events dropped)", dropped);
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn view(&self) -> &SceneView {
        &self.view
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.view.scene
    }

    pub fn label(&self) -> &MeasurementLabel {
        &self.view.label
    }

    pub fn statistics(&self) -> Option<&FrameStatistics> {
        self.view.statistics()
    }

    pub fn registry(&self) -> &PlaneRegistry {
        &self.registry
    }

    /// Host node the tracking side attached for `id`.
    pub fn host(&self, id: AnchorId) -> Option<NodeHandle> {
        self.hosts.get(&id).copied()
    }

    pub fn measurement(&self) -> &Measurement {
        &self.measurement
    }

    pub fn state(&self) -> &MeasurementState {
        self.measurement.state()
    }

    pub fn reticle(&self) -> &Reticle {
        &self.reticle
    }
}

impl<S: TrackingSession> ActionListener for MeasureController<S> {
    fn on_add(&mut self) {
        if let Err(err) = self.add_pressed() {
            warn!("Add failed: {}", err);
        }
    }
}

fn detach_host(scene: &mut SceneGraph, host: NodeHandle) -> Result<(), SceneError> {
    match scene.remove_from_parent(host) {
        Ok(_) | Err(SceneError::NodeNotFound(_)) => Ok(()),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StartPolicy;
    use artape_scene::{Geometry, LineGeometry};
    use artape_track::{SimulatedSession, TrackingError, Viewport};
    use glam::{Vec2, Vec3};

    fn controller(config: MeasureConfig) -> (SimulatedSession, MeasureController<SimulatedSession>) {
        let session = SimulatedSession::new(Viewport::default());
        let mut controller = MeasureController::setup(session.clone(), ViewOptions::default(), config);
        controller.start().unwrap();
        (session, controller)
    }

    fn floor(id: u64, extent: Vec2) -> PlaneAnchor {
        PlaneAnchor::horizontal(AnchorId(id), Vec3::ZERO, extent)
    }

    fn lines(scene: &SceneGraph) -> Vec<LineGeometry> {
        scene
            .iter()
            .filter_map(|(_, node)| node.geometry.as_ref().and_then(Geometry::as_line).cloned())
            .collect()
    }

    fn sphere_positions(scene: &SceneGraph) -> Vec<Vec3> {
        scene
            .iter()
            .filter(|(_, node)| matches!(node.geometry, Some(Geometry::Sphere(_))))
            .map(|(handle, _)| scene.world_position(handle).unwrap())
            .collect()
    }

    #[test]
    fn test_add_with_no_planes() {
        let (_session, mut controller) = controller(MeasureConfig::default());
        controller.on_add();
        controller.pump();

        assert_eq!(controller.state(), &MeasurementState::Idle);
        assert_eq!(controller.label().text(), "0");
        assert_eq!(controller.scene().len(), 1);
    }

    #[test]
    fn test_first_anchored_measurement() {
        let (session, mut controller) = controller(MeasureConfig::default());
        session.add_plane(floor(1, Vec2::new(4.0, 4.0)));
        controller.pump();

        session.aim_at(Vec3::ZERO);
        assert!(controller.add_pressed().unwrap());
        session.aim_at(Vec3::X);
        session.advance(1.0 / 60.0);
        controller.pump();

        assert_eq!(controller.label().text(), "1.0 meters\n3.3 feet\n39.4 inch\n100.0 cm");
        let lines = lines(controller.scene());
        assert_eq!(lines.len(), 1);
        assert!(lines[0].start().abs_diff_eq(Vec3::X, 1e-5));
        assert!(lines[0].end().abs_diff_eq(Vec3::ZERO, 1e-5));

        let MeasurementState::Anchored(anchored) = controller.state() else {
            panic!("expected anchored");
        };
        let start = controller.scene().world_position(anchored.start_marker()).unwrap();
        assert!(start.abs_diff_eq(Vec3::ZERO, 1e-5));
    }

    #[test]
    fn test_distance_in_three_axes() {
        let (session, mut controller) = controller(MeasureConfig::default());
        session.add_plane(floor(1, Vec2::new(1.0, 1.0)));
        let ledge = PlaneAnchor::horizontal(AnchorId(2), Vec3::new(0.0, 0.4, 0.0), Vec2::new(0.2, 0.2))
            .with_center(Vec3::new(0.3, 0.0, 1.2));
        session.add_plane(ledge);
        controller.pump();

        session.aim_at(Vec3::ZERO);
        controller.add_pressed().unwrap();
        session.aim_at(Vec3::new(0.3, 0.4, 1.2));
        let meters = controller.on_frame(0.0).unwrap().unwrap();

        assert!((meters - 1.3).abs() < 1e-4);
        assert_eq!(controller.label().lines().next(), Some("1.3 meters"));
    }

    #[test]
    fn test_plane_resize() {
        let (session, mut controller) = controller(MeasureConfig::default());
        session.add_plane(floor(1, Vec2::new(1.0, 1.0)));
        session.update_plane(floor(1, Vec2::new(2.0, 3.0)).with_center(Vec3::new(0.5, 0.0, -0.25)));
        controller.pump();

        let overlay = controller.registry().get(AnchorId(1)).unwrap();
        let scene = controller.scene();
        assert_eq!(overlay.dimensions(scene).unwrap(), (2.0, 3.0));
        assert_eq!(scene.get(overlay.node()).unwrap().position(), Vec3::new(0.5, 0.0, -0.25));
        assert_eq!(overlay.texture_scale(scene).unwrap(), Vec3::new(2.0, 3.0, 1.0));
    }

    #[test]
    fn test_repeated_update_is_idempotent() {
        let (session, mut controller) = controller(MeasureConfig::default());
        let grown = floor(1, Vec2::new(2.0, 3.0)).with_center(Vec3::new(0.5, 0.0, -0.25));
        session.add_plane(floor(1, Vec2::ONE));
        session.update_plane(grown);
        controller.pump();
        let overlay = controller.registry().get(AnchorId(1)).unwrap().clone();
        let before = controller.scene().world_transform(overlay.slab()).unwrap();

        session.update_plane(grown);
        controller.pump();
        assert_eq!(controller.scene().world_transform(overlay.slab()).unwrap(), before);
        assert_eq!(overlay.dimensions(controller.scene()).unwrap(), (2.0, 3.0));
    }

    #[test]
    fn test_anchor_removal() {
        let (session, mut controller) = controller(MeasureConfig::default());
        session.add_plane(floor(1, Vec2::ONE));
        session.update_plane(floor(1, Vec2::new(2.0, 3.0)).with_center(Vec3::new(0.5, 0.0, -0.25)));
        controller.pump();
        let overlay = controller.registry().get(AnchorId(1)).unwrap().clone();

        session.remove_plane(AnchorId(1));
        controller.pump();

        assert!(!controller.registry().contains(AnchorId(1)));
        assert!(!controller.scene().contains(overlay.node()));
        assert_eq!(controller.host(AnchorId(1)), None);
        session.aim_at(Vec3::new(0.5, 0.0, -0.25));
        assert_eq!(controller.reticle().hit_center_on_existing_plane(&session), None);
    }

    #[test]
    fn test_short_distance_formatting() {
        let (session, mut controller) = controller(MeasureConfig::default());
        session.add_plane(floor(1, Vec2::ONE));
        controller.pump();
        session.aim_at(Vec3::ZERO);
        controller.add_pressed().unwrap();
        session.aim_at(Vec3::new(0.0, 0.0, 0.05));
        controller.on_frame(0.0).unwrap();

        assert_eq!(controller.label().text(), "0.1 meters\n0.2 feet\n2.0 inch\n5.0 cm");
    }

    #[test]
    fn test_miss_detaches_line_and_keeps_label() {
        let (session, mut controller) = controller(MeasureConfig::default());
        session.add_plane(floor(1, Vec2::new(2.0, 2.0)));
        controller.pump();
        session.aim_at(Vec3::ZERO);
        controller.add_pressed().unwrap();
        session.aim_at(Vec3::new(0.5, 0.0, 0.0));
        controller.on_frame(0.0).unwrap();
        let label = controller.label().text().to_string();

        session.aim_at(Vec3::new(5.0, 0.0, 0.0));
        assert!(matches!(controller.on_frame(0.1), Err(MeasureError::NoHit)));

        assert!(lines(controller.scene()).is_empty());
        assert_eq!(sphere_positions(controller.scene()).len(), 1);
        assert_eq!(controller.label().text(), label);
    }

    #[test]
    fn test_idle_frame_is_noop() {
        let (session, mut controller) = controller(MeasureConfig::default());
        session.add_plane(floor(1, Vec2::ONE));
        controller.pump();
        let nodes = controller.scene().len();

        assert_eq!(controller.on_frame(0.0).unwrap(), None);
        assert_eq!(controller.scene().len(), nodes);
        assert_eq!(controller.label().text(), "0");
    }

    #[test]
    fn test_empty_world_frame_is_noop() {
        let (_session, mut controller) = controller(MeasureConfig::default());
        assert_eq!(controller.on_frame(0.0).unwrap(), None);
        assert!(matches!(controller.add_pressed(), Ok(false)));
    }

    #[test]
    fn test_repeated_add_replaces_start() {
        let (session, mut controller) = controller(MeasureConfig::default());
        session.add_plane(floor(1, Vec2::new(2.0, 2.0)));
        controller.pump();

        for x in [0.0, 0.2, 0.4] {
            session.aim_at(Vec3::new(x, 0.0, 0.0));
            controller.add_pressed().unwrap();
            controller.on_frame(x as f64).unwrap();
        }

        let spheres = sphere_positions(controller.scene());
        // Start dot plus the live end dot on top of it.
        assert_eq!(spheres.len(), 2);
        assert!(spheres.iter().all(|p| p.abs_diff_eq(Vec3::new(0.4, 0.0, 0.0), 1e-5)));
        assert_eq!(lines(controller.scene()).len(), 1);
    }

    #[test]
    fn test_repeated_add_appends_history() {
        let config = MeasureConfig::default()
            .with_start_policy(StartPolicy::Append)
            .with_end_marker(false);
        let (session, mut controller) = controller(config);
        session.add_plane(floor(1, Vec2::new(2.0, 2.0)));
        controller.pump();

        for x in [0.0, 0.2, 0.4] {
            session.aim_at(Vec3::new(x, 0.0, 0.0));
            controller.add_pressed().unwrap();
        }

        assert_eq!(sphere_positions(controller.scene()).len(), 3);
        assert_eq!(controller.measurement().history().len(), 2);
        let start = controller.measurement().start().unwrap();
        assert!(start.abs_diff_eq(Vec3::new(0.4, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn test_registry_tracks_live_anchors() {
        let (session, mut controller) = controller(MeasureConfig::default());
        for id in 1..=3 {
            session.add_plane(PlaneAnchor::horizontal(AnchorId(id), Vec3::new(id as f32 * 5.0, 0.0, 0.0), Vec2::ONE));
        }
        session.remove_plane(AnchorId(2));
        controller.pump();

        let mut ids: Vec<AnchorId> = controller.registry().ids().collect();
        ids.sort();
        assert_eq!(ids, vec![AnchorId(1), AnchorId(3)]);
        assert!(controller.host(AnchorId(1)).is_some());
    }

    #[test]
    fn test_stale_events_are_ignored() {
        let (_session, mut controller) = controller(MeasureConfig::default());
        let ghost = floor(9, Vec2::ONE);
        assert!(matches!(controller.on_anchor_updated(&ghost), Err(MeasureError::StaleAnchor(_))));
        assert!(matches!(controller.on_anchor_removed(&ghost), Err(MeasureError::StaleAnchor(_))));

        controller.dispatcher().post(SceneMessage::AnchorRemoved(ghost));
        assert_eq!(controller.pump(), 1);
        assert_eq!(controller.scene().len(), 1);
    }

    #[test]
    fn test_remove_before_tick_prevents_hit() {
        let (session, mut controller) = controller(MeasureConfig::default());
        session.add_plane(floor(1, Vec2::new(2.0, 2.0)));
        session.add_plane(PlaneAnchor::horizontal(AnchorId(2), Vec3::new(10.0, 0.0, 0.0), Vec2::ONE));
        controller.pump();
        session.aim_at(Vec3::ZERO);
        controller.add_pressed().unwrap();

        session.aim_at(Vec3::new(0.5, 0.0, 0.0));
        session.remove_plane(AnchorId(1));
        session.advance(0.1);
        controller.pump();

        assert!(lines(controller.scene()).is_empty());
        assert_eq!(controller.label().text(), "0");
    }

    #[test]
    fn test_events_from_tracking_thread() {
        let (session, mut controller) = controller(MeasureConfig::default());
        let remote = session.clone();
        let mut dispatcher = controller.dispatcher();
        std::thread::spawn(move || {
            remote.add_plane(floor(1, Vec2::new(2.0, 2.0)));
            remote.aim_at(Vec3::ZERO);
            dispatcher.on_add();
        })
        .join()
        .unwrap();
        assert_eq!(controller.pump(), 2);
        assert!(controller.measurement().is_anchored());

        let remote = session.clone();
        std::thread::spawn(move || {
            remote.aim_at(Vec3::new(0.0, 0.0, 0.5));
            remote.advance(0.5);
        })
        .join()
        .unwrap();
        assert_eq!(controller.pump(), 1);
        assert_eq!(controller.label().lines().next(), Some("0.5 meters"));
    }

    #[test]
    fn test_paused_session_skips_ticks() {
        let (session, mut controller) = controller(MeasureConfig::default());
        session.add_plane(floor(1, Vec2::ONE));
        controller.pump();
        session.aim_at(Vec3::ZERO);
        controller.add_pressed().unwrap();

        controller.stop();
        assert!(!session.advance(0.1));
        assert!(matches!(controller.on_frame(0.1), Err(MeasureError::SessionPaused)));
        assert_eq!(controller.label().text(), "0");
    }

    #[test]
    fn test_vertical_configuration_is_unsupported() {
        let session = SimulatedSession::new(Viewport::default());
        let mut controller = MeasureController::setup(session, ViewOptions::default(), MeasureConfig::default());
        controller.tracking = TrackingConfiguration {
            plane_detection: vec![artape_data::PlaneAlignment::Vertical],
        };
        assert!(matches!(
            controller.start(),
            Err(MeasureError::Tracking(TrackingError::UnsupportedConfiguration(_)))
        ));
    }

    #[test]
    fn test_statistics_count_frames() {
        let (session, mut controller) = controller(MeasureConfig::default());
        session.add_plane(floor(1, Vec2::ONE));
        for frame in 0..4 {
            session.advance(frame as f64 / 60.0);
        }
        controller.pump();

        let statistics = controller.statistics().unwrap();
        assert_eq!(statistics.frames(), 4);
        assert!((statistics.fps() - 60.0).abs() < 0.5);
        assert_eq!(statistics.node_count(), controller.scene().len());
    }

    #[test]
    fn test_clear_and_teardown() {
        let (session, mut controller) = controller(MeasureConfig::default());
        session.add_plane(floor(1, Vec2::ONE));
        controller.pump();
        session.aim_at(Vec3::ZERO);
        controller.add_pressed().unwrap();
        session.aim_at(Vec3::new(0.2, 0.0, 0.0));
        controller.on_frame(0.0).unwrap();

        controller.clear_measurement().unwrap();
        assert_eq!(controller.state(), &MeasurementState::Idle);
        assert_eq!(controller.label().text(), "0");
        assert!(sphere_positions(controller.scene()).is_empty());

        session.advance(0.1);
        controller.teardown();
        assert!(!session.is_running());
        assert!(controller.registry().is_empty());
        assert_eq!(controller.scene().len(), 1);
        assert_eq!(controller.pump(), 0);
    }
}
