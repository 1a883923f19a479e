//! The measurement state machine: a fixed start point and a live endpoint.

use crate::config::{MeasureConfig, StartPolicy};
use artape_data::distance;
use artape_scene::{NodeHandle, SceneError, SceneGraph, endpoint_marker, line_segment};
use glam::Vec3;
use tracing::debug;

/// Nodes owned by an anchored measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct Anchored {
    start: Vec3,
    start_marker: NodeHandle,
    end_marker: Option<NodeHandle>,
    line: Option<NodeHandle>,
}

impl Anchored {
    pub fn start(&self) -> Vec3 {
        self.start
    }

    pub fn start_marker(&self) -> NodeHandle {
        self.start_marker
    }

    pub fn end_marker(&self) -> Option<NodeHandle> {
        self.end_marker
    }

    pub fn line(&self) -> Option<NodeHandle> {
        self.line
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum MeasurementState {
    #[default]
    Idle,
    Anchored(Anchored),
}

/// Start point, live line and endpoint dot in the scene.
///
/// At most one measurement line is attached at any time. Line and end dot
/// only exist while anchored.
#[derive(Debug)]
pub struct Measurement {
    state: MeasurementState,
    policy: StartPolicy,
    show_end_marker: bool,
    history: Vec<NodeHandle>,
}

impl Measurement {
    pub fn new(config: &MeasureConfig) -> Self {
        Self {
            state: MeasurementState::Idle,
            policy: config.start_policy,
            show_end_marker: config.show_end_marker,
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> &MeasurementState {
        &self.state
    }

    pub fn is_anchored(&self) -> bool {
        matches!(self.state, MeasurementState::Anchored(_))
    }

    pub fn start(&self) -> Option<Vec3> {
        match &self.state {
            MeasurementState::Anchored(anchored) => Some(anchored.start),
            MeasurementState::Idle => None,
        }
    }

    /// Start dots kept from earlier measurements (append policy only).
    pub fn history(&self) -> &[NodeHandle] {
        &self.history
    }

    /// Anchor a new measurement at `point`, retiring the previous one.
    pub fn anchor_at(&mut self, scene: &mut SceneGraph, point: Vec3) -> Result<(), SceneError> {
        if let MeasurementState::Anchored(previous) = std::mem::take(&mut self.state) {
            detach(scene, previous.line)?;
            detach(scene, previous.end_marker)?;
            match self.policy {
                StartPolicy::Replace => detach(scene, Some(previous.start_marker))?,
                StartPolicy::Append => self.history.push(previous.start_marker),
            }
        }

        let start_marker = scene.add_child(scene.root(), endpoint_marker("start marker", point))?;
        debug!("Measurement anchored at {:?}", point);
        self.state = MeasurementState::Anchored(Anchored {
            start: point,
            start_marker,
            end_marker: None,
            line: None,
        });
        Ok(())
    }

    /// Redraw the line from `hit` to the start point and move the end dot.
    ///
    /// Returns the new length in meters, or `None` when idle.
    pub fn track_live_endpoint(&mut self, scene: &mut SceneGraph, hit: Vec3) -> Result<Option<f32>, SceneError> {
        let MeasurementState::Anchored(anchored) = &mut self.state else {
            return Ok(None);
        };

        detach(scene, anchored.line.take())?;
        anchored.line = Some(scene.add_child(scene.root(), line_segment(hit, anchored.start))?);

        if self.show_end_marker {
            match anchored.end_marker {
                Some(marker) if scene.contains(marker) => scene.set_position(marker, hit)?,
                _ => {
                    anchored.end_marker = Some(scene.add_child(scene.root(), endpoint_marker("end marker", hit))?);
                }
            }
        }

        Ok(Some(distance(hit, anchored.start)))
    }

    /// Drop the live line and end dot. The start dot stays.
    pub fn clear_live(&mut self, scene: &mut SceneGraph) -> Result<(), SceneError> {
        if let MeasurementState::Anchored(anchored) = &mut self.state {
            detach(scene, anchored.line.take())?;
            detach(scene, anchored.end_marker.take())?;
        }
        Ok(())
    }

    /// Detach every measurement node and return to idle.
    pub fn clear(&mut self, scene: &mut SceneGraph) -> Result<(), SceneError> {
        if let MeasurementState::Anchored(anchored) = std::mem::take(&mut self.state) {
            detach(scene, anchored.line)?;
            detach(scene, anchored.end_marker)?;
            detach(scene, Some(anchored.start_marker))?;
        }
        for marker in self.history.drain(..) {
            detach(scene, Some(marker))?;
        }
        Ok(())
    }
}

fn detach(scene: &mut SceneGraph, handle: Option<NodeHandle>) -> Result<(), SceneError> {
    let Some(handle) = handle else {
        return Ok(());
    };
    match scene.remove_from_parent(handle) {
        Ok(_) | Err(SceneError::NodeNotFound(_)) => Ok(()),
        Err(err) => Err(err),
    }
}
