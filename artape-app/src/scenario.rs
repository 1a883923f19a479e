//! Replaying scripted sessions against the simulated tracker.

use crate::config::{MeasureConfig, ViewOptions};
use crate::dispatch::{ActionListener, SceneDispatcher};
use crate::{MeasureController, MeasureError};
use artape_data::{Scenario, ScenarioStep};
use artape_track::{SimulatedSession, Viewport};
use tracing::{debug, info};

/// Label text after one frame of a replay.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub time: f64,
    pub label: String,
    /// Live length in meters, if the frame measured anything.
    pub meters: Option<f32>,
}

/// Outcome of a replay.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioReport {
    pub name: Option<String>,
    pub frames: Vec<FrameReport>,
    pub final_label: String,
    pub tracked_planes: usize,
}

/// Drives a [`SimulatedSession`] and a controller through scenario steps.
///
/// Session events are posted through the dispatcher exactly as a live
/// session would; the queue is pumped after every step.
pub struct ScenarioRunner {
    session: SimulatedSession,
    controller: MeasureController<SimulatedSession>,
    dispatcher: SceneDispatcher,
}

impl ScenarioRunner {
    /// Set up and start a controller over a fresh simulated session.
    pub fn new(viewport: Viewport, options: ViewOptions, config: MeasureConfig) -> Result<Self, MeasureError> {
        let session = SimulatedSession::new(viewport);
        let mut controller = MeasureController::setup(session.clone(), options, config);
        controller.start()?;
        let dispatcher = controller.dispatcher();
        Ok(Self {
            session,
            controller,
            dispatcher,
        })
    }

    pub fn session(&self) -> &SimulatedSession {
        &self.session
    }

    pub fn controller(&self) -> &MeasureController<SimulatedSession> {
        &self.controller
    }

    /// Apply one step and handle everything it queued.
    pub fn apply(&mut self, step: &ScenarioStep) -> Result<(), MeasureError> {
        debug!("Step {:?}", step);
        match step {
            ScenarioStep::AddPlane(spec) => {
                self.session.add_plane(spec.to_anchor());
            }
            ScenarioStep::UpdatePlane(spec) => {
                self.session.update_plane(spec.to_anchor());
            }
            ScenarioStep::RemovePlane { id } => {
                self.session.remove_plane(*id);
            }
            ScenarioStep::Aim { target } => self.session.aim_at(*target),
            ScenarioStep::PressAdd => self.dispatcher.on_add(),
            ScenarioStep::Frame { time } => {
                self.session.advance(*time);
            }
            ScenarioStep::Pause => self.controller.stop(),
            ScenarioStep::Resume => self.controller.start()?,
        }
        self.controller.pump();
        Ok(())
    }

    /// Replay every step, recording the label after each frame step.
    pub fn run(&mut self, scenario: &Scenario) -> Result<ScenarioReport, MeasureError> {
        info!(
            "Replaying scenario {} ({} steps)",
            scenario.name.as_deref().unwrap_or("<unnamed>"),
            scenario.steps.len()
        );
        let mut frames = Vec::new();
        for step in &scenario.steps {
            self.apply(step)?;
            if let ScenarioStep::Frame { time } = step {
                let label = self.controller.label().text().to_string();
                let meters = self.controller.measurement().start().and_then(|_| {
                    self.controller
                        .scene()
                        .iter()
                        .find_map(|(_, node)| node.geometry.as_ref()?.as_line().map(|line| line.length()))
                });
                frames.push(FrameReport {
                    time: *time,
                    label,
                    meters,
                });
            }
        }

        Ok(ScenarioReport {
            name: scenario.name.clone(),
            frames,
            final_label: self.controller.label().text().to_string(),
            tracked_planes: self.controller.registry().len(),
        })
    }
}
