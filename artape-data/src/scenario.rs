//! Scripted tracking sessions.
//!
//! A scenario is an ordered list of steps that a simulated session replays:
//! planes appearing, growing and disappearing, the camera being aimed at a
//! world point, the user pressing "add", and frame ticks.

use crate::types::{AnchorId, PlaneAnchor};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while loading a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scenario JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Description of a horizontal plane anchor in a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaneSpec {
    pub id: AnchorId,
    /// World position of the anchor's local origin.
    #[serde(default)]
    pub origin: Vec3,
    /// Local centre offset of the tracked rectangle.
    #[serde(default)]
    pub center: Vec3,
    /// Width (X) and length (Z) in meters.
    pub extent: Vec2,
}

impl PlaneSpec {
    pub fn to_anchor(&self) -> PlaneAnchor {
        PlaneAnchor::horizontal(self.id, self.origin, self.extent).with_center(self.center)
    }
}

/// A single scripted event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStep {
    AddPlane(PlaneSpec),
    UpdatePlane(PlaneSpec),
    RemovePlane { id: AnchorId },
    /// Point the reticle at a world position.
    Aim { target: Vec3 },
    PressAdd,
    Frame { time: f64 },
    Pause,
    Resume,
}

/// An ordered script of session events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Parse a scenario from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = serde_json::from_str(json)?;
        debug!("Parsed scenario with {} steps", scenario.steps.len());
        Ok(scenario)
    }

    /// Load a scenario from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// Built-in walkthrough: a floor plane, one anchored start point, a
    /// sweep of the reticle across the floor, a plane update and a removal.
    pub fn walkthrough() -> Self {
        let floor = PlaneSpec {
            id: AnchorId(1),
            origin: Vec3::ZERO,
            center: Vec3::ZERO,
            extent: Vec2::new(3.0, 3.0),
        };
        let mut steps = vec![
            ScenarioStep::AddPlane(floor.clone()),
            ScenarioStep::Frame { time: 0.0 },
            ScenarioStep::Aim { target: Vec3::ZERO },
            ScenarioStep::PressAdd,
        ];

        let mut time = 0.0;
        for i in 1..=10 {
            time += 1.0 / 60.0;
            steps.push(ScenarioStep::Aim {
                target: Vec3::new(i as f32 * 0.1, 0.0, 0.0),
            });
            steps.push(ScenarioStep::Frame { time });
        }

        steps.push(ScenarioStep::UpdatePlane(PlaneSpec {
            extent: Vec2::new(4.0, 3.0),
            center: Vec3::new(0.5, 0.0, -0.25),
            ..floor
        }));
        steps.push(ScenarioStep::Aim {
            target: Vec3::new(0.3, 0.0, 1.2),
        });
        steps.push(ScenarioStep::Frame { time: time + 1.0 / 60.0 });
        steps.push(ScenarioStep::RemovePlane { id: AnchorId(1) });
        steps.push(ScenarioStep::Frame { time: time + 2.0 / 60.0 });

        Self {
            name: Some("walkthrough".to_string()),
            steps,
        }
    }
}
