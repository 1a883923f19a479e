//! Error types for the measuring core.

use artape_data::{AnchorId, ScenarioError};
use artape_scene::SceneError;
use artape_track::TrackingError;
use thiserror::Error;

/// Errors that can occur while handling session events.
///
/// The first four variants are expected during normal use and are
/// recovered where they occur; see [`MeasureError::is_recoverable`].
#[derive(Debug, Error)]
pub enum MeasureError {
    #[error("Tracking has not detected any planes yet")]
    TrackingNotReady,

    #[error("Reticle is not over a tracked plane")]
    NoHit,

    #[error("Unknown anchor: {0}")]
    StaleAnchor(AnchorId),

    #[error("Tracking session is paused")]
    SessionPaused,

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("Tracking error: {0}")]
    Tracking(TrackingError),

    #[error("Scenario error: {0}")]
    Scenario(#[from] ScenarioError),
}

impl MeasureError {
    /// Whether the error only means "skip this event".
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            MeasureError::TrackingNotReady
                | MeasureError::NoHit
                | MeasureError::StaleAnchor(_)
                | MeasureError::SessionPaused
        )
    }
}

impl From<TrackingError> for MeasureError {
    fn from(err: TrackingError) -> Self {
        match err {
            TrackingError::SessionPaused => MeasureError::SessionPaused,
            TrackingError::NotReady => MeasureError::TrackingNotReady,
            other => MeasureError::Tracking(other),
        }
    }
}
