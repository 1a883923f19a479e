//! Artape Application
//!
//! The measuring-tape core on top of a world-tracking session:
//!
//! - a grid-textured overlay per tracked horizontal plane
//! - a reticle ray cast from the centre of the view
//! - a measurement anchored on "add" that follows the reticle every frame,
//!   with a line, endpoint dots and a four-unit distance label
//!
//! Tracking callbacks may arrive on any thread. They are queued through a
//! [`SceneDispatcher`] and handled by [`MeasureController::pump`] on the
//! thread that owns the scene.

pub mod config;
mod controller;
pub mod dispatch;
mod errors;
pub mod logging;
pub mod measurement;
pub mod registry;
pub mod reticle;
pub mod scenario;
pub mod tick;
pub mod view;

pub use config::{DebugOptions, LoggingConfig, MeasureConfig, StartPolicy, ViewOptions};
pub use controller::MeasureController;
pub use dispatch::{ActionListener, SceneDispatcher, SceneMessage};
pub use errors::MeasureError;
pub use logging::init_tracing;
pub use measurement::{Anchored, Measurement, MeasurementState};
pub use registry::PlaneRegistry;
pub use reticle::Reticle;
pub use scenario::{FrameReport, ScenarioReport, ScenarioRunner};
pub use view::{FrameStatistics, MeasurementLabel, SceneView};
