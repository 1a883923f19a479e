//! Artape
//!
//! Umbrella crate for the AR measuring tape:
//!
//! - [`data`]: plane anchors, length units and scenarios
//! - [`scene`]: retained scene graph, plane overlays and markers
//! - [`track`]: the world-tracking session contract and a simulated session
//! - [`app`]: the measuring controller

pub use artape_app as app;
pub use artape_data as data;
pub use artape_scene as scene;
pub use artape_track as track;

pub use artape_app::{MeasureController, MeasureError, ScenarioRunner};
