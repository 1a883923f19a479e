//! Artape Data Crate
//!
//! Geometry utilities and plain data shared by the artape crates: plane
//! anchors as reported by a tracking subsystem, length units and the
//! distance report, and the JSON scenario format used to script sessions.
//! This crate has no knowledge of the scene graph or the tracking session.

pub mod scenario;
pub mod types;
pub mod units;

pub use scenario::{PlaneSpec, Scenario, ScenarioError, ScenarioStep};
pub use types::{AnchorId, PlaneAlignment, PlaneAnchor, position_from_transform};
pub use units::{LengthUnit, distance, distance_report, format, to_centimeters, to_feet, to_inches};
