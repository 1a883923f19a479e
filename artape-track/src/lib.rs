//! Artape Track - world-tracking session contract
//!
//! This crate describes what the measuring core consumes from an AR
//! platform:
//!
//! - a session that runs a world-tracking configuration detecting
//!   horizontal planes, and can be paused
//! - anchor create/update/remove callbacks and a per-frame tick, delivered
//!   on an arbitrary thread through [`AnchorListener`] and [`FrameListener`]
//! - a hit-test primitive against the currently tracked planes
//!
//! [`SimulatedSession`] implements the contract in memory, for tests,
//! scripted scenarios and headless demos.
//!
//! ## Example
//!
//! ```ignore
//! use artape_track::{SimulatedSession, TrackingConfiguration, TrackingSession};
//!
//! let mut session = SimulatedSession::new(Viewport::new(1170.0, 2532.0));
//! session.run(&TrackingConfiguration::horizontal_planes())?;
//! session.add_plane(floor);
//! session.advance(0.016);
//! ```

mod session;
mod simulated;

pub use session::{
    AnchorListener, FrameListener, HitResult, HitTestKind, HitTester, TrackingConfiguration,
    TrackingError, TrackingSession, Viewport,
};
pub use simulated::{SimulatedCamera, SimulatedSession};
