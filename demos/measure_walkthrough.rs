//! Measuring walkthrough
//!
//! Drives a simulated session by hand: a floor plane appears, the user
//! anchors a start point, sweeps the reticle across the floor, and the
//! floor grows and is finally lost.
//!
//! Usage:
//!   cargo run --example measure_walkthrough

use artape::app::{ActionListener, MeasureConfig, MeasureController, ViewOptions};
use artape::data::{AnchorId, PlaneAnchor};
use artape::track::{SimulatedSession, Viewport};
use glam::{Vec2, Vec3};
use std::error::Error;
use tracing::info;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let session = SimulatedSession::new(Viewport::default());
    let mut controller = MeasureController::setup(session.clone(), ViewOptions::default(), MeasureConfig::default());
    controller.start()?;

    let floor = PlaneAnchor::horizontal(AnchorId(1), Vec3::ZERO, Vec2::new(3.0, 3.0));
    session.add_plane(floor);
    controller.pump();
    info!("Tracking {} plane(s)", controller.registry().len());

    session.aim_at(Vec3::ZERO);
    controller.on_add();

    let mut time = 0.0;
    for step in 1..=8 {
        time += 1.0 / 30.0;
        session.aim_at(Vec3::new(step as f32 * 0.1, 0.0, step as f32 * 0.05));
        session.advance(time);
        controller.pump();
        println!("{}\n", controller.label().text());
    }

    session.update_plane(floor.with_extent(4.0, 3.0).with_center(Vec3::new(0.5, 0.0, -0.25)));
    controller.pump();
    if let Some(overlay) = controller.registry().get(AnchorId(1)) {
        let (width, length) = overlay.dimensions(controller.scene())?;
        info!("Floor grew to {:.1} x {:.1} m", width, length);
    }

    session.remove_plane(AnchorId(1));
    session.advance(time + 1.0 / 30.0);
    controller.pump();
    info!(
        "Floor lost; label still reads {:?}",
        controller.label().lines().next().unwrap_or_default()
    );

    controller.teardown();
    Ok(())
}
