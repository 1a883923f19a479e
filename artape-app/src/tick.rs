//! Per-frame update of the live endpoint.

use crate::{MeasureError, Measurement, MeasurementLabel, Reticle};
use artape_data::distance_report;
use artape_scene::SceneGraph;
use artape_track::HitTester;

/// One frame tick.
///
/// Idle measurements do nothing and return `Ok(None)`. When the reticle misses,
/// the live line and end dot are detached, the label is left as is and the
/// miss is returned. Otherwise the line, end dot and label follow the hit and
/// the length in meters is returned.
pub fn on_frame<H: HitTester + ?Sized>(
    measurement: &mut Measurement,
    reticle: &Reticle,
    tester: &H,
    scene: &mut SceneGraph,
    label: &mut MeasurementLabel,
) -> Result<Option<f32>, MeasureError> {
    if !measurement.is_anchored() {
        return Ok(None);
    }

    let hit = match reticle.try_hit(tester) {
        Ok(hit) => hit,
        Err(err) => {
            measurement.clear_live(scene)?;
            return Err(err);
        }
    };

    let meters = measurement.track_live_endpoint(scene, hit)?;
    label.set_text(distance_report(Some(hit), measurement.start()));
    Ok(meters)
}
