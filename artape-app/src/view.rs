//! Scene view state: the graph, the distance label and frame statistics.

use crate::config::ViewOptions;
use artape_data::units::EMPTY_REPORT;
use artape_scene::SceneGraph;
use artape_track::Viewport;

/// Multi-line distance readout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementLabel {
    text: String,
}

impl MeasurementLabel {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }

    pub fn reset(&mut self) {
        self.text = EMPTY_REPORT.to_string();
    }
}

impl Default for MeasurementLabel {
    fn default() -> Self {
        Self {
            text: EMPTY_REPORT.to_string(),
        }
    }
}

/// Rolling frame statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStatistics {
    frames: u64,
    last_frame_time: Option<f64>,
    fps: f32,
    node_count: usize,
}

impl FrameStatistics {
    const SMOOTHING: f32 = 0.1;

    pub fn record(&mut self, time: f64, node_count: usize) {
        if let Some(last) = self.last_frame_time {
            let delta = (time - last) as f32;
            if delta > 0.0 {
                let instant = 1.0 / delta;
                self.fps = if self.fps == 0.0 {
                    instant
                } else {
                    self.fps + (instant - self.fps) * Self::SMOOTHING
                };
            }
        }
        self.frames += 1;
        self.last_frame_time = Some(time);
        self.node_count = node_count;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_frame_time(&self) -> Option<f64> {
        self.last_frame_time
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }
}

/// What the renderer draws: scene graph plus HUD.
#[derive(Debug)]
pub struct SceneView {
    pub(crate) scene: SceneGraph,
    pub(crate) label: MeasurementLabel,
    statistics: Option<FrameStatistics>,
    options: ViewOptions,
    viewport: Viewport,
}

impl SceneView {
    /// Empty scene configured with `options`.
    pub fn new(options: ViewOptions, viewport: Viewport) -> Self {
        Self {
            scene: SceneGraph::new(),
            label: MeasurementLabel::default(),
            statistics: options.shows_statistics.then(FrameStatistics::default),
            options,
            viewport,
        }
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn label(&self) -> &MeasurementLabel {
        &self.label
    }

    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// `None` when statistics are turned off.
    pub fn statistics(&self) -> Option<&FrameStatistics> {
        self.statistics.as_ref()
    }

    pub(crate) fn record_frame(&mut self, time: f64) {
        let node_count = self.scene.len();
        if let Some(statistics) = self.statistics.as_mut() {
            statistics.record(time, node_count);
        }
    }

    pub(crate) fn reset(&mut self) {
        self.scene.clear();
        self.label.reset();
        if let Some(statistics) = self.statistics.as_mut() {
            *statistics = FrameStatistics::default();
        }
    }
}
