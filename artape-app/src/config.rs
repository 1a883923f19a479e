//! Configuration for the view, the measurement and logging.

use artape_track::Viewport;

/// Debug overlays drawn by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugOptions {
    pub feature_points: bool,
    pub world_origin: bool,
}

impl Default for DebugOptions {
    fn default() -> Self {
        Self {
            feature_points: true,
            world_origin: true,
        }
    }
}

/// Scene view configuration applied at setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    /// Show frame statistics (fps, timing, node count).
    pub shows_statistics: bool,
    pub autoenables_default_lighting: bool,
    pub debug_options: DebugOptions,
}

impl ViewOptions {
    pub fn with_statistics(mut self, enabled: bool) -> Self {
        self.shows_statistics = enabled;
        self
    }

    pub fn with_default_lighting(mut self, enabled: bool) -> Self {
        self.autoenables_default_lighting = enabled;
        self
    }

    pub fn with_debug_options(mut self, debug_options: DebugOptions) -> Self {
        self.debug_options = debug_options;
        self
    }
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            shows_statistics: true,
            autoenables_default_lighting: true,
            debug_options: DebugOptions::default(),
        }
    }
}

/// What happens to the previous start dot when "add" is pressed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StartPolicy {
    /// Detach the previous start dot.
    #[default]
    Replace,
    /// Keep previous start dots in the scene, unconnected.
    Append,
}

/// Measurement behaviour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasureConfig {
    pub start_policy: StartPolicy,
    /// Draw a dot at the live endpoint.
    pub show_end_marker: bool,
    /// View used to place the reticle. Defaults to the session's viewport.
    pub viewport: Option<Viewport>,
}

impl MeasureConfig {
    pub fn with_start_policy(mut self, policy: StartPolicy) -> Self {
        self.start_policy = policy;
        self
    }

    pub fn with_end_marker(mut self, show: bool) -> Self {
        self.show_end_marker = show;
        self
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = Some(viewport);
        self
    }
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            start_policy: StartPolicy::Replace,
            show_end_marker: true,
            viewport: None,
        }
    }
}

/// Logging configuration.
pub struct LoggingConfig {
    pub level: String,
    pub enable_tracy: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            enable_tracy: false,
        }
    }
}
