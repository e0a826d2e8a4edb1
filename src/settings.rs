//! Runtime preferences for the frame loop
//!
//! Loaded from an optional JSON file; anything missing falls back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Loop and session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for the initial toy layout
    pub seed: u64,
    /// Iteration rate cap (0 = uncapped)
    pub target_fps: u32,
    /// Largest dt fed to the simulation (seconds)
    pub max_frame_dt: f32,

    // === Session ===
    /// Let the autopilot play
    pub autopilot: bool,
    /// Stop after this many seconds of wall-clock time
    pub run_seconds: Option<f32>,

    // === Diagnostics ===
    /// Log every game event as it happens
    pub log_events: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 1337,
            target_fps: 75,
            max_frame_dt: 0.1,

            autopilot: true,
            run_seconds: Some(30.0),

            log_events: true,
        }
    }
}

impl Settings {
    /// Target duration of one loop iteration, if capped
    pub fn frame_budget(&self) -> Option<std::time::Duration> {
        (self.target_fps > 0)
            .then(|| std::time::Duration::from_secs_f64(1.0 / f64::from(self.target_fps)))
    }

    /// Parse settings JSON (partial documents allowed). Values the loop
    /// cannot use are replaced by their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Replace unusable timing values with defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.max_frame_dt.is_finite() && self.max_frame_dt > 0.0) {
            log::warn!(
                "max_frame_dt {} must be positive, using {}",
                self.max_frame_dt,
                defaults.max_frame_dt
            );
            self.max_frame_dt = defaults.max_frame_dt;
        }
        if let Some(secs) = self.run_seconds {
            if !(secs.is_finite() && secs >= 0.0) {
                log::warn!("run_seconds {} is not a valid duration, running until exit", secs);
                self.run_seconds = None;
            }
        }
        self
    }

    /// Load settings from a file, falling back to defaults when it is
    /// missing or malformed
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("No settings at {} ({}), using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}
