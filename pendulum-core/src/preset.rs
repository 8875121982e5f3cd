//! JSON chain presets.
//!
//! ```json
//! {
//!   "paused": true,
//!   "speed_multiplier": 0.5,
//!   "integrator": "rk4",
//!   "segments": [
//!     { "angle_deg": 90, "rod_length": 120, "color": "#ff0000" },
//!     { "angle_deg": 45, "omega_deg": 30 }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::{
    BASE_SPEED, DEFAULT_MASS, DEFAULT_RADIUS, DEFAULT_ROD_LENGTH, SPEED_MULTIPLIERS,
};
use crate::engine::SimulationEngine;
use crate::error::{Error, Result};
use crate::model::{Integrator, Rgb};
use crate::universe::Universe;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SegmentPreset {
    #[serde(default)]
    pub angle_deg: f64,
    #[serde(default)]
    pub omega_deg: f64,
    pub mass: Option<f64>,
    pub rod_length: Option<f64>,
    pub radius: Option<f64>,
    pub color: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChainPreset {
    pub name: Option<String>,
    pub paused: Option<bool>,
    pub speed_multiplier: Option<f64>,
    pub integrator: Option<Integrator>,
    pub show_trails: Option<bool>,
    #[serde(default)]
    pub segments: Vec<SegmentPreset>,
}

impl ChainPreset {
    pub fn from_json(text: &str) -> Result<ChainPreset> {
        let preset: ChainPreset = serde_json::from_str(text)?;
        if preset.segments.is_empty() {
            return Err(Error::EmptyPreset);
        }
        Ok(preset)
    }

    /// Build an engine from this preset. Non-positive sizes fall back to
    /// the defaults instead of reaching the engine.
    pub fn build(&self) -> Result<Universe> {
        if self.segments.is_empty() {
            return Err(Error::EmptyPreset);
        }
        if let Some(m) = self.speed_multiplier
            && !SPEED_MULTIPLIERS.contains(&m)
        {
            return Err(Error::InvalidSpeed(m));
        }
        let mut u = Universe::empty();
        for (i, sp) in self.segments.iter().enumerate() {
            u.add_segment(sp.angle_deg.to_radians());
            u.update_segment_angular_velocity(i, sp.omega_deg.to_radians());
            u.update_segment_mass(i, positive_or(sp.mass, DEFAULT_MASS));
            u.update_segment_rod_length(i, positive_or(sp.rod_length, DEFAULT_ROD_LENGTH));
            u.update_segment_radius(i, positive_or(sp.radius, DEFAULT_RADIUS));
            if let Some(hex) = &sp.color {
                u.update_segment_color(i, Rgb::from_hex(hex)?);
            }
        }
        if let Some(paused) = self.paused {
            u.set_paused(paused);
        }
        if let Some(m) = self.speed_multiplier {
            u.set_speed(m * BASE_SPEED);
        }
        if let Some(method) = self.integrator {
            u.set_integrator(method);
        }
        if let Some(show) = self.show_trails {
            u.set_trails_visible(show);
        }
        log::info!(
            "built chain preset {} with {} segments",
            self.name.as_deref().unwrap_or("<unnamed>"),
            self.segments.len()
        );
        Ok(u)
    }
}

fn positive_or(v: Option<f64>, fallback: f64) -> f64 {
    v.filter(|x| x.is_finite() && *x > 0.0).unwrap_or(fallback)
}

impl Universe {
    pub fn from_preset(preset: &ChainPreset) -> Result<Universe> {
        preset.build()
    }
}
