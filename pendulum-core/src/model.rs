use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geom::Point;

/// 24-bit RGB color stored as `0xRRGGBB`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb(pub u32);

impl Rgb {
    pub fn r(self) -> u8 {
        ((self.0 >> 16) & 0xff) as u8
    }

    pub fn g(self) -> u8 {
        ((self.0 >> 8) & 0xff) as u8
    }

    pub fn b(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    /// Parse `#rrggbb` or `rrggbb`.
    pub fn from_hex(s: &str) -> Result<Rgb> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidColor(s.to_string()));
        }
        u32::from_str_radix(hex, 16)
            .map(Rgb)
            .map_err(|_| Error::InvalidColor(s.to_string()))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0 & 0x00ff_ffff)
    }
}

/// Rigid link connecting a segment to its predecessor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rod {
    pub length: f64,
    pub color: Rgb,
}

/// One pendulum mass ("ball") of the chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub index: usize,
    pub position: Point,
    /// Radians from straight down.
    pub theta: f64,
    pub omega: f64,
    pub mass: f64,
    pub radius: f64,
    pub color: Rgb,
    pub rod: Option<Rod>,
}

impl Segment {
    pub fn rod_length(&self) -> Option<f64> {
        self.rod.map(|r| r.length)
    }
}

/// Where segment `index`'s rod starts: the previous segment, or the chain
/// origin for the first one. An index past the end of the chain anchors at
/// the last segment.
pub fn rod_origin(segments: &[Segment], index: usize) -> Point {
    if index == 0 {
        return Point::ORIGIN;
    }
    segments
        .get(index - 1)
        .or_else(|| segments.last())
        .map(|s| s.position)
        .unwrap_or(Point::ORIGIN)
}

/// Historical trail sample, oldest first within a trail.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrailSample {
    pub position: Point,
    pub color: Rgb,
}

/// Integration method selector exposed by the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Integrator {
    #[default]
    Euler,
    Rk4,
    Verlet,
    Leapfrog,
}

impl Integrator {
    pub const ALL: [Integrator; 4] = [
        Integrator::Euler,
        Integrator::Rk4,
        Integrator::Verlet,
        Integrator::Leapfrog,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Integrator::Euler => "euler",
            Integrator::Rk4 => "rk4",
            Integrator::Verlet => "verlet",
            Integrator::Leapfrog => "leapfrog",
        }
    }

    pub fn parse(s: &str) -> Option<Integrator> {
        let s = s.trim();
        Integrator::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
    }
}
