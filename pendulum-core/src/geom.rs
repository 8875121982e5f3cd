use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// Basic two dimensional point in chain-local space (y grows downwards).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (self - other).length()
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Unit vector for a pendulum angle measured from straight down.
    pub fn from_pendulum_angle(theta: f64) -> Point {
        let (s, c) = theta.sin_cos();
        Point { x: s, y: c }
    }

    /// Unit vector for a canvas angle measured from the +x axis.
    pub fn from_canvas_angle(angle: f64) -> Point {
        let (s, c) = angle.sin_cos();
        Point { x: c, y: s }
    }
}

impl From<(f64, f64)> for Point {
    fn from(v: (f64, f64)) -> Self {
        Point { x: v.0, y: v.1 }
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, k: f64) -> Point {
        Point::new(self.x * k, self.y * k)
    }
}

/// Closest point to `p` on the segment `a..b`, clamped to its endpoints.
/// Returns `None` for a zero-length segment.
pub fn closest_point_on_segment(p: Point, a: Point, b: Point) -> Option<Point> {
    let ab = b - a;
    let len_sq = ab.dot(ab);
    if len_sq <= f64::EPSILON || !len_sq.is_finite() {
        return None;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    Some(a + ab * t)
}
