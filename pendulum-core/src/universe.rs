//! Reference engine used by the browser host and the tests.
//!
//! Each link swings as an independent simple pendulum hanging from its
//! predecessor. Coupled multi-body dynamics are outside this crate; any
//! engine implementing [`SimulationEngine`] can be driven by the viewport.

use std::f64::consts::{PI, TAU};

use crate::constants::{
    BASE_SPEED, DEFAULT_MASS, DEFAULT_RADIUS, DEFAULT_ROD_COLOR, DEFAULT_ROD_LENGTH, GRAVITY,
    MAX_SUBSTEPS, MAX_TRAIL_SAMPLES,
};
use crate::engine::SimulationEngine;
use crate::geom::Point;
use crate::model::{Integrator, Rgb, Rod, Segment, TrailSample};
use crate::segment_color;

#[derive(Clone, Debug)]
pub struct Universe {
    segments: Vec<Segment>,
    trails: Vec<Vec<TrailSample>>,
    // per-link energy ceiling recorded at the last edit
    reference_energy: Vec<f64>,
    gravity: f64,
    paused: bool,
    speed: f64,
    integrator: Integrator,
    show_trails: bool,
    mass_calculation: bool,
    limit_energy: bool,
    default_mass: f64,
}

impl Default for Universe {
    /// Two horizontal links, running at 1x.
    fn default() -> Self {
        let mut u = Universe::empty();
        u.add_segment(PI / 2.0);
        u.add_segment(PI / 2.0);
        u
    }
}

impl Universe {
    /// An engine with no segments and default flags.
    pub fn empty() -> Self {
        Universe {
            segments: Vec::new(),
            trails: Vec::new(),
            reference_energy: Vec::new(),
            gravity: GRAVITY,
            paused: false,
            speed: BASE_SPEED,
            integrator: Integrator::Euler,
            show_trails: true,
            mass_calculation: true,
            limit_energy: false,
            default_mass: DEFAULT_MASS,
        }
    }

    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: f64) {
        self.gravity = gravity;
        self.record_reference_energy();
    }

    fn link_length(&self, i: usize) -> f64 {
        self.segments[i].rod_length().unwrap_or(0.0)
    }

    fn angular_acceleration(&self, theta: f64, length: f64) -> f64 {
        if length <= 0.0 {
            return 0.0;
        }
        -(self.gravity / length) * theta.sin()
    }

    fn link_energy(&self, theta: f64, omega: f64, length: f64) -> f64 {
        0.5 * length * length * omega * omega + self.gravity * length * (1.0 - theta.cos())
    }

    fn record_reference_energy(&mut self) {
        self.reference_energy = (0..self.segments.len())
            .map(|i| {
                let s = &self.segments[i];
                self.link_energy(s.theta, s.omega, self.link_length(i))
            })
            .collect();
    }

    /// Forward kinematics for `from` and every later segment.
    fn recompute_positions_from(&mut self, from: usize) {
        for i in from..self.segments.len() {
            let anchor = if i == 0 {
                Point::ORIGIN
            } else {
                self.segments[i - 1].position
            };
            let length = self.link_length(i);
            let s = &mut self.segments[i];
            s.position = anchor + Point::from_pendulum_angle(s.theta) * length;
        }
    }

    fn step_link(&self, theta: f64, omega: f64, length: f64, dt: f64) -> (f64, f64) {
        let acc = |t: f64| self.angular_acceleration(t, length);
        match self.integrator {
            Integrator::Euler => {
                let omega = omega + acc(theta) * dt;
                (theta + omega * dt, omega)
            }
            Integrator::Rk4 => {
                let (k1t, k1w) = (omega, acc(theta));
                let (k2t, k2w) = (omega + k1w * dt / 2.0, acc(theta + k1t * dt / 2.0));
                let (k3t, k3w) = (omega + k2w * dt / 2.0, acc(theta + k2t * dt / 2.0));
                let (k4t, k4w) = (omega + k3w * dt, acc(theta + k3t * dt));
                (
                    theta + (k1t + 2.0 * k2t + 2.0 * k3t + k4t) * dt / 6.0,
                    omega + (k1w + 2.0 * k2w + 2.0 * k3w + k4w) * dt / 6.0,
                )
            }
            Integrator::Verlet => {
                let a0 = acc(theta);
                let next = theta + omega * dt + 0.5 * a0 * dt * dt;
                let omega = omega + 0.5 * (a0 + acc(next)) * dt;
                (normalize_angle(next), omega)
            }
            Integrator::Leapfrog => {
                let half = omega + acc(theta) * dt / 2.0;
                let next = theta + half * dt;
                (normalize_angle(next), half + acc(next) * dt / 2.0)
            }
        }
    }

    fn single_step(&mut self, dt: f64) -> bool {
        for i in 0..self.segments.len() {
            let length = self.link_length(i);
            let (theta, omega) = {
                let s = &self.segments[i];
                self.step_link(s.theta, s.omega, length, dt)
            };
            if !theta.is_finite() || !omega.is_finite() {
                log::warn!("integration produced a non-finite state for segment {i}");
                return false;
            }
            let s = &mut self.segments[i];
            s.theta = theta;
            s.omega = omega;
        }
        if self.limit_energy {
            self.constrain_velocities();
        }
        self.recompute_positions_from(0);
        true
    }

    fn constrain_velocities(&mut self) {
        for i in 0..self.segments.len() {
            let length = self.link_length(i);
            let Some(&limit) = self.reference_energy.get(i) else {
                continue;
            };
            let s = &self.segments[i];
            let potential = self.gravity * length * (1.0 - s.theta.cos());
            let kinetic = 0.5 * length * length * s.omega * s.omega;
            let max_kinetic = limit - potential;
            if max_kinetic < 0.0 {
                continue;
            }
            if kinetic > max_kinetic && kinetic > 0.0 {
                self.segments[i].omega *= (max_kinetic / kinetic).sqrt();
            }
        }
    }

    fn record_trails(&mut self) {
        for (seg, trail) in self.segments.iter().zip(self.trails.iter_mut()) {
            trail.push(TrailSample {
                position: seg.position,
                color: seg.color,
            });
            if trail.len() > MAX_TRAIL_SAMPLES {
                trail.remove(0);
            }
        }
    }

    fn edit(&mut self, index: usize, f: impl FnOnce(&mut Segment)) -> bool {
        match self.segments.get_mut(index) {
            Some(s) => {
                f(s);
                true
            }
            None => {
                log::warn!(
                    "ignoring edit of segment {index}: chain has {} segments",
                    self.segments.len()
                );
                false
            }
        }
    }
}

/// Sub-steps for one `advance` at `multiplier`, capped so a huge speed
/// cannot stall the frame.
fn substep_count(multiplier: f64) -> usize {
    let steps = (multiplier.abs() * 50.0).ceil();
    if steps.is_finite() {
        (steps as usize).clamp(1, MAX_SUBSTEPS)
    } else {
        MAX_SUBSTEPS
    }
}

/// Wrap an angle into `[-PI, PI]`.
fn normalize_angle(angle: f64) -> f64 {
    let mut a = angle % TAU;
    if a > PI {
        a -= TAU;
    } else if a < -PI {
        a += TAU;
    }
    a
}

impl SimulationEngine for Universe {
    fn segments(&self) -> &[Segment] {
        &self.segments
    }

    fn trails(&self) -> Vec<&[TrailSample]> {
        if !self.show_trails {
            return Vec::new();
        }
        self.trails.iter().map(Vec::as_slice).collect()
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    fn advance(&mut self, dt: f64) {
        if self.paused || self.segments.is_empty() || !dt.is_finite() {
            return;
        }
        // Fixed-size sub-steps keep high speed multipliers stable.
        let multiplier = self.speed * 2.0;
        let steps = substep_count(multiplier);
        let sub_dt = dt * multiplier / steps as f64;
        for _ in 0..steps {
            if !self.single_step(sub_dt) {
                return;
            }
        }
        if self.show_trails {
            self.record_trails();
        }
    }

    fn update_segment_angle(&mut self, index: usize, theta: f64) {
        if self.edit(index, |s| s.theta = theta) {
            self.recompute_positions_from(index);
            self.record_reference_energy();
        }
    }

    fn update_segment_angular_velocity(&mut self, index: usize, omega: f64) {
        if self.edit(index, |s| s.omega = omega) {
            self.record_reference_energy();
        }
    }

    fn update_segment_mass(&mut self, index: usize, mass: f64) {
        self.edit(index, |s| s.mass = mass);
    }

    fn update_segment_rod_length(&mut self, index: usize, length: f64) {
        let changed = self.edit(index, |s| {
            let color = s.rod.map_or(Rgb(DEFAULT_ROD_COLOR), |r| r.color);
            s.rod = Some(Rod { length, color });
        });
        if changed {
            self.recompute_positions_from(index);
            self.record_reference_energy();
        }
    }

    fn update_segment_radius(&mut self, index: usize, radius: f64) {
        self.edit(index, |s| s.radius = radius);
    }

    fn update_segment_color(&mut self, index: usize, color: Rgb) {
        self.edit(index, |s| s.color = color);
    }

    fn add_segment(&mut self, initial_angle: f64) {
        let index = self.segments.len();
        self.segments.push(Segment {
            index,
            position: Point::ORIGIN,
            theta: initial_angle,
            omega: 0.0,
            mass: DEFAULT_MASS,
            radius: DEFAULT_RADIUS,
            color: segment_color(index),
            rod: Some(Rod {
                length: DEFAULT_ROD_LENGTH,
                color: Rgb(DEFAULT_ROD_COLOR),
            }),
        });
        self.trails.push(Vec::new());
        self.recompute_positions_from(index);
        self.record_reference_energy();
        log::info!("added segment {index} at {initial_angle:.3} rad");
    }

    fn remove_last_segment(&mut self) {
        if self.segments.pop().is_some() {
            self.trails.pop();
            self.record_reference_energy();
            log::info!("removed segment {}", self.segments.len());
        }
    }

    fn reset(&mut self) {
        *self = Universe::default();
        log::info!("engine reset to the default chain");
    }

    fn speed(&self) -> f64 {
        self.speed
    }

    fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    fn integrator(&self) -> Integrator {
        self.integrator
    }

    fn set_integrator(&mut self, integrator: Integrator) {
        self.integrator = integrator;
    }

    fn trails_visible(&self) -> bool {
        self.show_trails
    }

    fn set_trails_visible(&mut self, visible: bool) {
        self.show_trails = visible;
    }

    fn mass_calculation(&self) -> bool {
        self.mass_calculation
    }

    fn set_mass_calculation(&mut self, enabled: bool) {
        self.mass_calculation = enabled;
    }

    fn energy_limiting(&self) -> bool {
        self.limit_energy
    }

    fn set_energy_limiting(&mut self, enabled: bool) {
        self.limit_energy = enabled;
        if enabled {
            self.record_reference_energy();
        }
    }

    fn total_mass(&self) -> f64 {
        if self.mass_calculation {
            self.segments.iter().map(|s| s.mass).sum()
        } else {
            self.default_mass * self.segments.len() as f64
        }
    }
}
