use crate::model::{Integrator, Rgb, Segment, TrailSample};

/// The authoritative simulation the viewport drives.
///
/// The viewport only reads snapshots and writes individual fields back
/// through the mutators. Mutators taking an index ignore indices past the
/// end of the chain; value validation belongs to the caller (see
/// [`crate::editor`]).
pub trait SimulationEngine {
    /// Current chain, in chain order.
    fn segments(&self) -> &[Segment];

    /// Trail history index-aligned with [`segments`](Self::segments), or
    /// empty when trails are hidden.
    fn trails(&self) -> Vec<&[TrailSample]>;

    fn is_paused(&self) -> bool;
    fn set_paused(&mut self, paused: bool);

    /// Advance by `dt` frame units. Callers must not call this while paused.
    fn advance(&mut self, dt: f64);

    fn update_segment_angle(&mut self, index: usize, theta: f64);
    fn update_segment_angular_velocity(&mut self, index: usize, omega: f64);
    fn update_segment_mass(&mut self, index: usize, mass: f64);
    fn update_segment_rod_length(&mut self, index: usize, length: f64);
    fn update_segment_radius(&mut self, index: usize, radius: f64);
    fn update_segment_color(&mut self, index: usize, color: Rgb);

    fn add_segment(&mut self, initial_angle: f64);
    fn remove_last_segment(&mut self);

    /// Restore the default chain. Global flags are reset as well; callers
    /// that want to keep them re-apply them afterwards.
    fn reset(&mut self);

    fn speed(&self) -> f64;
    fn set_speed(&mut self, speed: f64);
    fn integrator(&self) -> Integrator;
    fn set_integrator(&mut self, integrator: Integrator);
    fn trails_visible(&self) -> bool;
    fn set_trails_visible(&mut self, visible: bool);
    fn mass_calculation(&self) -> bool;
    fn set_mass_calculation(&mut self, enabled: bool);
    fn energy_limiting(&self) -> bool;
    fn set_energy_limiting(&mut self, enabled: bool);

    /// Mass used by the simulation, honoring the mass-calculation flag.
    fn total_mass(&self) -> f64;

    fn segment_count(&self) -> usize {
        self.segments().len()
    }

    fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments().get(index)
    }
}
