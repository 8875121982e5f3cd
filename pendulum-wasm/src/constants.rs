/// Host-side view constants. Core geometry constants live in
/// `pendulum_core::constants`.
///
/// Chain origin as a fraction of the canvas size.
pub const ORIGIN_FRACTION: (f64, f64) = (0.5, 1.0 / 3.0);
pub const DEFAULT_ZOOM: f64 = 1.0;
pub const MIN_ZOOM: f64 = 0.2;
pub const MAX_ZOOM: f64 = 5.0;
/// Zoom factor applied per wheel notch.
pub const WHEEL_ZOOM_STEP: f64 = 1.1;
/// Duration of one nominal frame; engine time is measured in frames.
pub const FRAME_MS: f64 = 1000.0 / 60.0;
/// Upper bound on a single frame's time step after a stall (e.g. a
/// background tab).
pub const MAX_FRAME_DT: f64 = 4.0;
