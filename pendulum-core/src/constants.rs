/// Viewport-wide numeric constants.
/// Lengths are in chain-local units, which equal canvas pixels at zoom 1.
///
/// Extra reach around a segment body for pointer hits.
pub const SEGMENT_HIT_MARGIN: f64 = 10.0;
/// Maximum pointer distance from a rod for a rod hit.
pub const ROD_HIT_TOLERANCE: f64 = 10.0;

/// Radius of the paused-mode angle arc drawn around each rod origin.
pub const ANGLE_ARC_RADIUS: f64 = 40.0;
/// Velocity vectors shorter than this are not drawn.
pub const VELOCITY_MIN_MAGNITUDE: f64 = 0.1;
/// Lever arm used for the velocity vector of a segment without a rod.
pub const DEFAULT_VECTOR_ROD_LENGTH: f64 = 100.0;
pub const ARROW_LEG_LENGTH: f64 = 15.0;
pub const ARROW_LEG_ANGLE: f64 = std::f64::consts::PI / 6.0;
pub const ARROW_SETBACK: f64 = 8.0;

pub const PIVOT_RADIUS: f64 = 10.0;
pub const HOVER_PADDING: f64 = 8.0;
pub const ROD_STROKE_WIDTH: f64 = 2.0;
pub const TRAIL_STROKE_WIDTH: f64 = 2.0;
pub const ARC_STROKE_WIDTH: f64 = 2.0;
pub const VECTOR_STROKE_WIDTH: f64 = 3.0;
pub const HOVER_STROKE_WIDTH: f64 = 3.0;

pub const OVERLAY_COLOR: u32 = 0x4a5568;
pub const PIVOT_COLOR: u32 = 0x0f0f0f;
pub const HOVER_COLOR: u32 = 0xffaa00;

/// Scale applied to `omega * dt` when accumulating the rotation indicator.
pub const ROTATION_INDICATOR_FACTOR: f64 = 0.1;

/// Engine speed that corresponds to a 1x multiplier.
pub const BASE_SPEED: f64 = 0.05;
/// Selectable speed multipliers, slowest (reversed) to fastest.
pub const SPEED_MULTIPLIERS: [f64; 11] = [
    -4.0, -2.0, -1.0, -0.5, -0.25, 0.0, 0.25, 0.5, 1.0, 2.0, 4.0,
];

/// Reference engine defaults.
pub const GRAVITY: f64 = 9.8;
pub const DEFAULT_ROD_LENGTH: f64 = 100.0;
pub const DEFAULT_MASS: f64 = 10.0;
pub const DEFAULT_RADIUS: f64 = 10.0;
pub const DEFAULT_ROD_COLOR: u32 = 0x0f0f0f;
pub const MAX_TRAIL_SAMPLES: usize = 250;
/// Upper bound on integration sub-steps per `advance` call.
pub const MAX_SUBSTEPS: usize = 200;
