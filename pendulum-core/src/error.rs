//! Error types for the pendulum viewport.

use thiserror::Error;

/// Result type for viewport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Recoverable failures surfaced to the edit form and preset loader.
/// Nothing here is fatal to the render loop.
#[derive(Debug, Error)]
pub enum Error {
    /// Text that does not parse as a number
    #[error("Please enter a valid number")]
    InvalidNumber { field: &'static str },

    /// Mass, rod length or radius at or below zero
    #[error("{field} must be greater than 0")]
    NonPositive { field: &'static str },

    /// Color text that is not `#rrggbb`
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// An edit arrived while no segment is selected
    #[error("No segment selected")]
    NoSelection,

    /// Preset JSON could not be decoded
    #[error("Preset error: {0}")]
    Preset(#[from] serde_json::Error),

    /// Preset speed that is not on the toolbar's speed ladder
    #[error("Speed multiplier {0} is not one of the available speeds")]
    InvalidSpeed(f64),

    /// Preset describes a chain without segments
    #[error("Preset contains no segments")]
    EmptyPreset,
}
