//! Interactive viewport for a chained pendulum.
//!
//! The crate is host-agnostic: it reads an engine through
//! [`engine::SimulationEngine`], turns pointer input into chain edits and
//! produces a list of [`render::DrawCommand`]s each frame. The browser host
//! lives in `pendulum-wasm`.

pub mod animation;
pub mod constants;
pub mod editor;
pub mod engine;
pub mod error;
pub mod geom;
pub mod hit_test;
pub mod interaction;
pub mod model;
pub mod preset;
pub mod render;
pub mod selection;
pub mod toolbar;
pub mod universe;

pub use engine::SimulationEngine;
pub use error::{Error, Result};
pub use geom::Point;
pub use model::{Integrator, Rgb, Rod, Segment, TrailSample};
pub use selection::SelectionState;
pub use universe::Universe;

/// Fixed categorical palette for newly added segments, cycled by index.
pub fn segment_color(i: usize) -> Rgb {
    const PALETTE: [u32; 6] = [
        0xff0000, // red
        0x0000ff, // blue
        0x00ff00, // green
        0xf0f000, // yellow
        0x00f0f0, // cyan
        0xf000f0, // magenta
    ];
    Rgb(PALETTE[i % PALETTE.len()])
}
