use crate::constants::ROTATION_INDICATOR_FACTOR;
use crate::engine::SimulationEngine;
use crate::interaction::Viewport;
use crate::selection::SelectionState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The engine stepped and the render counter moved.
    Advanced,
    /// Paused: nothing was written.
    Frozen,
}

/// One display frame of the animation loop. Runs before the frame is
/// rendered so the render reads the advanced state.
pub fn frame_tick<E: SimulationEngine + ?Sized>(
    engine: &mut E,
    selection: &mut SelectionState,
    viewport: &mut Viewport,
    dt: f64,
) -> FrameOutcome {
    if engine.is_paused() {
        return FrameOutcome::Frozen;
    }
    engine.advance(dt);
    selection.bump_render();
    if let Some(i) = selection.resolve(engine.segment_count())
        && let Some(s) = engine.segment(i)
    {
        viewport.accumulate_rotation(s.omega * dt * ROTATION_INDICATOR_FACTOR);
    }
    FrameOutcome::Advanced
}
