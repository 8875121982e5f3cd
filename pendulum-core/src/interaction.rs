//! Pointer handling for the viewport: selection, dragging and hover.
//!
//! Interaction is only possible while the engine is paused. Every handler
//! checks [`interaction_allowed`] before touching any state.

use crate::engine::SimulationEngine;
use crate::geom::Point;
use crate::hit_test::{Hit, hit_segment, hit_test};
use crate::model::{TrailSample, rod_origin};
use crate::render::Scene;
use crate::selection::SelectionState;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Armed(usize),
    Dragging(usize),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Cursor {
    #[default]
    Default,
    Grab,
    Grabbing,
}

impl Cursor {
    pub fn as_css(self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Grab => "grab",
            Cursor::Grabbing => "grabbing",
        }
    }
}

/// Single gate for every pointer handler.
pub fn interaction_allowed<E: SimulationEngine + ?Sized>(engine: &E) -> bool {
    engine.is_paused()
}

/// Pendulum angle that points from `anchor` towards `pointer`.
pub fn drag_angle(anchor: Point, pointer: Point) -> f64 {
    let dx = pointer.x - anchor.x;
    let dy = pointer.y - anchor.y;
    dx.atan2(dy)
}

/// Interaction state owned by one viewport session.
#[derive(Clone, Debug, Default)]
pub struct Viewport {
    hovered: Option<usize>,
    drag: DragState,
    cursor: Cursor,
    // presentation only; never read by the engine
    rotation_indicator: f64,
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging(_))
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Hovered index validated against a chain of `chain_len` segments.
    pub fn hovered(&self, chain_len: usize) -> Option<usize> {
        self.hovered.filter(|&i| i < chain_len)
    }

    pub fn rotation_indicator(&self) -> f64 {
        self.rotation_indicator
    }

    pub fn accumulate_rotation(&mut self, delta: f64) {
        if delta.is_finite() {
            self.rotation_indicator += delta;
        }
    }

    /// Scene for the current frame.
    pub fn scene<'a, E: SimulationEngine + ?Sized>(
        &self,
        engine: &'a E,
        trails: &'a [&'a [TrailSample]],
    ) -> Scene<'a> {
        let segments = engine.segments();
        Scene {
            segments,
            trails,
            paused: engine.is_paused(),
            hovered: self.hovered(segments.len()),
        }
    }

    /// Pointer pressed at `p` (chain-local). Returns what was hit, or `None`
    /// both for empty space and for presses ignored while running.
    pub fn pointer_down<E: SimulationEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        selection: &mut SelectionState,
        p: Point,
    ) -> Option<Hit> {
        if !interaction_allowed(engine) {
            return None;
        }
        let hit = hit_test(p, engine.segments());
        match hit {
            Some(Hit::Segment(i)) => {
                selection.select(Some(i));
                selection.open_panel();
                engine.set_paused(true);
                self.drag = DragState::Armed(i);
                self.start_drag(engine);
            }
            Some(Hit::Rod(i)) => {
                selection.select(Some(i));
                selection.open_panel();
            }
            None => selection.select(None),
        }
        hit
    }

    fn start_drag<E: SimulationEngine + ?Sized>(&mut self, engine: &mut E) {
        if let DragState::Armed(i) = self.drag {
            // dragging never coexists with a running simulation
            engine.set_paused(true);
            self.drag = DragState::Dragging(i);
            self.cursor = Cursor::Grabbing;
            log::debug!("drag started on segment {i}");
        }
    }

    /// Pointer moved to `p` (chain-local), anywhere on the page. Returns
    /// `true` when the frame needs repainting.
    pub fn pointer_move<E: SimulationEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        selection: &mut SelectionState,
        p: Point,
    ) -> bool {
        let mut changed = false;
        if let DragState::Dragging(i) = self.drag {
            changed |= self.drag_to(engine, selection, i, p);
        }

        if !interaction_allowed(engine) {
            changed |= self.hovered.is_some() || self.cursor != Cursor::Default;
            self.hovered = None;
            self.cursor = Cursor::Default;
            return changed;
        }

        if !self.is_dragging() {
            let hovered = hit_segment(p, engine.segments());
            changed |= hovered != self.hovered;
            self.hovered = hovered;
            self.cursor = if hovered.is_some() {
                Cursor::Grab
            } else {
                Cursor::Default
            };
        }
        changed
    }

    fn drag_to<E: SimulationEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        selection: &mut SelectionState,
        index: usize,
        p: Point,
    ) -> bool {
        let segments = engine.segments();
        if index >= segments.len() {
            log::warn!("cancelling drag of removed segment {index}");
            self.end_drag();
            return true;
        }
        if !p.is_finite() {
            return false;
        }
        let theta = drag_angle(rod_origin(segments, index), p);
        engine.update_segment_angle(index, theta);
        selection.bump_render();
        true
    }

    /// Pointer released, inside or outside the viewport.
    pub fn pointer_up<E: SimulationEngine + ?Sized>(&mut self, engine: &E) {
        if self.drag != DragState::Idle {
            log::debug!(
                "drag ended ({:?}); engine paused = {}",
                self.drag,
                engine.is_paused()
            );
        }
        self.end_drag();
        // The engine's own flag decides what happens next; nothing from
        // before the drag is restored.
        if !interaction_allowed(engine) {
            self.hovered = None;
            self.cursor = Cursor::Default;
        }
    }

    fn end_drag(&mut self) {
        self.drag = DragState::Idle;
        self.cursor = if self.hovered.is_some() {
            Cursor::Grab
        } else {
            Cursor::Default
        };
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use super::*;
    use crate::universe::Universe;

    fn paused_universe() -> Universe {
        let mut u = Universe::default();
        u.set_paused(true);
        u
    }

    #[test]
    fn drag_angle_law() {
        assert_eq!(drag_angle(Point::ORIGIN, Point::new(0.0, 30.0)), 0.0);
        assert_eq!(drag_angle(Point::ORIGIN, Point::new(30.0, 0.0)), FRAC_PI_2);
        assert_eq!(drag_angle(Point::ORIGIN, Point::new(0.0, -30.0)), PI);
    }

    #[test]
    fn running_engine_ignores_pointer_down() {
        let mut u = Universe::default();
        let mut sel = SelectionState::new();
        let mut vp = Viewport::new();
        sel.select(Some(0));
        for _ in 0..3 {
            let target = u.segments()[1].position;
            assert_eq!(vp.pointer_down(&mut u, &mut sel, target), None);
        }
        assert_eq!(sel.raw_selected(), Some(0));
        assert!(!sel.is_panel_open());
        assert_eq!(vp.drag_state(), DragState::Idle);
        assert!(!u.is_paused());
    }

    #[test]
    fn segment_press_selects_opens_panel_and_drags() {
        let mut u = paused_universe();
        let mut sel = SelectionState::new();
        let mut vp = Viewport::new();
        let target = u.segments()[0].position;
        assert_eq!(vp.pointer_down(&mut u, &mut sel, target), Some(Hit::Segment(0)));
        assert_eq!(sel.raw_selected(), Some(0));
        assert!(sel.is_panel_open());
        assert_eq!(vp.drag_state(), DragState::Dragging(0));
        assert_eq!(vp.cursor(), Cursor::Grabbing);
        assert!(u.is_paused());
    }

    #[test]
    fn rod_press_selects_without_dragging() {
        let mut u = paused_universe();
        let mut sel = SelectionState::new();
        let mut vp = Viewport::new();
        // Midway along rod 1, between (100, 0) and (200, 0).
        let hit = vp.pointer_down(&mut u, &mut sel, Point::new(150.0, 3.0));
        assert_eq!(hit, Some(Hit::Rod(1)));
        assert_eq!(sel.raw_selected(), Some(1));
        assert!(sel.is_panel_open());
        assert_eq!(vp.drag_state(), DragState::Idle);
    }

    #[test]
    fn empty_press_clears_selection() {
        let mut u = paused_universe();
        let mut sel = SelectionState::new();
        let mut vp = Viewport::new();
        sel.select(Some(1));
        assert_eq!(vp.pointer_down(&mut u, &mut sel, Point::new(-300.0, 300.0)), None);
        assert_eq!(sel.raw_selected(), None);
    }

    #[test]
    fn drag_rewrites_angle_on_every_move() {
        let mut u = paused_universe();
        let mut sel = SelectionState::new();
        let mut vp = Viewport::new();
        let target = u.segments()[0].position;
        vp.pointer_down(&mut u, &mut sel, target);
        let tick = sel.render_tick();

        assert!(vp.pointer_move(&mut u, &mut sel, Point::new(0.0, 80.0)));
        assert_eq!(u.segments()[0].theta, 0.0);
        assert!(vp.pointer_move(&mut u, &mut sel, Point::new(-80.0, 0.0)));
        assert_eq!(u.segments()[0].theta, -FRAC_PI_2);
        assert_eq!(sel.render_tick(), tick + 2);
        assert_eq!(vp.hovered(2), None);

        vp.pointer_up(&u);
        assert_eq!(vp.drag_state(), DragState::Idle);
        assert!(u.is_paused());
    }

    #[test]
    fn hover_tracks_segments_only_while_paused() {
        let mut u = paused_universe();
        let mut sel = SelectionState::new();
        let mut vp = Viewport::new();
        let target = u.segments()[1].position;
        assert!(vp.pointer_move(&mut u, &mut sel, target));
        assert_eq!(vp.hovered(2), Some(1));
        assert_eq!(vp.cursor(), Cursor::Grab);
        // Rods do not highlight.
        vp.pointer_move(&mut u, &mut sel, Point::new(150.0, 3.0));
        assert_eq!(vp.hovered(2), None);
        assert_eq!(vp.cursor(), Cursor::Default);

        vp.pointer_move(&mut u, &mut sel, target);
        u.set_paused(false);
        assert!(vp.pointer_move(&mut u, &mut sel, target));
        assert_eq!(vp.hovered(2), None);
        assert_eq!(vp.cursor(), Cursor::Default);
    }

    #[test]
    fn removing_dragged_segment_cancels_drag() {
        let mut u = paused_universe();
        let mut sel = SelectionState::new();
        let mut vp = Viewport::new();
        let target = u.segments()[1].position;
        vp.pointer_down(&mut u, &mut sel, target);
        u.remove_last_segment();
        vp.pointer_move(&mut u, &mut sel, Point::new(10.0, 10.0));
        assert_eq!(vp.drag_state(), DragState::Idle);
        assert_eq!(sel.resolve(u.segments().len()), None);
    }

    #[test]
    fn rotation_indicator_ignores_non_finite_steps() {
        let mut vp = Viewport::new();
        vp.accumulate_rotation(0.25);
        vp.accumulate_rotation(f64::NAN);
        assert_eq!(vp.rotation_indicator(), 0.25);
    }
}
