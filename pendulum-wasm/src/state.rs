use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pendulum_core::interaction::Viewport;
use pendulum_core::toolbar::Toolbar;
use pendulum_core::{SelectionState, Universe};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Window};

use crate::constants::DEFAULT_ZOOM;

/// Pan and zoom of the chain on the canvas. `shift` is measured in canvas
/// pixels from the default origin so resizes keep the chain anchored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct View {
    pub zoom: f64,
    pub shift: (f64, f64),
}

impl Default for View {
    fn default() -> Self {
        View {
            zoom: DEFAULT_ZOOM,
            shift: (0.0, 0.0),
        }
    }
}

/// Global application state stored behind an `Rc<RefCell<_>>` so it can be
/// shared across the WASM callbacks.
pub struct State {
    pub window: Window,
    pub document: Document,
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
    pub universe: Universe,
    pub selection: SelectionState,
    pub viewport: Viewport,
    pub toolbar: Toolbar,
    pub view: View,
    pub last_frame_ts: Option<f64>,
    /// Set by the selection's render listener; the editor panel and status
    /// line refresh lazily when it is raised.
    pub dom_dirty: Rc<Cell<bool>>,
}

impl State {
    pub fn dpr(&self) -> f64 {
        crate::utils::effective_dpr(self.window.device_pixel_ratio())
    }

    /// Chain origin in canvas pixels.
    pub fn origin(&self) -> (f64, f64) {
        let (x, y) = crate::utils::default_origin(
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
        (x + self.view.shift.0, y + self.view.shift.1)
    }

    /// Canvas pixels per chain-local unit.
    pub fn scale(&self) -> f64 {
        self.view.zoom * self.dpr()
    }
}

/// Thread local storage for the single runtime state instance.
thread_local! {
    pub static STATE: RefCell<Option<Rc<RefCell<State>>>> = const { RefCell::new(None) };
}
