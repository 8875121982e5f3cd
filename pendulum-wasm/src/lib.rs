use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pendulum_core::animation::frame_tick;
use pendulum_core::engine::SimulationEngine;
use pendulum_core::interaction::Viewport;
use pendulum_core::preset::ChainPreset;
use pendulum_core::render::render_scene;
use pendulum_core::toolbar::Toolbar;
use pendulum_core::{Integrator, SelectionState, Universe};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement, HtmlSelectElement,
    MouseEvent, WheelEvent, Window,
};

mod canvas;
mod constants;
mod form;
mod logger;
mod state;
mod utils;

use constants::{FRAME_MS, MAX_FRAME_DT, WHEEL_ZOOM_STEP};
use state::{STATE, State, View};
use utils::{
    asset_url, default_origin, event_canvas_coords, fetch_text_with_fallbacks, get_query_param,
    query_flag, sync_canvas_size, to_local, zoom_about,
};

fn draw(state: &mut State) {
    sync_canvas_size(state);
    let (w, h) = (state.canvas.width() as f64, state.canvas.height() as f64);
    let commands = {
        let trails = state.universe.trails();
        render_scene(&state.viewport.scene(&state.universe, &trails))
    };
    let painted = canvas::clear(&state.ctx, w, h)
        .and_then(|_| canvas::paint(&state.ctx, &commands, state.origin(), state.scale()));
    if let Err(err) = painted {
        log::error!("frame could not be painted: {err:?}");
    }
    if state.dom_dirty.replace(false) {
        form::update_editor_dom(state);
        form::update_status_dom(state);
    }
}

fn sync_cursor(state: &State) {
    let _ = state
        .canvas
        .style()
        .set_property("cursor", state.viewport.cursor().as_css());
}

fn pointer_local(state: &State, e: &MouseEvent) -> pendulum_core::Point {
    let px = event_canvas_coords(e, &state.canvas);
    to_local(px, state.origin(), state.scale())
}

/// Attach a click handler to the button with `id`, if the page has one.
fn on_click(
    doc: &Document,
    state: &Rc<RefCell<State>>,
    id: &str,
    action: impl Fn(&mut State) + 'static,
) {
    let Some(btn) = doc
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        log::debug!("toolbar button #{id} not present");
        return;
    };
    let st = state.clone();
    let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
        let mut s = st.borrow_mut();
        action(&mut s);
        draw(&mut s);
    }));
    btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
    onclick.forget();
}

fn attach_ui(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();
    form::attach_form(state.clone())?;

    // Toolbar
    on_click(&doc, &state, "pauseBtn", |s| {
        s.toolbar.toggle_pause(&mut s.universe, &mut s.selection);
    });
    on_click(&doc, &state, "rewindBtn", |s| {
        s.toolbar.rewind(&mut s.universe, &mut s.selection);
    });
    on_click(&doc, &state, "ffBtn", |s| {
        s.toolbar.fast_forward(&mut s.universe, &mut s.selection);
    });
    on_click(&doc, &state, "resetBtn", |s| {
        s.toolbar.reset(&mut s.universe, &mut s.selection);
    });
    on_click(&doc, &state, "resetViewBtn", |s| {
        s.view = View::default();
    });
    on_click(&doc, &state, "addBtn", |s| {
        s.toolbar.add_segment(&mut s.universe, &mut s.selection);
    });
    on_click(&doc, &state, "editorBtn", |s| {
        s.toolbar.toggle_editor(&mut s.universe, &mut s.selection);
    });
    on_click(&doc, &state, "removeBtn", |s| {
        s.toolbar.remove_segment(&mut s.universe, &mut s.selection);
    });
    on_click(&doc, &state, "trailsBtn", |s| {
        s.toolbar.toggle_trails(&mut s.universe, &mut s.selection);
    });
    on_click(&doc, &state, "massBtn", |s| {
        s.toolbar
            .toggle_mass_calculation(&mut s.universe, &mut s.selection);
    });
    on_click(&doc, &state, "energyBtn", |s| {
        s.toolbar
            .toggle_energy_limiting(&mut s.universe, &mut s.selection);
    });

    if let Some(sel) = doc
        .get_element_by_id("integratorSel")
        .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
    {
        let st = state.clone();
        let target = sel.clone();
        let onchange = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let mut s = st.borrow_mut();
            let s = &mut *s;
            match Integrator::parse(&target.value()) {
                Some(integrator) => {
                    s.toolbar
                        .set_integrator(integrator, &mut s.universe, &mut s.selection)
                }
                None => log::warn!("unknown integrator {:?}", target.value()),
            }
        }));
        sel.add_event_listener_with_callback("change", onchange.as_ref().unchecked_ref())?;
        onchange.forget();
    }

    // Mouse events
    {
        let st = state.clone();
        let mousedown = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            let mut s = st.borrow_mut();
            let s = &mut *s;
            let p = pointer_local(s, &e);
            if s.viewport
                .pointer_down(&mut s.universe, &mut s.selection, p)
                .is_some()
            {
                e.prevent_default();
            }
            s.dom_dirty.set(true);
            sync_cursor(s);
            draw(s);
        }));
        state
            .borrow()
            .canvas
            .add_event_listener_with_callback("mousedown", mousedown.as_ref().unchecked_ref())?;
        mousedown.forget();
    }
    {
        let st = state.clone();
        let mousemove = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            let mut s = st.borrow_mut();
            let s = &mut *s;
            let p = pointer_local(s, &e);
            if s.viewport.pointer_move(&mut s.universe, &mut s.selection, p) {
                sync_cursor(s);
                draw(s);
            }
        }));
        state
            .borrow()
            .window
            .add_event_listener_with_callback("mousemove", mousemove.as_ref().unchecked_ref())?;
        mousemove.forget();
    }
    // Releases outside the canvas and lost focus both end a drag.
    for event in ["mouseup", "blur"] {
        let st = state.clone();
        let release = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let mut s = st.borrow_mut();
            let s = &mut *s;
            s.viewport.pointer_up(&s.universe);
            sync_cursor(s);
        }));
        state
            .borrow()
            .window
            .add_event_listener_with_callback(event, release.as_ref().unchecked_ref())?;
        release.forget();
    }
    {
        let st = state.clone();
        let wheel = Closure::<dyn FnMut(WheelEvent)>::wrap(Box::new(move |e: WheelEvent| {
            e.prevent_default();
            let mut s = st.borrow_mut();
            let factor = if e.delta_y() < 0.0 {
                WHEEL_ZOOM_STEP
            } else {
                1.0 / WHEEL_ZOOM_STEP
            };
            let px = event_canvas_coords(&e, &s.canvas);
            let (origin, zoom) = zoom_about(px, s.origin(), s.view.zoom, s.dpr(), factor);
            let base = default_origin(s.canvas.width() as f64, s.canvas.height() as f64);
            s.view = View {
                zoom,
                shift: (origin.0 - base.0, origin.1 - base.1),
            };
            draw(&mut s);
        }));
        state
            .borrow()
            .canvas
            .add_event_listener_with_callback("wheel", wheel.as_ref().unchecked_ref())?;
        wheel.forget();
    }
    Ok(())
}

fn init_canvas(
    document: &Document,
) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), JsValue> {
    let cv = document
        .get_element_by_id("cv")
        .ok_or_else(|| JsValue::from_str("canvas #cv not found"))?
        .dyn_into::<HtmlCanvasElement>()?;
    let ctx = cv
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2D context not available"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    Ok((cv, ctx))
}

fn request_frame(window: &Window, f: &Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>) {
    if let Some(cb) = f.borrow().as_ref()
        && let Err(err) = window.request_animation_frame(cb.as_ref().unchecked_ref())
    {
        log::error!("requestAnimationFrame failed: {err:?}");
    }
}

fn start_animation(state: Rc<RefCell<State>>) {
    type RafClosure = Closure<dyn FnMut(f64)>;
    let f: Rc<RefCell<Option<RafClosure>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    let window = state.borrow().window.clone();
    let win = window.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        {
            let mut s = state.borrow_mut();
            let s = &mut *s;
            let dt = match s.last_frame_ts {
                Some(last) => ((ts - last) / FRAME_MS).clamp(0.0, MAX_FRAME_DT),
                None => 1.0,
            };
            s.last_frame_ts = Some(ts);
            frame_tick(&mut s.universe, &mut s.selection, &mut s.viewport, dt);
            draw(s);
        }
        request_frame(&win, &f);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&window, &g);
}

/// Swap in the engine described by a preset, keeping the view.
fn install_universe(state: &mut State, universe: Universe) {
    state.toolbar = Toolbar::for_engine(&universe);
    state.universe = universe;
    state.viewport = Viewport::new();
    state.selection.select(None);
    state.selection.close_panel();
    state.selection.bump_render();
}

async fn fetch_and_load_chain(name: &str, force_paused: Option<bool>) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let primary = asset_url(&format!("chains/{name}.json"));
    let relative = format!("chains/{name}.json");
    let text = fetch_text_with_fallbacks(&window, &[primary.as_str(), relative.as_str()])
        .await
        .ok_or_else(|| JsValue::from_str("chain preset not found"))?;
    let preset = ChainPreset::from_json(&text).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let mut universe =
        Universe::from_preset(&preset).map_err(|e| JsValue::from_str(&e.to_string()))?;
    if let Some(paused) = force_paused {
        universe.set_paused(paused);
    }
    log::info!(
        "loaded chain '{}' with {} segments",
        preset.name.as_deref().unwrap_or(name),
        universe.segment_count()
    );
    STATE.with(|st| {
        if let Some(st_rc) = st.borrow().as_ref() {
            let mut s = st_rc.borrow_mut();
            install_universe(&mut s, universe);
            draw(&mut s);
        }
    });
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let search = window.location().search().unwrap_or_default();
    logger::init(logger::parse_level(
        get_query_param(&search, "log").as_deref(),
    ));
    let document = window.document().ok_or("no document")?;
    let (canvas, ctx) = init_canvas(&document)?;

    let force_paused = query_flag(&search, "paused");
    let mut universe = Universe::default();
    if let Some(paused) = force_paused {
        universe.set_paused(paused);
    }

    let dom_dirty = Rc::new(Cell::new(true));
    let mut selection = SelectionState::new();
    {
        let dirty = dom_dirty.clone();
        selection.subscribe(move |_| dirty.set(true));
    }

    let state = Rc::new(RefCell::new(State {
        window,
        document,
        canvas,
        ctx,
        toolbar: Toolbar::for_engine(&universe),
        universe,
        selection,
        viewport: Viewport::new(),
        view: View::default(),
        last_frame_ts: None,
        dom_dirty,
    }));
    STATE.with(|st| st.replace(Some(state.clone())));

    if let Some(name) = get_query_param(&search, "chain") {
        // Fire-and-forget; the default chain stays if loading fails.
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(err) = fetch_and_load_chain(&name, force_paused).await {
                log::warn!("failed to load chain '{name}': {err:?}");
            }
        });
    }

    attach_ui(state.clone())?;
    start_animation(state.clone());
    draw(&mut state.borrow_mut());
    log::info!("pendulum viewport started");
    Ok(())
}
