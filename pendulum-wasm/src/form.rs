//! Property editor panel and status line.

use std::cell::RefCell;
use std::rc::Rc;

use pendulum_core::editor::{EditOutcome, PropertyField, apply_edit};
use pendulum_core::engine::SimulationEngine;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, HtmlInputElement, HtmlSelectElement};

use crate::state::State;

pub fn input_id(field: PropertyField) -> &'static str {
    match field {
        PropertyField::Angle => "angleInput",
        PropertyField::AngularVelocity => "omegaInput",
        PropertyField::Mass => "massInput",
        PropertyField::RodLength => "rodLengthInput",
        PropertyField::Radius => "radiusInput",
        PropertyField::Color => "colorInput",
    }
}

fn input(doc: &Document, field: PropertyField) -> Option<HtmlInputElement> {
    doc.get_element_by_id(input_id(field))?.dyn_into().ok()
}

fn set_error(doc: &Document, field: PropertyField, msg: &str) {
    if let Some(el) = doc.get_element_by_id(&format!("{}Error", input_id(field)))
        && let Ok(el) = el.dyn_into::<HtmlElement>()
    {
        el.set_inner_text(msg);
    }
}

/// Show or hide the panel and refresh every input the user is not typing
/// into.
pub fn update_editor_dom(state: &mut State) {
    let doc = state.document.clone();
    let Some(panel) = doc
        .get_element_by_id("editor")
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };
    let selected = state.selection.resolve(state.universe.segment_count());
    if !state.selection.is_panel_open() {
        let _ = panel.style().set_property("display", "none");
        return;
    }
    let _ = panel.style().set_property("display", "block");
    let segment = selected.and_then(|i| state.universe.segment(i));

    if let Some(title) = doc.get_element_by_id("editorTitle")
        && let Ok(title) = title.dyn_into::<HtmlElement>()
    {
        match segment {
            Some(s) => {
                title.set_inner_text(&format!("Edit Ball {}'s Properties", s.index + 1))
            }
            None => title.set_inner_text("Click a ball to edit its properties"),
        }
    }

    let Some(segment) = segment else {
        for field in PropertyField::ALL {
            if let Some(el) = input(&doc, field) {
                el.set_disabled(true);
                el.set_value("");
            }
            set_error(&doc, field, "");
        }
        return;
    };

    let focused = doc.active_element().map(|el| el.id());
    for field in PropertyField::ALL {
        let Some(el) = input(&doc, field) else {
            continue;
        };
        el.set_disabled(field == PropertyField::Mass && !state.universe.mass_calculation());
        if focused.as_deref() == Some(input_id(field)) {
            continue;
        }
        el.set_value(&field.format(segment));
        set_error(&doc, field, "");
    }
}

pub fn update_status_dom(state: &State) {
    if let Some(el) = state.document.get_element_by_id("status")
        && let Ok(el) = el.dyn_into::<HtmlElement>()
    {
        let u = &state.universe;
        let on_off = |b: bool| if b { "On" } else { "Off" };
        let txt = format!(
            "{}  |  Speed: {}x  |  Integrator: {}  |  Trails: {}  |  Mass calc: {}  \
             |  Energy limit: {}  |  Total mass: {:.2}",
            if u.is_paused() { "Paused" } else { "Running" },
            state.toolbar.multiplier(),
            u.integrator().as_str(),
            on_off(u.trails_visible()),
            on_off(u.mass_calculation()),
            on_off(u.energy_limiting()),
            u.total_mass(),
        );
        el.set_inner_text(&txt);
    }
    if let Some(sel) = state
        .document
        .get_element_by_id("integratorSel")
        .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
    {
        let current = state.universe.integrator().as_str();
        if sel.value() != current {
            sel.set_value(current);
        }
    }
    if let Some(btn) = state
        .document
        .get_element_by_id("editorBtn")
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    {
        let open = state.selection.is_panel_open();
        btn.set_title(if open {
            "Close Property Editor"
        } else {
            "Open Property Editor"
        });
    }
}

/// Wire the panel inputs and close button.
pub fn attach_form(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();
    for field in PropertyField::ALL {
        let Some(el) = input(&doc, field) else {
            continue;
        };
        let st = state.clone();
        let target = el.clone();
        let doc2 = doc.clone();
        let oninput = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let mut s = st.borrow_mut();
            let s = &mut *s;
            let raw = target.value();
            match apply_edit(&mut s.universe, &mut s.selection, field, &raw) {
                Ok(EditOutcome::Applied) | Ok(EditOutcome::Pending) => {
                    set_error(&doc2, field, "");
                }
                Err(err) => {
                    log::debug!("rejected {} input {raw:?}: {err}", field.label());
                    set_error(&doc2, field, &err.to_string());
                }
            }
        }));
        el.add_event_listener_with_callback("input", oninput.as_ref().unchecked_ref())?;
        oninput.forget();
    }

    if let Some(btn) = doc.get_element_by_id("editorClose")
        && let Ok(btn) = btn.dyn_into::<HtmlElement>()
    {
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let mut s = st.borrow_mut();
            s.selection.close_panel();
            s.dom_dirty.set(true);
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }
    Ok(())
}
