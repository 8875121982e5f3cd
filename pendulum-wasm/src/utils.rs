use pendulum_core::Point;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlCanvasElement, MouseEvent, Window};

use crate::constants::{MAX_ZOOM, MIN_ZOOM, ORIGIN_FRACTION};
use crate::state::State;

/// Ensure the canvas backing store matches the CSS size and device pixel ratio
/// to prevent non-uniform stretching.
pub fn sync_canvas_size(state: &mut State) {
    let dpr = state.dpr();
    let (css_w, css_h) = if let Some(el) = state.canvas.dyn_ref::<web_sys::Element>() {
        let rect = el.get_bounding_client_rect();
        (rect.width().max(1.0), rect.height().max(1.0))
    } else {
        (
            state.canvas.client_width() as f64,
            state.canvas.client_height() as f64,
        )
    };
    let target_w = (css_w * dpr).round().clamp(1.0, 10000.0) as u32;
    let target_h = (css_h * dpr).round().clamp(1.0, 10000.0) as u32;
    if state.canvas.width() != target_w {
        state.canvas.set_width(target_w);
    }
    if state.canvas.height() != target_h {
        state.canvas.set_height(target_h);
    }
}

/// Convert client coordinates into canvas backing-store pixels so hit
/// testing works even if CSS scales the canvas element.
pub fn event_canvas_coords(e: &MouseEvent, cv: &HtmlCanvasElement) -> (f64, f64) {
    if let Some(el) = cv.dyn_ref::<web_sys::Element>() {
        let rect = el.get_bounding_client_rect();
        let x = (e.client_x() as f64 - rect.left()) * (cv.width() as f64) / rect.width().max(1.0);
        let y = (e.client_y() as f64 - rect.top()) * (cv.height() as f64) / rect.height().max(1.0);
        (x, y)
    } else {
        (e.offset_x() as f64, e.offset_y() as f64)
    }
}

/// Device pixel ratio used for both the backing store and the view
/// transform. Ratios below 1 (zoomed-out pages) render at CSS resolution.
pub fn effective_dpr(raw: f64) -> f64 {
    raw.max(1.0)
}

/// Where the chain origin sits on an unpanned canvas of the given size.
pub fn default_origin(canvas_w: f64, canvas_h: f64) -> (f64, f64) {
    (canvas_w * ORIGIN_FRACTION.0, canvas_h * ORIGIN_FRACTION.1)
}

/// Convert canvas pixels into chain-local space.
pub fn to_local(px: (f64, f64), origin: (f64, f64), scale: f64) -> Point {
    Point {
        x: (px.0 - origin.0) / scale,
        y: (px.1 - origin.1) / scale,
    }
}

/// Convert a chain-local point to canvas pixels.
pub fn to_screen(p: Point, origin: (f64, f64), scale: f64) -> (f64, f64) {
    (p.x * scale + origin.0, p.y * scale + origin.1)
}

/// Zoom by `factor` keeping the chain point under `px` fixed. Returns the
/// new origin and zoom; `dpr` converts zoom into canvas pixels.
pub fn zoom_about(
    px: (f64, f64),
    origin: (f64, f64),
    zoom: f64,
    dpr: f64,
    factor: f64,
) -> ((f64, f64), f64) {
    let new_zoom = (zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    let anchor = to_local(px, origin, zoom * dpr);
    let moved = to_screen(anchor, (0.0, 0.0), new_zoom * dpr);
    ((px.0 - moved.0, px.1 - moved.1), new_zoom)
}

/// Build an absolute URL for an asset, taking into account the optional
/// `window.__BASE_URL` which is set by the host page.
pub fn asset_url(path: &str) -> String {
    let p = path.trim();
    if p.starts_with("http://") || p.starts_with("https://") || p.starts_with("data:") {
        return p.to_string();
    }
    let base = web_sys::window()
        .and_then(|w| {
            let v = js_sys::Reflect::get(&w, &JsValue::from_str("__BASE_URL")).ok()?;
            v.as_string()
        })
        .unwrap_or_else(|| "/".to_string());
    join_base(&base, p)
}

fn join_base(base: &str, path: &str) -> String {
    let base = if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{}/", base)
    };
    format!("{}{}", base, path.trim_start_matches('/'))
}

/// Fetch a text resource trying a list of fallback URLs in order.
pub async fn fetch_text_with_fallbacks(window: &Window, urls: &[&str]) -> Option<String> {
    for url in urls {
        let resp_value =
            match wasm_bindgen_futures::JsFuture::from(window.fetch_with_str(url)).await {
                Ok(v) => v,
                Err(_) => continue,
            };
        let resp: web_sys::Response = match resp_value.dyn_into() {
            Ok(r) => r,
            Err(_) => continue,
        };
        if !resp.ok() {
            log::debug!("{url}: HTTP {}", resp.status());
            continue;
        }
        if let Ok(text_promise) = resp.text()
            && let Ok(text_js) = wasm_bindgen_futures::JsFuture::from(text_promise).await
            && let Some(s) = text_js.as_string()
        {
            return Some(s);
        }
    }
    None
}

/// Simple query string parser used at start-up.
pub fn get_query_param(search: &str, key: &str) -> Option<String> {
    let s = search.trim_start_matches('?');
    for pair in s.split('&') {
        let mut it = pair.splitn(2, '=');
        let k = it.next()?;
        let v = it.next().unwrap_or("");
        if k == key {
            return Some(url_decode(v));
        }
    }
    None
}

/// `1`, `true`, `yes` and `on` count as set.
pub fn query_flag(search: &str, key: &str) -> Option<bool> {
    get_query_param(search, key).map(|v| {
        matches!(
            v.to_ascii_lowercase().as_str(),
            "" | "1" | "true" | "yes" | "on"
        )
    })
}

fn url_decode(s: &str) -> String {
    let s = s.replace('+', " ");
    percent_encoding::percent_decode_str(&s)
        .decode_utf8_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_params_are_decoded() {
        let q = "?chain=double%20swing&paused=1&log=debug";
        assert_eq!(get_query_param(q, "chain").as_deref(), Some("double swing"));
        assert_eq!(get_query_param(q, "log").as_deref(), Some("debug"));
        assert_eq!(get_query_param(q, "missing"), None);
        assert_eq!(get_query_param("?a=x+y", "a").as_deref(), Some("x y"));
    }

    #[test]
    fn query_flags() {
        assert_eq!(query_flag("?paused=1", "paused"), Some(true));
        assert_eq!(query_flag("?paused", "paused"), Some(true));
        assert_eq!(query_flag("?paused=0", "paused"), Some(false));
        assert_eq!(query_flag("?x=1", "paused"), None);
    }

    #[test]
    fn screen_and_local_are_inverse() {
        let origin = (400.0, 200.0);
        let p = to_local((450.0, 100.0), origin, 2.0);
        assert_eq!(p, Point::new(25.0, -50.0));
        assert_eq!(to_screen(p, origin, 2.0), (450.0, 100.0));
    }

    #[test]
    fn zoom_keeps_pointer_anchor_fixed() {
        let px = (300.0, 250.0);
        let origin = (400.0, 200.0);
        let before = to_local(px, origin, 1.0);
        let (new_origin, zoom) = zoom_about(px, origin, 1.0, 1.0, 2.0);
        assert_eq!(zoom, 2.0);
        let after = to_local(px, new_origin, zoom);
        assert!((before.x - after.x).abs() < 1e-9 && (before.y - after.y).abs() < 1e-9);
        let (_, clamped) = zoom_about(px, origin, 4.0, 1.0, 10.0);
        assert_eq!(clamped, MAX_ZOOM);
    }

    #[test]
    fn pixel_ratio_never_drops_below_one() {
        assert_eq!(effective_dpr(2.0), 2.0);
        assert_eq!(effective_dpr(0.5), 1.0);
        assert_eq!(effective_dpr(f64::NAN), 1.0);
    }

    #[test]
    fn base_urls_join_cleanly() {
        assert_eq!(join_base("/app", "/chains/a.json"), "/app/chains/a.json");
        assert_eq!(join_base("/", "chains/a.json"), "/chains/a.json");
    }
}
