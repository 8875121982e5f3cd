use pendulum_core::Rgb;
use pendulum_core::render::{DrawCommand, Fill, Stroke};
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

// Non-deprecated helpers to set canvas styles via property assignment.
pub fn set_fill_style(ctx: &CanvasRenderingContext2d, color: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str("fillStyle"),
        &JsValue::from_str(color),
    );
}

pub fn set_stroke_style(ctx: &CanvasRenderingContext2d, color: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str("strokeStyle"),
        &JsValue::from_str(color),
    );
}

fn css(color: Rgb) -> String {
    color.to_string()
}

fn apply_stroke(ctx: &CanvasRenderingContext2d, stroke: &Stroke) {
    set_stroke_style(ctx, &css(stroke.color));
    ctx.set_global_alpha(stroke.alpha);
    ctx.set_line_width(stroke.width);
    ctx.stroke();
}

fn apply_fill(ctx: &CanvasRenderingContext2d, fill: &Fill) {
    set_fill_style(ctx, &css(fill.color));
    ctx.set_global_alpha(fill.alpha);
    ctx.fill();
}

/// Replay chain-local draw commands with the chain origin at `origin` and
/// `scale` canvas pixels per unit.
pub fn paint(
    ctx: &CanvasRenderingContext2d,
    commands: &[DrawCommand],
    origin: (f64, f64),
    scale: f64,
) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_transform(scale, 0.0, 0.0, scale, origin.0, origin.1)?;
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
    for cmd in commands {
        ctx.begin_path();
        match cmd {
            DrawCommand::Arc {
                center,
                radius,
                start_angle,
                end_angle,
                anticlockwise,
                stroke,
            } => {
                ctx.arc_with_anticlockwise(
                    center.x,
                    center.y,
                    *radius,
                    *start_angle,
                    *end_angle,
                    *anticlockwise,
                )?;
                apply_stroke(ctx, stroke);
            }
            DrawCommand::Line { from, to, stroke } => {
                ctx.move_to(from.x, from.y);
                ctx.line_to(to.x, to.y);
                apply_stroke(ctx, stroke);
            }
            DrawCommand::Polygon { points, fill } => {
                let mut it = points.iter();
                if let Some(first) = it.next() {
                    ctx.move_to(first.x, first.y);
                    for p in it {
                        ctx.line_to(p.x, p.y);
                    }
                    ctx.close_path();
                    apply_fill(ctx, fill);
                }
            }
            DrawCommand::Circle {
                center,
                radius,
                fill,
                stroke,
            } => {
                ctx.arc(center.x, center.y, *radius, 0.0, std::f64::consts::TAU)?;
                if let Some(fill) = fill {
                    apply_fill(ctx, fill);
                }
                if let Some(stroke) = stroke {
                    apply_stroke(ctx, stroke);
                }
            }
        }
    }
    ctx.restore();
    Ok(())
}

/// Clear the whole backing store regardless of the current transform.
pub fn clear(ctx: &CanvasRenderingContext2d, width: f64, height: f64) -> Result<(), JsValue> {
    ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, width, height);
    Ok(())
}
