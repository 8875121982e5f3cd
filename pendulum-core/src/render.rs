//! Turns a chain snapshot into an ordered list of draw primitives.
//!
//! Rendering is a pure function of its inputs; the host replays the
//! commands onto whatever surface it owns.

use std::f64::consts::FRAC_PI_2;

use crate::constants::*;
use crate::geom::Point;
use crate::model::{Rgb, Segment, TrailSample, rod_origin};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Rgb,
    pub alpha: f64,
    pub width: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fill {
    pub color: Rgb,
    pub alpha: f64,
}

/// One drawing primitive, in chain-local coordinates. Angles follow canvas
/// conventions: radians from +x, growing clockwise on a y-down surface.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Arc {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
        stroke: Stroke,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    Polygon {
        points: Vec<Point>,
        fill: Fill,
    },
    Circle {
        center: Point,
        radius: f64,
        fill: Option<Fill>,
        stroke: Option<Stroke>,
    },
}

/// Everything a frame depends on.
#[derive(Clone, Copy, Debug)]
pub struct Scene<'a> {
    pub segments: &'a [Segment],
    pub trails: &'a [&'a [TrailSample]],
    pub paused: bool,
    pub hovered: Option<usize>,
}

/// Opacity of the `j`-th sample of a trail with `len` samples.
pub fn trail_alpha(j: usize, len: usize) -> f64 {
    if len == 0 {
        return 0.0;
    }
    (j + 1) as f64 / len as f64
}

pub fn render_scene(scene: &Scene<'_>) -> Vec<DrawCommand> {
    let mut out = Vec::new();
    let segments = scene.segments;

    if scene.paused {
        for (i, s) in segments.iter().enumerate() {
            out.push(angle_arc(rod_origin(segments, i), s.theta));
            velocity_vector(s, &mut out);
        }
    }

    out.push(DrawCommand::Circle {
        center: Point::ORIGIN,
        radius: PIVOT_RADIUS,
        fill: Some(Fill {
            color: Rgb(PIVOT_COLOR),
            alpha: 1.0,
        }),
        stroke: None,
    });

    for (i, s) in segments.iter().enumerate() {
        if let Some(rod) = s.rod {
            out.push(DrawCommand::Line {
                from: rod_origin(segments, i),
                to: s.position,
                stroke: Stroke {
                    color: rod.color,
                    alpha: 1.0,
                    width: ROD_STROKE_WIDTH,
                },
            });
        }
    }

    for trail in scene.trails {
        trail_lines(trail, &mut out);
    }

    let hovered = scene.hovered.filter(|_| scene.paused);
    for (i, s) in segments.iter().enumerate() {
        if hovered == Some(i) {
            out.push(DrawCommand::Circle {
                center: s.position,
                radius: s.radius + HOVER_PADDING,
                fill: Some(Fill {
                    color: Rgb(HOVER_COLOR),
                    alpha: 0.1,
                }),
                stroke: Some(Stroke {
                    color: Rgb(HOVER_COLOR),
                    alpha: 0.6,
                    width: HOVER_STROKE_WIDTH,
                }),
            });
        }
        out.push(DrawCommand::Circle {
            center: s.position,
            radius: s.radius,
            fill: Some(Fill {
                color: s.color,
                alpha: 1.0,
            }),
            stroke: None,
        });
    }
    out
}

/// Arc from the downward vertical to `theta` around the rod origin.
fn angle_arc(center: Point, theta: f64) -> DrawCommand {
    DrawCommand::Arc {
        center,
        radius: ANGLE_ARC_RADIUS,
        start_angle: FRAC_PI_2 - theta,
        end_angle: FRAC_PI_2,
        anticlockwise: theta < 0.0,
        stroke: Stroke {
            color: Rgb(OVERLAY_COLOR),
            alpha: 0.8,
            width: ARC_STROKE_WIDTH,
        },
    }
}

/// Tangential velocity `omega * L` as a shaft plus a filled arrowhead.
fn velocity_vector(s: &Segment, out: &mut Vec<DrawCommand>) {
    let lever = s.rod_length().unwrap_or(DEFAULT_VECTOR_ROD_LENGTH);
    let magnitude = (s.omega * lever).abs();
    if magnitude.is_nan() || magnitude <= VELOCITY_MIN_MAGNITUDE {
        return;
    }
    let direction = if s.omega > 0.0 {
        s.theta + FRAC_PI_2
    } else {
        s.theta - FRAC_PI_2
    };
    let tip = s.position + Point::from_pendulum_angle(direction) * magnitude;
    let stroke = Stroke {
        color: Rgb(OVERLAY_COLOR),
        alpha: 1.0,
        width: VECTOR_STROKE_WIDTH,
    };
    out.push(DrawCommand::Line {
        from: s.position,
        to: tip,
        stroke,
    });
    out.push(DrawCommand::Polygon {
        points: arrowhead(s.position, tip).to_vec(),
        fill: Fill {
            color: stroke.color,
            alpha: 1.0,
        },
    });
}

/// Apex set back from `tip` along the shaft, legs swept back at +-30 degrees.
fn arrowhead(tail: Point, tip: Point) -> [Point; 3] {
    let d = tip - tail;
    let shaft = d.y.atan2(d.x);
    let apex = tip - Point::from_canvas_angle(shaft) * ARROW_SETBACK;
    [
        apex,
        apex - Point::from_canvas_angle(shaft - ARROW_LEG_ANGLE) * ARROW_LEG_LENGTH,
        apex - Point::from_canvas_angle(shaft + ARROW_LEG_ANGLE) * ARROW_LEG_LENGTH,
    ]
}

fn trail_lines(trail: &[TrailSample], out: &mut Vec<DrawCommand>) {
    let len = trail.len();
    for (j, pair) in trail.windows(2).enumerate() {
        let sample = pair[1];
        out.push(DrawCommand::Line {
            from: pair[0].position,
            to: sample.position,
            stroke: Stroke {
                color: sample.color,
                alpha: trail_alpha(j + 1, len),
                width: TRAIL_STROKE_WIDTH,
            },
        });
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;
    use crate::model::Rod;

    fn seg(index: usize, position: Point, theta: f64, omega: f64) -> Segment {
        Segment {
            index,
            position,
            theta,
            omega,
            mass: 1.0,
            radius: 10.0,
            color: Rgb(0x00ff00),
            rod: Some(Rod {
                length: 100.0,
                color: Rgb(0x0f0f0f),
            }),
        }
    }

    fn scene<'a>(
        segments: &'a [Segment],
        trails: &'a [&'a [TrailSample]],
        paused: bool,
    ) -> Scene<'a> {
        Scene {
            segments,
            trails,
            paused,
            hovered: None,
        }
    }

    #[test]
    fn trail_alphas_increase_towards_newest() {
        let alphas: Vec<f64> = (0..4).map(|j| trail_alpha(j, 4)).collect();
        assert_eq!(alphas, vec![0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn empty_chain_draws_only_the_pivot() {
        for paused in [false, true] {
            let cmds = render_scene(&scene(&[], &[], paused));
            assert_eq!(cmds.len(), 1);
            assert!(matches!(
                cmds[0],
                DrawCommand::Circle { radius, .. } if radius == PIVOT_RADIUS
            ));
        }
    }

    #[test]
    fn running_frame_orders_pivot_rods_bodies() {
        let chain = [seg(0, Point::new(100.0, 0.0), PI / 2.0, 0.0)];
        let cmds = render_scene(&scene(&chain, &[], false));
        assert_eq!(cmds.len(), 3);
        assert!(matches!(cmds[0], DrawCommand::Circle { .. }));
        assert!(matches!(
            cmds[1],
            DrawCommand::Line { from, to, stroke } if from == Point::ORIGIN
                && to == Point::new(100.0, 0.0)
                && stroke.width == ROD_STROKE_WIDTH
        ));
        assert!(matches!(cmds[2], DrawCommand::Circle { radius, .. } if radius == 10.0));
    }

    #[test]
    fn rodless_segment_renders_without_rod() {
        let mut s = seg(0, Point::new(0.0, 50.0), 0.3, 2.0);
        s.rod = None;
        let chain = [s];
        let cmds = render_scene(&scene(&chain, &[], true));
        assert!(
            !cmds
                .iter()
                .any(|c| matches!(c, DrawCommand::Line { from, .. } if *from == Point::ORIGIN))
        );
        // Velocity falls back to a 100-unit lever: |2 * 100| = 200.
        let shaft = cmds.iter().find_map(|c| match c {
            DrawCommand::Line { from, to, .. } => Some(from.distance_to(*to)),
            _ => None,
        });
        assert!((shaft.unwrap() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn paused_arc_direction_follows_angle_sign() {
        let chain = [
            seg(0, Point::new(0.0, 100.0), 0.5, 0.0),
            seg(1, Point::new(0.0, 200.0), -0.5, 0.0),
        ];
        let arcs: Vec<_> = render_scene(&scene(&chain, &[], true))
            .into_iter()
            .filter_map(|c| match c {
                DrawCommand::Arc {
                    center,
                    radius,
                    start_angle,
                    end_angle,
                    anticlockwise,
                    ..
                } => Some((center, radius, start_angle, end_angle, anticlockwise)),
                _ => None,
            })
            .collect();
        assert_eq!(arcs.len(), 2);
        assert_eq!(arcs[0], (Point::ORIGIN, 40.0, PI / 2.0 - 0.5, PI / 2.0, false));
        assert_eq!(arcs[1], (Point::new(0.0, 100.0), 40.0, PI / 2.0 + 0.5, PI / 2.0, true));
    }

    #[test]
    fn velocity_vector_is_tangent_with_arrowhead() {
        // Hanging straight down, swinging to the right.
        let chain = [seg(0, Point::new(0.0, 100.0), 0.0, 0.5)];
        let cmds = render_scene(&scene(&chain, &[], true));
        let (from, to) = cmds
            .iter()
            .find_map(|c| match c {
                DrawCommand::Line { from, to, stroke } if stroke.width == VECTOR_STROKE_WIDTH => {
                    Some((*from, *to))
                }
                _ => None,
            })
            .unwrap();
        assert_eq!(from, Point::new(0.0, 100.0));
        assert!((to.x - 50.0).abs() < 1e-9 && (to.y - 100.0).abs() < 1e-9);

        let head = cmds
            .iter()
            .find_map(|c| match c {
                DrawCommand::Polygon { points, .. } => Some(points.clone()),
                _ => None,
            })
            .unwrap();
        assert!((head[0].x - 42.0).abs() < 1e-9 && (head[0].y - 100.0).abs() < 1e-9);
        for leg in &head[1..] {
            assert!((leg.distance_to(head[0]) - ARROW_LEG_LENGTH).abs() < 1e-9);
            assert!(leg.x < head[0].x);
        }
    }

    #[test]
    fn slow_segments_have_no_velocity_vector() {
        let chain = [seg(0, Point::new(0.0, 100.0), 0.0, 0.0005)];
        let cmds = render_scene(&scene(&chain, &[], true));
        assert!(!cmds.iter().any(|c| matches!(c, DrawCommand::Polygon { .. })));
    }

    #[test]
    fn trail_segments_use_sample_colors_and_rising_alpha() {
        let samples: Vec<TrailSample> = (0..4)
            .map(|k| TrailSample {
                position: Point::new(k as f64, 0.0),
                color: Rgb(k as u32),
            })
            .collect();
        let trails = [samples.as_slice()];
        let cmds = render_scene(&scene(&[], &trails, false));
        let strokes: Vec<Stroke> = cmds
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Line { stroke, .. } => Some(*stroke),
                _ => None,
            })
            .collect();
        assert_eq!(strokes.len(), 3);
        assert_eq!(strokes.iter().map(|s| s.alpha).collect::<Vec<_>>(), vec![0.5, 0.75, 1.0]);
        assert_eq!(
            strokes.iter().map(|s| s.color).collect::<Vec<_>>(),
            vec![Rgb(1), Rgb(2), Rgb(3)]
        );
    }

    #[test]
    fn hover_highlight_only_while_paused_and_beneath_body() {
        let chain = [seg(0, Point::new(0.0, 100.0), 0.0, 0.0)];
        let mut sc = scene(&chain, &[], false);
        sc.hovered = Some(0);
        let hover_ring =
            |c: &DrawCommand| matches!(c, DrawCommand::Circle { radius, .. } if *radius == 18.0);
        assert!(!render_scene(&sc).iter().any(hover_ring));

        sc.paused = true;
        let cmds = render_scene(&sc);
        let n = cmds.len();
        assert!(matches!(
            cmds[n - 2],
            DrawCommand::Circle { radius, stroke: Some(_), .. } if radius == 18.0
        ));
        assert!(matches!(cmds[n - 1], DrawCommand::Circle { radius, .. } if radius == 10.0));
    }

    #[test]
    fn stale_hover_index_is_ignored() {
        let chain = [seg(0, Point::new(0.0, 100.0), 0.0, 0.0)];
        let mut sc = scene(&chain, &[], true);
        sc.hovered = Some(7);
        let cmds = render_scene(&sc);
        assert!(!cmds.iter().any(|c| matches!(c, DrawCommand::Circle { stroke: Some(_), .. })));
    }

    #[test]
    fn rendering_is_idempotent() {
        let chain = [seg(0, Point::new(30.0, 90.0), 0.3, -0.4)];
        let sc = scene(&chain, &[], true);
        assert_eq!(render_scene(&sc), render_scene(&sc));
    }
}
