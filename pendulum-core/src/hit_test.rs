//! Pointer hit-testing against segment bodies and rods.

use crate::constants::{ROD_HIT_TOLERANCE, SEGMENT_HIT_MARGIN};
use crate::geom::{Point, closest_point_on_segment};
use crate::model::{Segment, rod_origin};

/// What a pointer landed on. Both variants carry the owning segment index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hit {
    Segment(usize),
    Rod(usize),
}

impl Hit {
    pub fn index(self) -> usize {
        match self {
            Hit::Segment(i) | Hit::Rod(i) => i,
        }
    }
}

/// Segment bodies first, then rods; chain order breaks ties within each.
pub fn hit_test(p: Point, segments: &[Segment]) -> Option<Hit> {
    if !p.is_finite() {
        return None;
    }
    hit_segment(p, segments)
        .map(Hit::Segment)
        .or_else(|| hit_rod(p, segments).map(Hit::Rod))
}

/// First segment whose body (plus margin) contains `p`.
pub fn hit_segment(p: Point, segments: &[Segment]) -> Option<usize> {
    segments
        .iter()
        .position(|s| p.distance_to(s.position) < s.radius + SEGMENT_HIT_MARGIN)
}

/// First rod within tolerance of `p`. Zero-length rods never match.
pub fn hit_rod(p: Point, segments: &[Segment]) -> Option<usize> {
    (0..segments.len()).find(|&i| {
        if segments[i].rod.is_none() {
            return false;
        }
        distance_to_rod(p, rod_origin(segments, i), segments[i].position)
            .is_some_and(|d| d < ROD_HIT_TOLERANCE)
    })
}

fn distance_to_rod(p: Point, from: Point, to: Point) -> Option<f64> {
    closest_point_on_segment(p, from, to).map(|foot| p.distance_to(foot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Rgb, Rod};

    fn seg(index: usize, x: f64, y: f64, radius: f64) -> Segment {
        Segment {
            index,
            position: Point::new(x, y),
            theta: 0.0,
            omega: 0.0,
            mass: 1.0,
            radius,
            color: Rgb(0xff0000),
            rod: Some(Rod {
                length: 100.0,
                color: Rgb(0),
            }),
        }
    }

    #[test]
    fn segment_hit_uses_radius_plus_margin() {
        let chain = [seg(0, 0.0, 100.0, 10.0)];
        assert_eq!(hit_segment(Point::new(19.9, 100.0), &chain), Some(0));
        assert_eq!(hit_segment(Point::new(20.0, 100.0), &chain), None);
    }

    #[test]
    fn segment_hit_short_circuits_rod_hit() {
        // Segment 1 sits right on top of rod 0.
        let chain = [seg(0, 0.0, 100.0, 10.0), seg(1, 0.0, 50.0, 5.0)];
        assert_eq!(hit_test(Point::new(2.0, 52.0), &chain), Some(Hit::Segment(1)));
    }

    #[test]
    fn first_overlapping_segment_wins() {
        let mut chain: Vec<Segment> = (0..6)
            .map(|i| seg(i, 500.0 + i as f64 * 100.0, 0.0, 5.0))
            .collect();
        chain[2].position = Point::new(10.0, 10.0);
        chain[5].position = Point::new(11.0, 10.0);
        // Closer to 5, but 2 comes first in chain order.
        assert_eq!(hit_test(Point::new(11.0, 10.0), &chain), Some(Hit::Segment(2)));
    }

    #[test]
    fn rod_hit_selects_owning_segment() {
        let chain = [seg(0, 0.0, 100.0, 10.0), seg(1, 100.0, 100.0, 10.0)];
        assert_eq!(hit_test(Point::new(3.0, 40.0), &chain), Some(Hit::Rod(0)));
        assert_eq!(hit_test(Point::new(50.0, 95.0), &chain), Some(Hit::Rod(1)));
    }

    #[test]
    fn rod_projection_is_clamped_to_endpoints() {
        let chain = [seg(0, 0.0, 100.0, 0.0)];
        let p = Point::new(5.0, 150.0);
        let d = distance_to_rod(p, Point::ORIGIN, Point::new(0.0, 100.0)).unwrap();
        assert!((d - (25.0_f64 + 2500.0).sqrt()).abs() < 1e-12);
        assert!(d > ROD_HIT_TOLERANCE);
        assert_eq!(hit_test(p, &chain), None);
    }

    #[test]
    fn degenerate_rod_never_matches() {
        let chain = [seg(0, 0.0, 0.0, -20.0)];
        assert_eq!(hit_rod(Point::new(1.0, 1.0), &chain), None);
        assert_eq!(hit_test(Point::new(1.0, 1.0), &chain), None);
    }

    #[test]
    fn rodless_segment_only_hits_by_body() {
        let mut s = seg(0, 0.0, 100.0, 10.0);
        s.rod = None;
        let chain = [s];
        assert_eq!(hit_test(Point::new(0.0, 50.0), &chain), None);
        assert_eq!(hit_test(Point::new(0.0, 95.0), &chain), Some(Hit::Segment(0)));
    }

    #[test]
    fn empty_chain_and_nan_pointer_miss() {
        assert_eq!(hit_test(Point::new(0.0, 0.0), &[]), None);
        let chain = [seg(0, 0.0, 100.0, 10.0)];
        assert_eq!(hit_test(Point::new(f64::NAN, 100.0), &chain), None);
    }
}
