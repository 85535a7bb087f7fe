//! Explosion of lightweight polylines into native `LINE` and `ARC` entities.
//!
//! Each polyline segment runs from one vertex to the next (and, for a
//! closed polyline, from the last vertex back to the first). A zero
//! bulge is a straight `LINE`; a non-zero bulge is an `ARC` whose
//! included angle is `4 * atan(bulge)`.
//!
//! `ARC` entities always wind counterclockwise, so a clockwise segment
//! (negative bulge) becomes an arc running from the segment's end
//! vertex back to its start vertex. The geometry covered is identical;
//! only the traversal direction flips.

use std::f64::consts::FRAC_PI_2;

use crate::source::{DxfEntity, Point3, PolylineVertex};
use crate::types::Point;

/// Bulges smaller than this are treated as straight segments.
const BULGE_EPSILON: f64 = 1e-12;

/// Explode a polyline into `LINE` and `ARC` entities, in vertex order.
///
/// Polylines with fewer than two vertices produce nothing. Coincident
/// vertices produce a zero-length `LINE` (even when bulged) and are left
/// for the degenerate filter to remove.
#[must_use]
pub fn explode_polyline(vertices: &[PolylineVertex], closed: bool) -> Vec<DxfEntity> {
    if vertices.len() < 2 {
        return Vec::new();
    }

    let closing = closed.then(|| (vertices[vertices.len() - 1], vertices[0]));
    vertices
        .windows(2)
        .map(|pair| (pair[0], pair[1]))
        .chain(closing)
        .map(|(from, to)| explode_segment(from, to))
        .collect()
}

fn explode_segment(from: PolylineVertex, to: PolylineVertex) -> DxfEntity {
    let (start, end) = (from.point(), to.point());
    if from.bulge.abs() < BULGE_EPSILON || start.distance_squared(end) == 0.0 {
        return DxfEntity::Line {
            start: Point3::new(start.x, start.y, 0.0),
            end: Point3::new(end.x, end.y, 0.0),
        };
    }
    bulge_arc(start, end, from.bulge)
}

/// Convert one bulged segment into a counterclockwise `ARC`.
fn bulge_arc(start: Point, end: Point, bulge: f64) -> DxfEntity {
    let included = 4.0 * bulge.abs().atan();
    let chord = start.distance(end);
    let radius = chord / (2.0 * (included / 2.0).sin());

    // Isosceles triangle start/center/end: the base angle at `start` is
    // (pi - included) / 2, measured to the left of the chord for a
    // counterclockwise bulge and to the right for a clockwise one.
    let chord_angle = (end.y - start.y).atan2(end.x - start.x);
    let offset = FRAC_PI_2 - included / 2.0;
    let to_center = if bulge > 0.0 {
        chord_angle + offset
    } else {
        chord_angle - offset
    };
    let (sin, cos) = to_center.sin_cos();
    let center = Point::new(radius.mul_add(cos, start.x), radius.mul_add(sin, start.y));

    let angle_of = |p: Point| {
        (p.y - center.y)
            .atan2(p.x - center.x)
            .to_degrees()
            .rem_euclid(360.0)
    };
    let (start_angle, end_angle) = if bulge > 0.0 {
        (angle_of(start), angle_of(end))
    } else {
        (angle_of(end), angle_of(start))
    };

    DxfEntity::Arc {
        center: Point3::new(center.x, center.y, 0.0),
        radius,
        start_angle,
        end_angle,
    }
}
