//! Conversion of center/radius/angle arcs into SVG endpoint form.
//!
//! DXF stores an `ARC` as a center, a radius, and start/end angles in
//! degrees, always winding counterclockwise. SVG path data wants the
//! two endpoints plus the large-arc and sweep flags. Arcs that already
//! come from SVG are never passed through here.

use crate::types::{Geometry, Point, Vector};

/// Point on a circle at `angle_deg` degrees from the positive x-axis.
#[must_use]
pub fn point_at(center: Point, radius: f64, angle_deg: f64) -> Point {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    Point::new(radius.mul_add(cos, center.x), radius.mul_add(sin, center.y))
}

/// Counterclockwise sweep from `start_deg` to `end_deg`, in `[0, 360)`.
#[must_use]
pub fn ccw_sweep(start_deg: f64, end_deg: f64) -> f64 {
    (end_deg - start_deg).rem_euclid(360.0)
}

/// Normalize a counterclockwise center-form arc into an [`Geometry::Arc`].
///
/// The large-arc flag is set when the counterclockwise sweep exceeds
/// 180 degrees; the sweep flag is always set because DXF arcs wind
/// counterclockwise. Rotation is always zero since the radii are equal.
///
/// # Examples
///
/// ```
/// use splinter_pipeline::arc::normalize;
/// use splinter_pipeline::{Geometry, Point};
///
/// let Geometry::Arc { start, large_arc, sweep, .. } =
///     normalize(Point::new(50.0, 50.0), 25.0, 0.0, 180.0)
/// else {
///     unreachable!()
/// };
/// assert!((start.x - 75.0).abs() < 1e-9);
/// assert!(!large_arc);
/// assert!(sweep);
/// ```
#[must_use]
pub fn normalize(center: Point, radius: f64, start_deg: f64, end_deg: f64) -> Geometry {
    Geometry::Arc {
        start: point_at(center, radius, start_deg),
        end: point_at(center, radius, end_deg),
        radius: Vector::new(radius, radius),
        rotation: 0.0,
        large_arc: ccw_sweep(start_deg, end_deg) > 180.0,
        sweep: true,
    }
}
