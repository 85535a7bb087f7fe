//! Degenerate line filtering.
//!
//! Both source formats can emit a zero or near-zero length line when a
//! path is closed onto the point it already sits at. Those lines are
//! visual noise for a cutter, so they are dropped before deduplication
//! and never receive an identifier.
//!
//! Only straight lines are length-checked. A curve collapsed to a point
//! by a closepath is kept as-is.

use crate::types::Geometry;

/// Returns `true` if `geometry` is a line strictly shorter than `min_length`.
///
/// Curves and arcs always return `false`.
#[must_use]
pub fn is_degenerate(geometry: &Geometry, min_length: f64) -> bool {
    match geometry {
        Geometry::Line { start, end } => start.distance(*end) < min_length,
        Geometry::Arc { .. } | Geometry::CubicBezier { .. } | Geometry::QuadraticBezier { .. } => {
            false
        }
    }
}
