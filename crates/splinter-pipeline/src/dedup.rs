//! Duplicate straight-line detection.
//!
//! Two lines are duplicates when their endpoints match as an unordered
//! pair after rounding each coordinate to a fixed number of decimal
//! digits. Traversal direction therefore does not matter: `A -> B` and
//! `B -> A` share one [`CanonicalLineKey`].
//!
//! The index is owned by a single decomposition run and dropped with
//! it. Curves and arcs are never keyed, even when identical.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::format;
use crate::types::{Geometry, Point};

/// Order-independent identity of a straight line.
///
/// Each coordinate is rounded to `precision` decimal digits and kept as
/// an `f64`; equality and hashing compare the rounded bit patterns.
/// `-0.0` is folded into `0.0`. Magnitudes too large to carry digits at
/// that precision are kept as they are, so distinct far-away lines never
/// share a key.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CanonicalLineKey {
    first: (f64, f64),
    second: (f64, f64),
    precision: u32,
}

impl CanonicalLineKey {
    /// Build the key for the line between `a` and `b`.
    #[must_use]
    pub fn new(a: Point, b: Point, precision: u32) -> Self {
        let scale = scale(precision);
        let ra = (round_to(a.x, scale), round_to(a.y, scale));
        let rb = (round_to(b.x, scale), round_to(b.y, scale));
        let (first, second) = if lexicographic(ra, rb).is_le() {
            (ra, rb)
        } else {
            (rb, ra)
        };
        Self {
            first,
            second,
            precision,
        }
    }

    /// The rounded endpoints, lexicographically smaller first.
    #[must_use]
    pub const fn endpoints(&self) -> (Point, Point) {
        (
            Point::new(self.first.0, self.first.1),
            Point::new(self.second.0, self.second.1),
        )
    }

    fn bits(&self) -> [u64; 4] {
        [
            self.first.0.to_bits(),
            self.first.1.to_bits(),
            self.second.0.to_bits(),
            self.second.1.to_bits(),
        ]
    }
}

impl PartialEq for CanonicalLineKey {
    fn eq(&self, other: &Self) -> bool {
        self.precision == other.precision && self.bits() == other.bits()
    }
}

impl Eq for CanonicalLineKey {}

impl Hash for CanonicalLineKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits().hash(state);
        self.precision.hash(state);
    }
}

impl fmt::Display for CanonicalLineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (a, b) = self.endpoints();
        write!(
            f,
            "(({}, {}), ({}, {}))",
            format::number(a.x),
            format::number(a.y),
            format::number(b.x),
            format::number(b.y),
        )
    }
}

/// Beyond this scaled magnitude every `f64` is already an integer.
const EXACT_LIMIT: f64 = 4_503_599_627_370_496.0; // 2^52

fn scale(precision: u32) -> f64 {
    10f64.powi(i32::try_from(precision).unwrap_or(i32::MAX))
}

/// Round `value` to the digits `scale` selects; NaN becomes the canonical NaN.
fn round_to(value: f64, scale: f64) -> f64 {
    if value.is_nan() {
        return f64::NAN;
    }
    let scaled = value * scale;
    let rounded = if scaled.is_finite() && scaled.abs() < EXACT_LIMIT {
        scaled.round() / scale
    } else {
        value
    };
    // Fold -0.0 into 0.0.
    if rounded == 0.0 { 0.0 } else { rounded }
}

fn lexicographic(a: (f64, f64), b: (f64, f64)) -> std::cmp::Ordering {
    a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1))
}

/// Outcome of offering a primitive to the [`DedupIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// First occurrence of this line, or a curve (never keyed).
    Admitted,
    /// A line with this key was already admitted in this run.
    Duplicate(CanonicalLineKey),
}

/// Set of lines already emitted during one run.
#[derive(Debug, Clone)]
pub struct DedupIndex {
    seen: HashSet<CanonicalLineKey>,
    precision: u32,
}

impl DedupIndex {
    /// Create an empty index that rounds to `precision` decimal digits.
    #[must_use]
    pub fn new(precision: u32) -> Self {
        Self {
            seen: HashSet::new(),
            precision,
        }
    }

    /// Offer a primitive to the index.
    ///
    /// Lines are keyed and recorded on first sight; a repeat is reported
    /// as [`Admission::Duplicate`] and not recorded again. Curves and
    /// arcs are always admitted.
    pub fn admit(&mut self, geometry: &Geometry) -> Admission {
        match geometry {
            Geometry::Line { start, end } => {
                let key = CanonicalLineKey::new(*start, *end, self.precision);
                if self.seen.insert(key) {
                    Admission::Admitted
                } else {
                    Admission::Duplicate(key)
                }
            }
            Geometry::Arc { .. }
            | Geometry::CubicBezier { .. }
            | Geometry::QuadraticBezier { .. } => Admission::Admitted,
        }
    }

    /// Number of distinct lines recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Returns `true` if no line has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Vector;

    fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Geometry {
        Geometry::Line {
            start: Point::new(x1, y1),
            end: Point::new(x2, y2),
        }
    }

    // --- CanonicalLineKey ---

    #[test]
    fn key_rounds_to_precision() {
        let key = CanonicalLineKey::new(
            Point::new(1.123_456_789, 2.987_654_321),
            Point::new(1.123_456_789, 2.987_654_321),
            6,
        );
        let (a, _) = key.endpoints();
        assert!((a.x - 1.123_457).abs() < 1e-12);
        assert!((a.y - 2.987_654).abs() < 1e-12);
    }

    #[test]
    fn key_respects_lower_precision() {
        let key = CanonicalLineKey::new(
            Point::new(1.123_456_789, 2.987_654_321),
            Point::new(0.0, 0.0),
            2,
        );
        let (a, b) = key.endpoints();
        assert_eq!(a, Point::new(0.0, 0.0));
        assert!((b.x - 1.12).abs() < 1e-12);
        assert!((b.y - 2.99).abs() < 1e-12);
    }

    #[test]
    fn key_is_order_independent() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(3.0, 4.0);
        let forward = CanonicalLineKey::new(a, b, 6);
        let reverse = CanonicalLineKey::new(b, a, 6);
        assert_eq!(forward, reverse);
        assert_eq!(forward.endpoints(), (a, b));
    }

    #[test]
    fn key_of_identical_points() {
        let p = Point::new(1.0, 2.0);
        assert_eq!(CanonicalLineKey::new(p, p, 6).endpoints(), (p, p));
    }

    #[test]
    fn key_negative_coordinates() {
        let key = CanonicalLineKey::new(
            Point::new(-1.123_456, -2.987_654),
            Point::new(0.0, 0.0),
            6,
        );
        let (a, _) = key.endpoints();
        assert!((a.x + 1.123_456).abs() < 1e-12);
        assert!((a.y + 2.987_654).abs() < 1e-12);
    }

    #[test]
    fn negative_zero_matches_zero() {
        let a = CanonicalLineKey::new(Point::new(-0.0, 0.0), Point::new(5.0, 5.0), 6);
        let b = CanonicalLineKey::new(Point::new(0.0, -0.0), Point::new(5.0, 5.0), 6);
        assert_eq!(a, b);
    }

    #[test]
    fn noise_below_precision_collapses() {
        let a = CanonicalLineKey::new(Point::new(10.0, 10.0), Point::new(90.0, 10.0), 6);
        let b = CanonicalLineKey::new(
            Point::new(90.000_000_000_1, 10.0),
            Point::new(9.999_999_999_9, 10.0),
            6,
        );
        assert_eq!(a, b);
    }

    #[test]
    fn far_apart_lines_keep_distinct_keys() {
        let near = CanonicalLineKey::new(Point::new(2e7, 0.0), Point::new(2e7, 100.0), 12);
        let far = CanonicalLineKey::new(Point::new(3e7, 0.0), Point::new(3e7, 100.0), 12);
        assert_ne!(near, far);
        assert_eq!(near.endpoints().0, Point::new(2e7, 0.0));

        let huge = CanonicalLineKey::new(Point::new(1e300, 0.0), Point::new(0.0, 0.0), 12);
        let huger = CanonicalLineKey::new(Point::new(2e300, 0.0), Point::new(0.0, 0.0), 12);
        assert_ne!(huge, huger);
    }

    #[test]
    fn large_coordinates_still_round() {
        let a = CanonicalLineKey::new(Point::new(2e7, 0.0), Point::new(2e7 + 0.5, 0.0), 6);
        let b = CanonicalLineKey::new(
            Point::new(2e7 + 0.000_000_1, 0.0),
            Point::new(2e7 + 0.5, 0.0),
            6,
        );
        assert_eq!(a, b);
    }

    #[test]
    fn key_display() {
        let key = CanonicalLineKey::new(Point::new(90.0, 10.0), Point::new(10.0, 10.0), 6);
        assert_eq!(key.to_string(), "((10.0, 10.0), (90.0, 10.0))");
    }

    // --- DedupIndex ---

    #[test]
    fn first_line_is_admitted() {
        let mut index = DedupIndex::new(6);
        assert!(index.is_empty());
        assert_eq!(index.admit(&line(10.0, 10.0, 90.0, 10.0)), Admission::Admitted);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn repeated_line_is_duplicate() {
        let mut index = DedupIndex::new(6);
        index.admit(&line(10.0, 10.0, 90.0, 10.0));
        assert!(matches!(
            index.admit(&line(10.0, 10.0, 90.0, 10.0)),
            Admission::Duplicate(_)
        ));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn reversed_line_is_duplicate() {
        let mut index = DedupIndex::new(6);
        index.admit(&line(10.0, 10.0, 90.0, 10.0));
        let Admission::Duplicate(key) = index.admit(&line(90.0, 10.0, 10.0, 10.0)) else {
            unreachable!("reversed line was admitted");
        };
        assert_eq!(key.to_string(), "((10.0, 10.0), (90.0, 10.0))");
    }

    #[test]
    fn distinct_lines_are_admitted() {
        let mut index = DedupIndex::new(6);
        assert_eq!(index.admit(&line(10.0, 10.0, 90.0, 10.0)), Admission::Admitted);
        assert_eq!(index.admit(&line(10.0, 20.0, 90.0, 20.0)), Admission::Admitted);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn identical_curves_are_never_deduplicated() {
        let mut index = DedupIndex::new(6);
        let quad = Geometry::QuadraticBezier {
            start: Point::new(30.0, 30.0),
            control: Point::new(50.0, 10.0),
            end: Point::new(70.0, 30.0),
        };
        let arc = Geometry::Arc {
            start: Point::new(30.0, 30.0),
            end: Point::new(70.0, 30.0),
            radius: Vector::new(20.0, 20.0),
            rotation: 0.0,
            large_arc: false,
            sweep: true,
        };
        for _ in 0..3 {
            assert_eq!(index.admit(&quad), Admission::Admitted);
            assert_eq!(index.admit(&arc), Admission::Admitted);
        }
        assert!(index.is_empty());
    }
}
