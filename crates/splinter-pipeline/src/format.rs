//! Number formatting shared by path data and the SVG serializer.

/// Format a coordinate in shortest round-trip form.
///
/// Integral values keep a trailing `.0` (`10.0`, not `10`) so the
/// output reads the same for every element regardless of whether the
/// source wrote `10` or `10.0`.
#[must_use]
pub fn number(value: f64) -> String {
    format!("{value:?}")
}

/// Format a point as `x,y`.
#[must_use]
pub fn pair(x: f64, y: f64) -> String {
    format!("{},{}", number(x), number(y))
}
