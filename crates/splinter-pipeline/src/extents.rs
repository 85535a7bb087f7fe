//! Drawing extents and unit resolution for DXF input.
//!
//! The bounding box covers every entity of the drawing, including ones
//! the decomposition later skips or drops, so the output canvas matches
//! the source drawing. When no box can be computed the document simply
//! carries no viewBox; that is not a conversion failure.

use geo::{BoundingRect, Coord, MultiPoint};
use serde::{Deserialize, Serialize};

use crate::arc;
use crate::explode::explode_polyline;
use crate::source::{DxfDrawing, DxfEntity};
use crate::types::Point;

/// Axis-aligned bounding box in drawing units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Smallest x.
    pub min_x: f64,
    /// Smallest y.
    pub min_y: f64,
    /// Largest x.
    pub max_x: f64,
    /// Largest y.
    pub max_y: f64,
}

impl Bounds {
    /// Horizontal extent.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Vertical extent.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Why extents could not be computed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtentsError {
    /// The drawing has no entity with measurable geometry.
    #[error("drawing has no measurable entities")]
    Empty,

    /// An entity has a non-finite coordinate or radius.
    #[error("{0} entity has non-finite geometry")]
    NonFinite(String),
}

/// Canvas metadata attached to a document: bounding box plus unit suffix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
    /// Left edge.
    pub min_x: f64,
    /// Top edge in SVG terms (smallest y).
    pub min_y: f64,
    /// Width in drawing units.
    pub width: f64,
    /// Height in drawing units.
    pub height: f64,
    /// SVG length suffix for `width`/`height` (`mm`, `in`, ...), or empty.
    pub unit: String,
}

impl ViewBox {
    /// Build a viewBox from bounds and a unit suffix.
    #[must_use]
    pub fn new(bounds: Bounds, unit: &str) -> Self {
        Self {
            min_x: bounds.min_x,
            min_y: bounds.min_y,
            width: bounds.width(),
            height: bounds.height(),
            unit: unit.to_owned(),
        }
    }
}

/// Compute the bounding box over all entities of `drawing`.
///
/// Lines contribute their endpoints, arcs their endpoints plus every
/// axis extreme inside their sweep, circles their full box, points their
/// location, and polylines their exploded segments. Entities of other
/// kinds contribute their reference points, which may be none.
///
/// # Errors
///
/// Returns [`ExtentsError::NonFinite`] if any contributing coordinate
/// is NaN or infinite, and [`ExtentsError::Empty`] if nothing
/// contributed at all.
pub fn compute(drawing: &DxfDrawing) -> Result<Bounds, ExtentsError> {
    let mut coords: Vec<Coord<f64>> = Vec::new();
    for entity in &drawing.entities {
        let points = entity_points(entity);
        if points.iter().any(|p| !p.is_finite()) {
            return Err(ExtentsError::NonFinite(entity.kind().to_owned()));
        }
        coords.extend(points.into_iter().map(|p| Coord { x: p.x, y: p.y }));
    }

    let rect = MultiPoint::from(coords)
        .bounding_rect()
        .ok_or(ExtentsError::Empty)?;
    Ok(Bounds {
        min_x: rect.min().x,
        min_y: rect.min().y,
        max_x: rect.max().x,
        max_y: rect.max().y,
    })
}

/// Resolve the viewBox for a drawing, or `None` when extents are unavailable.
#[must_use]
pub fn viewbox(drawing: &DxfDrawing) -> Option<ViewBox> {
    match compute(drawing) {
        Ok(bounds) => Some(ViewBox::new(bounds, unit_suffix(drawing.unit_code))),
        Err(err) => {
            tracing::debug!(reason = %err, "extents unavailable, omitting viewBox");
            None
        }
    }
}

/// Map a DXF `$INSUNITS` code to an SVG length suffix.
///
/// Only units SVG can express are mapped; every other code, and a
/// missing one, yields an empty suffix (unitless user space).
#[must_use]
pub const fn unit_suffix(code: Option<i16>) -> &'static str {
    match code {
        Some(1) => "in",
        Some(4) => "mm",
        Some(5) => "cm",
        _ => "",
    }
}

fn entity_points(entity: &DxfEntity) -> Vec<Point> {
    match entity {
        DxfEntity::Line { start, end } => vec![start.planar(), end.planar()],
        DxfEntity::Arc {
            center,
            radius,
            start_angle,
            end_angle,
        } => arc_points(center.planar(), *radius, *start_angle, *end_angle),
        DxfEntity::Circle { center, radius } => {
            let c = center.planar();
            vec![
                Point::new(c.x - radius, c.y - radius),
                Point::new(c.x + radius, c.y + radius),
            ]
        }
        DxfEntity::Point { location } => vec![location.planar()],
        DxfEntity::LwPolyline { vertices, closed } => {
            let mut points: Vec<Point> = vertices.iter().map(|v| v.point()).collect();
            for part in explode_polyline(vertices, *closed) {
                if let DxfEntity::Arc { .. } = part {
                    points.extend(entity_points(&part));
                }
            }
            points
        }
        DxfEntity::Other {
            reference_points, ..
        } => reference_points.iter().map(|p| p.planar()).collect(),
    }
}

/// Endpoints of a counterclockwise arc plus its axis extremes.
fn arc_points(center: Point, radius: f64, start_deg: f64, end_deg: f64) -> Vec<Point> {
    let sweep = arc::ccw_sweep(start_deg, end_deg);
    let mut points = vec![
        arc::point_at(center, radius, start_deg),
        arc::point_at(center, radius, end_deg),
    ];
    for quadrant in [0.0, 90.0, 180.0, 270.0] {
        if arc::ccw_sweep(start_deg, quadrant) <= sweep {
            points.push(arc::point_at(center, radius, quadrant));
        }
    }
    points
}
