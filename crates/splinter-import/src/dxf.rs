//! DXF reader: entities section to the pipeline's entity model.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use ::dxf::Drawing;
use ::dxf::entities::EntityType;
use ::dxf::enums::Units;
use splinter_pipeline::{DxfDrawing, DxfEntity, Point3, PolylineVertex};

use crate::ImportError;

/// `LWPOLYLINE` flag bit marking a closed polyline.
const CLOSED_FLAG: i32 = 1;

/// Read a DXF file from disk.
///
/// # Errors
///
/// Returns [`ImportError::Read`] if the file cannot be opened, or
/// [`ImportError::Dxf`] if it cannot be parsed.
pub fn load_dxf(path: &Path) -> Result<DxfDrawing, ImportError> {
    let file = File::open(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    read_dxf(&mut BufReader::new(file))
}

/// Parse a DXF stream into a drawing.
///
/// Only modelspace entities are read; paper-space layout geometry is
/// left out. Entities keep their document order. Kinds the pipeline
/// has no model for are kept as [`DxfEntity::Other`] so they can be
/// reported and still count toward the drawing's extents.
///
/// # Errors
///
/// Returns [`ImportError::Dxf`] if the stream is not a valid DXF file.
pub fn read_dxf<R: Read>(reader: &mut R) -> Result<DxfDrawing, ImportError> {
    let drawing = Drawing::load(reader).map_err(ImportError::Dxf)?;
    let entities: Vec<DxfEntity> = drawing
        .entities()
        .filter(|entity| !entity.common.is_in_paper_space)
        .map(|entity| convert(&entity.specific))
        .collect();
    let unit_code = unit_code(drawing.header.default_drawing_units);
    tracing::debug!(entities = entities.len(), ?unit_code, "parsed DXF");
    Ok(DxfDrawing::new(entities, unit_code))
}

/// `$INSUNITS` as a code, or `None` when the drawing is unitless.
fn unit_code(units: Units) -> Option<i16> {
    if matches!(units, Units::Unitless) {
        None
    } else {
        Some(units as i16)
    }
}

fn point(p: &::dxf::Point) -> Point3 {
    Point3::new(p.x, p.y, p.z)
}

fn convert(specific: &EntityType) -> DxfEntity {
    match specific {
        EntityType::Line(line) => DxfEntity::Line {
            start: point(&line.p1),
            end: point(&line.p2),
        },
        EntityType::Arc(arc) => DxfEntity::Arc {
            center: point(&arc.center),
            radius: arc.radius,
            start_angle: arc.start_angle,
            end_angle: arc.end_angle,
        },
        EntityType::LwPolyline(polyline) => DxfEntity::LwPolyline {
            vertices: polyline
                .vertices
                .iter()
                .map(|v| PolylineVertex::new(v.x, v.y, v.bulge))
                .collect(),
            closed: polyline.flags & CLOSED_FLAG != 0,
        },
        EntityType::Circle(circle) => DxfEntity::Circle {
            center: point(&circle.center),
            radius: circle.radius,
        },
        EntityType::ModelPoint(model_point) => DxfEntity::Point {
            location: point(&model_point.location),
        },
        other => DxfEntity::Other {
            kind: other_kind(other).to_owned(),
            reference_points: reference_points(other),
        },
    }
}

/// DXF type name for entity kinds without a dedicated model.
const fn other_kind(specific: &EntityType) -> &'static str {
    match specific {
        EntityType::Ellipse(_) => "ELLIPSE",
        EntityType::Insert(_) => "INSERT",
        EntityType::MText(_) => "MTEXT",
        EntityType::Polyline(_) => "POLYLINE",
        EntityType::Solid(_) => "SOLID",
        EntityType::Spline(_) => "SPLINE",
        EntityType::Text(_) => "TEXT",
        _ => "OTHER",
    }
}

/// Points bounding an unmodelled entity, for extents.
///
/// Ellipses contribute the box of their major-axis circle, splines their
/// control and fit points, and the rest their vertices, corners, or
/// insertion point.
fn reference_points(specific: &EntityType) -> Vec<Point3> {
    match specific {
        EntityType::Ellipse(ellipse) => {
            let c = point(&ellipse.center);
            let axis = &ellipse.major_axis;
            let r = axis.x.hypot(axis.y);
            vec![
                Point3::new(c.x - r, c.y - r, c.z),
                Point3::new(c.x + r, c.y + r, c.z),
            ]
        }
        EntityType::Spline(spline) => spline
            .control_points
            .iter()
            .chain(&spline.fit_points)
            .map(point)
            .collect(),
        EntityType::Polyline(polyline) => polyline.vertices().map(|v| point(&v.location)).collect(),
        EntityType::Solid(solid) => [
            &solid.first_corner,
            &solid.second_corner,
            &solid.third_corner,
            &solid.fourth_corner,
        ]
        .into_iter()
        .map(point)
        .collect(),
        EntityType::Insert(insert) => vec![point(&insert.location)],
        EntityType::Text(text) => vec![point(&text.location)],
        EntityType::MText(mtext) => vec![point(&mtext.insertion_point)],
        _ => Vec::new(),
    }
}
