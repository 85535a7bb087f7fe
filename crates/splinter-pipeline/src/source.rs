//! Already-parsed source models handed to the pipeline.
//!
//! The import layer (`splinter-import`) owns reading bytes; these types
//! are the boundary it produces. Keeping them here lets the pipeline
//! stay free of parser dependencies and lets tests build drawings by
//! hand.

use serde::{Deserialize, Serialize};

use crate::types::{Geometry, Point};

/// One drawable SVG element, already split into primitives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SvgPath {
    /// Primitives in drawing order.
    pub segments: Vec<Geometry>,
}

impl SvgPath {
    /// Create a sub-path from its primitives.
    #[must_use]
    pub const fn new(segments: Vec<Geometry>) -> Self {
        Self { segments }
    }
}

/// A parsed SVG drawing: its drawable elements in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SvgDrawing {
    /// Sub-paths in document order.
    pub paths: Vec<SvgPath>,
}

impl SvgDrawing {
    /// Create a drawing from its sub-paths.
    #[must_use]
    pub const fn new(paths: Vec<SvgPath>) -> Self {
        Self { paths }
    }
}

/// A 3D point as stored in DXF entities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate (elevation).
    pub z: f64,
}

impl Point3 {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Project onto the XY plane.
    #[must_use]
    pub const fn planar(self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// One vertex of a lightweight polyline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolylineVertex {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Bulge of the segment leaving this vertex: `tan(angle / 4)`,
    /// positive for counterclockwise. Zero means a straight segment.
    pub bulge: f64,
}

impl PolylineVertex {
    /// Create a new vertex.
    #[must_use]
    pub const fn new(x: f64, y: f64, bulge: f64) -> Self {
        Self { x, y, bulge }
    }

    /// The vertex location.
    #[must_use]
    pub const fn point(self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A DXF modelspace entity, reduced to what the pipeline needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DxfEntity {
    /// `LINE`.
    Line {
        /// Start point.
        start: Point3,
        /// End point.
        end: Point3,
    },
    /// `ARC`, always counterclockwise from `start_angle` to `end_angle`.
    Arc {
        /// Center point.
        center: Point3,
        /// Radius.
        radius: f64,
        /// Start angle in degrees.
        start_angle: f64,
        /// End angle in degrees.
        end_angle: f64,
    },
    /// `LWPOLYLINE`.
    LwPolyline {
        /// Vertices in order.
        vertices: Vec<PolylineVertex>,
        /// Whether the last vertex connects back to the first.
        closed: bool,
    },
    /// `CIRCLE`. Contributes to extents but is not decomposed.
    Circle {
        /// Center point.
        center: Point3,
        /// Radius.
        radius: f64,
    },
    /// `POINT`. Contributes to extents but is not decomposed.
    Point {
        /// Location.
        location: Point3,
    },
    /// Any other entity type. Not decomposed; reported as skipped.
    Other {
        /// DXF entity type name, e.g. `SPLINE`.
        kind: String,
        /// Points whose box encloses the entity (control points,
        /// insertion points, corners). Used for extents only; may be
        /// empty when the kind has no usable geometry.
        #[serde(default)]
        reference_points: Vec<Point3>,
    },
}

impl DxfEntity {
    /// An unsupported entity with no geometry worth measuring.
    #[must_use]
    pub fn other(kind: &str) -> Self {
        Self::Other {
            kind: kind.to_owned(),
            reference_points: Vec::new(),
        }
    }

    /// DXF type name of the entity.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Line { .. } => "LINE",
            Self::Arc { .. } => "ARC",
            Self::LwPolyline { .. } => "LWPOLYLINE",
            Self::Circle { .. } => "CIRCLE",
            Self::Point { .. } => "POINT",
            Self::Other { kind, .. } => kind,
        }
    }
}

/// A parsed DXF drawing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DxfDrawing {
    /// Modelspace entities in document order.
    pub entities: Vec<DxfEntity>,
    /// `$INSUNITS` header value, if the drawing declares one.
    pub unit_code: Option<i16>,
}

impl DxfDrawing {
    /// Create a drawing from its entities and declared unit code.
    #[must_use]
    pub const fn new(entities: Vec<DxfEntity>, unit_code: Option<i16>) -> Self {
        Self {
            entities,
            unit_code,
        }
    }
}
