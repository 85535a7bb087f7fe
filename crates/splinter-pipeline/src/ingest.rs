//! Format ingestors: stream [`Segment`]s out of parsed source drawings.
//!
//! Both ingestors are single-pass iterators over a borrowed drawing and
//! yield segments in the drawing's native order. They differ in how they
//! number segments, and the difference is visible in element ids:
//!
//! - SVG: `position_index` restarts at 0 for every sub-path.
//! - DXF: one `position_index` counter runs across the whole drawing,
//!   including the parts of exploded polylines, and is never reset.

use std::iter::Enumerate;
use std::slice;
use std::vec;

use crate::arc;
use crate::explode::explode_polyline;
use crate::source::{DxfDrawing, DxfEntity, SvgDrawing};
use crate::types::{Geometry, Segment};

/// Stream the segments of an SVG drawing.
///
/// `source_index` is the sub-path index and `position_index` the
/// primitive's index within that sub-path. Primitives pass through
/// unchanged.
pub fn svg_segments(drawing: &SvgDrawing) -> impl Iterator<Item = Segment> + '_ {
    drawing
        .paths
        .iter()
        .enumerate()
        .flat_map(|(source_index, path)| {
            path.segments
                .iter()
                .enumerate()
                .map(move |(position_index, geometry)| {
                    Segment::new(*geometry, source_index, position_index)
                })
        })
}

/// Streaming ingestor for DXF drawings.
///
/// `LINE` entities become lines with their elevation dropped, `ARC`
/// entities go through [`arc::normalize`], and `LWPOLYLINE` entities are
/// exploded and each part ingested as if it were a native `LINE` or
/// `ARC`. Every other entity kind is skipped; the kinds skipped are kept
/// for [`Self::skipped`].
#[derive(Debug)]
pub struct DxfIngestor<'a> {
    entities: Enumerate<slice::Iter<'a, DxfEntity>>,
    exploded: vec::IntoIter<DxfEntity>,
    exploded_source: usize,
    next_position: usize,
    skipped: Vec<String>,
}

impl<'a> DxfIngestor<'a> {
    /// Start ingesting `drawing` from its first entity.
    #[must_use]
    pub fn new(drawing: &'a DxfDrawing) -> Self {
        Self {
            entities: drawing.entities.iter().enumerate(),
            exploded: Vec::new().into_iter(),
            exploded_source: 0,
            next_position: 0,
            skipped: Vec::new(),
        }
    }

    /// Entity kinds skipped so far, one entry per skipped entity.
    #[must_use]
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    /// Consume the ingestor, returning the skipped entity kinds.
    #[must_use]
    pub fn into_skipped(self) -> Vec<String> {
        self.skipped
    }

    fn emit(&mut self, geometry: Geometry, source_index: usize) -> Segment {
        let segment = Segment::new(geometry, source_index, self.next_position);
        self.next_position += 1;
        segment
    }
}

impl Iterator for DxfIngestor<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        loop {
            if let Some(part) = self.exploded.next() {
                if let Some(geometry) = native_geometry(&part) {
                    return Some(self.emit(geometry, self.exploded_source));
                }
                continue;
            }

            let (index, entity) = self.entities.next()?;
            match entity {
                DxfEntity::Line { .. } | DxfEntity::Arc { .. } => {
                    if let Some(geometry) = native_geometry(entity) {
                        return Some(self.emit(geometry, index));
                    }
                }
                DxfEntity::LwPolyline { vertices, closed } => {
                    self.exploded = explode_polyline(vertices, *closed).into_iter();
                    self.exploded_source = index;
                }
                DxfEntity::Circle { .. } | DxfEntity::Point { .. } | DxfEntity::Other { .. } => {
                    tracing::debug!(entity = index, kind = entity.kind(), "skipping unsupported entity");
                    self.skipped.push(entity.kind().to_owned());
                }
            }
        }
    }
}

/// Geometry of a native `LINE` or `ARC`; `None` for anything else.
fn native_geometry(entity: &DxfEntity) -> Option<Geometry> {
    match entity {
        DxfEntity::Line { start, end } => Some(Geometry::Line {
            start: start.planar(),
            end: end.planar(),
        }),
        DxfEntity::Arc {
            center,
            radius,
            start_angle,
            end_angle,
        } => Some(arc::normalize(
            center.planar(),
            *radius,
            *start_angle,
            *end_angle,
        )),
        DxfEntity::LwPolyline { .. }
        | DxfEntity::Circle { .. }
        | DxfEntity::Point { .. }
        | DxfEntity::Other { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Point3, PolylineVertex, SvgPath};
    use crate::types::Point;

    fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Geometry {
        Geometry::Line {
            start: Point::new(x1, y1),
            end: Point::new(x2, y2),
        }
    }

    fn dxf_line(x1: f64, y1: f64, x2: f64, y2: f64) -> DxfEntity {
        DxfEntity::Line {
            start: Point3::new(x1, y1, 0.0),
            end: Point3::new(x2, y2, 0.0),
        }
    }

    fn indices(segments: &[Segment]) -> Vec<(usize, usize)> {
        segments
            .iter()
            .map(|s| (s.source_index, s.position_index))
            .collect()
    }

    // --- SVG ---

    #[test]
    fn svg_position_restarts_per_sub_path() {
        let drawing = SvgDrawing::new(vec![
            SvgPath::new(vec![line(0.0, 0.0, 5.0, 0.0), line(5.0, 0.0, 5.0, 5.0)]),
            SvgPath::new(vec![line(0.0, 9.0, 9.0, 9.0)]),
            SvgPath::default(),
            SvgPath::new(vec![line(1.0, 1.0, 2.0, 2.0)]),
        ]);
        let segments: Vec<_> = svg_segments(&drawing).collect();
        assert_eq!(indices(&segments), vec![(0, 0), (0, 1), (1, 0), (3, 0)]);
    }

    #[test]
    fn svg_geometry_passes_through() {
        let quad = Geometry::QuadraticBezier {
            start: Point::new(30.0, 30.0),
            control: Point::new(50.0, 10.0),
            end: Point::new(70.0, 30.0),
        };
        let drawing = SvgDrawing::new(vec![SvgPath::new(vec![quad])]);
        let segments: Vec<_> = svg_segments(&drawing).collect();
        assert_eq!(segments, vec![Segment::new(quad, 0, 0)]);
    }

    #[test]
    fn svg_empty_drawing_yields_nothing() {
        assert_eq!(svg_segments(&SvgDrawing::default()).count(), 0);
    }

    // --- DXF ---

    #[test]
    fn dxf_line_drops_elevation() {
        let drawing = DxfDrawing::new(
            vec![DxfEntity::Line {
                start: Point3::new(1.0, 2.0, 3.0),
                end: Point3::new(4.0, 5.0, 6.0),
            }],
            None,
        );
        let segments: Vec<_> = DxfIngestor::new(&drawing).collect();
        assert_eq!(segments, vec![Segment::new(line(1.0, 2.0, 4.0, 5.0), 0, 0)]);
    }

    #[test]
    fn dxf_arc_is_normalized() {
        let drawing = DxfDrawing::new(
            vec![DxfEntity::Arc {
                center: Point3::new(50.0, 50.0, 0.0),
                radius: 25.0,
                start_angle: 0.0,
                end_angle: 180.0,
            }],
            None,
        );
        let segments: Vec<_> = DxfIngestor::new(&drawing).collect();
        assert_eq!(segments.len(), 1);
        assert_eq!(
            segments[0].geometry,
            arc::normalize(Point::new(50.0, 50.0), 25.0, 0.0, 180.0)
        );
    }

    #[test]
    fn dxf_counter_runs_across_entities_and_exploded_parts() {
        let drawing = DxfDrawing::new(
            vec![
                dxf_line(0.0, 0.0, 10.0, 0.0),
                DxfEntity::LwPolyline {
                    vertices: vec![
                        PolylineVertex::new(20.0, 0.0, 0.0),
                        PolylineVertex::new(30.0, 0.0, 0.0),
                        PolylineVertex::new(30.0, 10.0, 0.0),
                    ],
                    closed: true,
                },
                dxf_line(0.0, 5.0, 10.0, 5.0),
            ],
            None,
        );
        let segments: Vec<_> = DxfIngestor::new(&drawing).collect();
        assert_eq!(
            indices(&segments),
            vec![(0, 0), (1, 1), (1, 2), (1, 3), (2, 4)]
        );
    }

    #[test]
    fn dxf_bulged_polyline_yields_arc() {
        let drawing = DxfDrawing::new(
            vec![DxfEntity::LwPolyline {
                vertices: vec![
                    PolylineVertex::new(0.0, 0.0, 1.0),
                    PolylineVertex::new(10.0, 0.0, 0.0),
                ],
                closed: false,
            }],
            None,
        );
        let segments: Vec<_> = DxfIngestor::new(&drawing).collect();
        assert_eq!(segments.len(), 1);
        assert!(matches!(
            segments[0].geometry,
            Geometry::Arc { sweep: true, .. }
        ));
    }

    #[test]
    fn dxf_unsupported_entities_are_skipped() {
        let drawing = DxfDrawing::new(
            vec![
                DxfEntity::Circle {
                    center: Point3::new(0.0, 0.0, 0.0),
                    radius: 5.0,
                },
                dxf_line(0.0, 0.0, 10.0, 0.0),
                DxfEntity::other("SPLINE"),
            ],
            None,
        );
        let mut ingestor = DxfIngestor::new(&drawing);
        let segments: Vec<_> = ingestor.by_ref().collect();
        assert_eq!(indices(&segments), vec![(1, 0)]);
        assert_eq!(ingestor.skipped(), ["CIRCLE", "SPLINE"]);
        assert_eq!(ingestor.into_skipped().len(), 2);
    }

    #[test]
    fn dxf_empty_drawing_yields_nothing() {
        assert_eq!(DxfIngestor::new(&DxfDrawing::default()).count(), 0);
    }
}
