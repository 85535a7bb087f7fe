//! Output document assembly and identifier assignment.
//!
//! The [`Assembler`] receives segments in ingestion order, runs each
//! through the degenerate filter and the deduplication index, and turns
//! survivors into [`OutputElement`]s. Every element gets the same fixed
//! presentation (black stroke, no fill) and exactly one primitive.

use serde::{Deserialize, Serialize};

use crate::dedup::{Admission, DedupIndex};
use crate::diagnostics::{DecomposeDiagnostics, DuplicateNotice, ExtentsStatus};
use crate::extents::ViewBox;
use crate::filter;
use crate::format;
use crate::types::{DecomposeConfig, Geometry, Point, Segment, SourceFormat, Vector};

/// Stroke colour applied to every element.
pub const STROKE: &str = "black";

/// Fill applied to every element.
pub const FILL: &str = "none";

/// A straight line element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineElement {
    /// Start x.
    pub x1: f64,
    /// Start y.
    pub y1: f64,
    /// End x.
    pub x2: f64,
    /// End y.
    pub y2: f64,
    /// Stroke colour.
    pub stroke: String,
    /// Fill.
    pub fill: String,
    /// Unique element identifier.
    pub id: String,
}

/// A single-primitive path element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathElement {
    /// Path data holding one move-to and one drawing command.
    pub d: String,
    /// Stroke colour.
    pub stroke: String,
    /// Fill.
    pub fill: String,
    /// Unique element identifier.
    pub id: String,
}

/// One top-level element of the output document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OutputElement {
    /// `<line>`.
    Line(LineElement),
    /// `<path>`.
    Path(PathElement),
}

impl OutputElement {
    /// The element identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Line(line) => &line.id,
            Self::Path(path) => &path.id,
        }
    }
}

/// The decomposed drawing: elements in ingestion order plus optional canvas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Elements in the order their segments were ingested.
    pub elements: Vec<OutputElement>,
    /// Canvas metadata, present only for DXF input with computable extents.
    pub viewbox: Option<ViewBox>,
}

impl Document {
    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the document has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate over the line elements.
    pub fn lines(&self) -> impl Iterator<Item = &LineElement> {
        self.elements.iter().filter_map(|e| match e {
            OutputElement::Line(line) => Some(line),
            OutputElement::Path(_) => None,
        })
    }

    /// Iterate over the path elements.
    pub fn paths(&self) -> impl Iterator<Item = &PathElement> {
        self.elements.iter().filter_map(|e| match e {
            OutputElement::Path(path) => Some(path),
            OutputElement::Line(_) => None,
        })
    }
}

/// Result of one decomposition run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decomposition {
    /// The output document.
    pub document: Document,
    /// What happened along the way.
    pub diagnostics: DecomposeDiagnostics,
}

/// Identifier for a segment under a format's numbering scheme.
///
/// SVG ids name the sub-path and the position within it
/// (`path3_seg0`); DXF ids use the drawing-wide counter only
/// (`dxf_seg12`).
#[must_use]
pub fn element_id(format: SourceFormat, segment: &Segment) -> String {
    match format {
        SourceFormat::Svg => format!(
            "path{}_seg{}",
            segment.source_index, segment.position_index
        ),
        SourceFormat::Dxf => format!("dxf_seg{}", segment.position_index),
    }
}

/// Path data for a curve or arc; `None` for straight lines.
///
/// # Examples
///
/// ```
/// use splinter_pipeline::assemble::path_data;
/// use splinter_pipeline::{Geometry, Point};
///
/// let quad = Geometry::QuadraticBezier {
///     start: Point::new(30.0, 30.0),
///     control: Point::new(50.0, 10.0),
///     end: Point::new(70.0, 30.0),
/// };
/// assert_eq!(path_data(&quad).as_deref(), Some("M 30.0,30.0 Q 50.0,10.0 70.0,30.0"));
/// ```
#[must_use]
pub fn path_data(geometry: &Geometry) -> Option<String> {
    match *geometry {
        Geometry::Line { .. } => None,
        Geometry::Arc {
            start,
            end,
            radius,
            rotation,
            large_arc,
            sweep,
        } => Some(arc_data(start, end, radius, rotation, large_arc, sweep)),
        Geometry::CubicBezier {
            start,
            control1,
            control2,
            end,
        } => Some(cubic_data(start, control1, control2, end)),
        Geometry::QuadraticBezier {
            start,
            control,
            end,
        } => Some(quadratic_data(start, control, end)),
    }
}

fn arc_data(
    start: Point,
    end: Point,
    radius: Vector,
    rotation: f64,
    large_arc: bool,
    sweep: bool,
) -> String {
    format!(
        "M {} A {} {} {},{} {}",
        format::pair(start.x, start.y),
        format::pair(radius.x, radius.y),
        format::number(rotation),
        u8::from(large_arc),
        u8::from(sweep),
        format::pair(end.x, end.y),
    )
}

fn cubic_data(start: Point, control1: Point, control2: Point, end: Point) -> String {
    format!(
        "M {} C {} {} {}",
        format::pair(start.x, start.y),
        format::pair(control1.x, control1.y),
        format::pair(control2.x, control2.y),
        format::pair(end.x, end.y),
    )
}

fn quadratic_data(start: Point, control: Point, end: Point) -> String {
    format!(
        "M {} Q {} {}",
        format::pair(start.x, start.y),
        format::pair(control.x, control.y),
        format::pair(end.x, end.y),
    )
}

/// Build the output element for a segment that survived filtering.
#[must_use]
pub fn to_element(format: SourceFormat, segment: &Segment) -> OutputElement {
    let id = element_id(format, segment);
    let d = match segment.geometry {
        Geometry::Line { start, end } => {
            return OutputElement::Line(LineElement {
                x1: start.x,
                y1: start.y,
                x2: end.x,
                y2: end.y,
                stroke: STROKE.to_owned(),
                fill: FILL.to_owned(),
                id,
            });
        }
        Geometry::Arc {
            start,
            end,
            radius,
            rotation,
            large_arc,
            sweep,
        } => arc_data(start, end, radius, rotation, large_arc, sweep),
        Geometry::CubicBezier {
            start,
            control1,
            control2,
            end,
        } => cubic_data(start, control1, control2, end),
        Geometry::QuadraticBezier {
            start,
            control,
            end,
        } => quadratic_data(start, control, end),
    };
    OutputElement::Path(PathElement {
        d,
        stroke: STROKE.to_owned(),
        fill: FILL.to_owned(),
        id,
    })
}

/// Per-run builder: filter, deduplicate, and append segments in order.
///
/// Owns the run's [`DedupIndex`]; nothing outlives [`Self::finish`].
#[derive(Debug)]
pub struct Assembler {
    format: SourceFormat,
    min_line_length: f64,
    dedup: DedupIndex,
    elements: Vec<OutputElement>,
    diagnostics: DecomposeDiagnostics,
}

impl Assembler {
    /// Start an empty document for `format`.
    #[must_use]
    pub fn new(format: SourceFormat, config: &DecomposeConfig) -> Self {
        Self {
            format,
            min_line_length: config.min_line_length,
            dedup: DedupIndex::new(config.precision),
            elements: Vec::new(),
            diagnostics: DecomposeDiagnostics::new(format),
        }
    }

    /// Offer the next segment in ingestion order.
    ///
    /// Returns the appended element, or `None` if the segment was a
    /// degenerate or duplicate line.
    pub fn push(&mut self, segment: Segment) -> Option<&OutputElement> {
        self.diagnostics.segments_ingested += 1;

        if filter::is_degenerate(&segment.geometry, self.min_line_length) {
            self.diagnostics.degenerate_lines_dropped += 1;
            return None;
        }

        if let Admission::Duplicate(key) = self.dedup.admit(&segment.geometry) {
            let segment_id = element_id(self.format, &segment);
            tracing::info!(%key, id = %segment_id, "duplicate line skipped");
            self.diagnostics
                .duplicate_lines
                .push(DuplicateNotice { key, segment_id });
            return None;
        }

        self.elements.push(to_element(self.format, &segment));
        self.diagnostics.elements_emitted += 1;
        self.elements.last()
    }

    /// Push every segment of an iterator.
    pub fn extend(&mut self, segments: impl IntoIterator<Item = Segment>) {
        for segment in segments {
            self.push(segment);
        }
    }

    /// Finish the run, attaching the canvas and any skipped entity kinds.
    #[must_use]
    pub fn finish(mut self, viewbox: Option<ViewBox>, skipped: Vec<String>) -> Decomposition {
        self.diagnostics.skipped_entities = skipped;
        self.diagnostics.extents = match (self.format, &viewbox) {
            (SourceFormat::Svg, _) => ExtentsStatus::NotApplicable,
            (SourceFormat::Dxf, Some(_)) => ExtentsStatus::Available,
            (SourceFormat::Dxf, None) => ExtentsStatus::Unavailable,
        };
        Decomposition {
            document: Document {
                elements: self.elements,
                viewbox,
            },
            diagnostics: self.diagnostics,
        }
    }
}
