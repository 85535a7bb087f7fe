//! SVG export serializer.
//!
//! Converts a decomposed [`Document`] into an SVG string using the
//! [`svg`] crate for document construction and XML escaping. Each
//! element becomes one top-level `<line>` or `<path>` child of the
//! root, in document order, with no grouping.
//!
//! Numbers are written with [`format::number`] rather than the `svg`
//! crate's own `f32` formatting, so coordinates keep full `f64`
//! precision and integral values keep their trailing `.0`.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use svg::Document as SvgDocument;
use svg::node::element::{Line, Path};

use splinter_pipeline::format;
use splinter_pipeline::{Document, LineElement, OutputElement, PathElement, ViewBox};

/// Serialize a document as an SVG string, XML declaration included.
///
/// The root carries `viewBox`, `width`, and `height` only when the
/// document has a [`ViewBox`]; otherwise the canvas is left to the
/// consumer.
///
/// # Examples
///
/// ```
/// use splinter_pipeline::Document;
/// use splinter_export::to_svg;
///
/// let svg = to_svg(&Document::default());
/// assert!(svg.starts_with("<?xml"));
/// assert!(svg.contains(r#"xmlns="http://www.w3.org/2000/svg""#));
/// ```
#[must_use]
pub fn to_svg(document: &Document) -> String {
    let mut doc = document
        .viewbox
        .as_ref()
        .map_or_else(SvgDocument::new, canvas);

    for element in &document.elements {
        doc = match element {
            OutputElement::Line(line) => doc.add(line_node(line)),
            OutputElement::Path(path) => doc.add(path_node(path)),
        };
    }

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}

/// Root element sized from the source extents.
fn canvas(viewbox: &ViewBox) -> SvgDocument {
    SvgDocument::new()
        .set(
            "viewBox",
            format!(
                "{} {} {} {}",
                format::number(viewbox.min_x),
                format::number(viewbox.min_y),
                format::number(viewbox.width),
                format::number(viewbox.height),
            ),
        )
        .set(
            "width",
            format!("{}{}", format::number(viewbox.width), viewbox.unit),
        )
        .set(
            "height",
            format!("{}{}", format::number(viewbox.height), viewbox.unit),
        )
}

fn line_node(line: &LineElement) -> Line {
    Line::new()
        .set("x1", format::number(line.x1))
        .set("y1", format::number(line.y1))
        .set("x2", format::number(line.x2))
        .set("y2", format::number(line.y2))
        .set("stroke", line.stroke.as_str())
        .set("fill", line.fill.as_str())
        .set("id", line.id.as_str())
}

fn path_node(path: &PathElement) -> Path {
    Path::new()
        .set("d", path.d.as_str())
        .set("stroke", path.stroke.as_str())
        .set("fill", path.fill.as_str())
        .set("id", path.id.as_str())
}
