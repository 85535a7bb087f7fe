//! SVG reader: drawable elements to primitive sub-paths.
//!
//! Every drawable element (`path`, `line`, `polyline`, `polygon`,
//! `rect`, `circle`, `ellipse`) becomes one [`SvgPath`], in document
//! order. Path data is resolved to absolute coordinates with smooth
//! curves reflected, so each primitive stands on its own. Transforms
//! and presentation attributes are not applied.

use std::path::Path;

use ::svg::node::Attributes;
use ::svg::node::element::tag::Type;
use ::svg::parser::Event;
use splinter_pipeline::{Geometry, Point, SvgDrawing, SvgPath, Vector};
use svgtypes::{PathParser, PathSegment};

use crate::ImportError;

/// Read an SVG file from disk.
///
/// # Errors
///
/// Returns [`ImportError::Read`] if the file cannot be read, or
/// [`ImportError::Svg`] if its contents are malformed.
pub fn load_svg(path: &Path) -> Result<SvgDrawing, ImportError> {
    let content = std::fs::read_to_string(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    read_svg(&content)
}

/// Parse SVG markup into a drawing.
///
/// # Errors
///
/// Returns [`ImportError::Svg`] if the markup, path data, or a geometry
/// attribute cannot be parsed.
pub fn read_svg(content: &str) -> Result<SvgDrawing, ImportError> {
    let parser = ::svg::read(content).map_err(|e| ImportError::Svg(e.to_string()))?;
    let mut paths = Vec::new();
    for event in parser {
        match event {
            Event::Tag(name, Type::Start | Type::Empty, attributes) => {
                if let Some(path) = element(name, &attributes)? {
                    paths.push(path);
                }
            }
            Event::Error(err) => return Err(ImportError::Svg(err.to_string())),
            _ => {}
        }
    }
    tracing::debug!(elements = paths.len(), "parsed SVG");
    Ok(SvgDrawing::new(paths))
}

/// Decompose one element, or `None` if it is not drawable.
fn element(name: &str, attributes: &Attributes) -> Result<Option<SvgPath>, ImportError> {
    let segments = match name {
        "path" => match attributes.get("d") {
            Some(d) => path_data(d)?,
            None => Vec::new(),
        },
        "line" => {
            let [x1, y1, x2, y2] = numbers(name, attributes, ["x1", "y1", "x2", "y2"])?;
            vec![line(Point::new(x1, y1), Point::new(x2, y2))]
        }
        "polyline" | "polygon" => {
            let points = points(attributes.get("points").map_or("", |v| &**v))?;
            polyline(&points, name == "polygon")
        }
        "rect" => {
            let [x, y, w, h] = numbers(name, attributes, ["x", "y", "width", "height"])?;
            rect(x, y, w, h)
        }
        "circle" => {
            let [cx, cy, r] = numbers(name, attributes, ["cx", "cy", "r"])?;
            ellipse(Point::new(cx, cy), r, r)
        }
        "ellipse" => {
            let [cx, cy, rx, ry] = numbers(name, attributes, ["cx", "cy", "rx", "ry"])?;
            ellipse(Point::new(cx, cy), rx, ry)
        }
        _ => return Ok(None),
    };
    Ok(Some(SvgPath::new(segments)))
}

/// Read numeric geometry attributes; missing ones default to zero.
fn numbers<const N: usize>(
    tag: &str,
    attributes: &Attributes,
    names: [&str; N],
) -> Result<[f64; N], ImportError> {
    let mut values = [0.0; N];
    for (value, name) in values.iter_mut().zip(names) {
        if let Some(raw) = attributes.get(name) {
            *value = length(raw).ok_or_else(|| {
                ImportError::Svg(format!("invalid {name} attribute on <{tag}>: {:?}", &**raw))
            })?;
        }
    }
    Ok(values)
}

/// Parse a length, accepting an optional `px` suffix.
fn length(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    trimmed
        .strip_suffix("px")
        .unwrap_or(trimmed)
        .trim_end()
        .parse()
        .ok()
}

/// Parse a `points` list; a trailing unpaired number is ignored.
fn points(raw: &str) -> Result<Vec<Point>, ImportError> {
    let numbers = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|_| ImportError::Svg(format!("invalid number in points: {token:?}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(numbers
        .chunks_exact(2)
        .map(|pair| Point::new(pair[0], pair[1]))
        .collect())
}

const fn line(start: Point, end: Point) -> Geometry {
    Geometry::Line { start, end }
}

fn polyline(points: &[Point], closed: bool) -> Vec<Geometry> {
    let mut segments: Vec<Geometry> = points.windows(2).map(|w| line(w[0], w[1])).collect();
    if let [first, .., last] = points
        && closed
        && first != last
    {
        segments.push(line(*last, *first));
    }
    segments
}

fn rect(x: f64, y: f64, width: f64, height: f64) -> Vec<Geometry> {
    if width <= 0.0 || height <= 0.0 {
        return Vec::new();
    }
    let corners = [
        Point::new(x, y),
        Point::new(x + width, y),
        Point::new(x + width, y + height),
        Point::new(x, y + height),
    ];
    polyline(&corners, true)
}

/// An ellipse as two half arcs, right extreme to left and back.
fn ellipse(center: Point, rx: f64, ry: f64) -> Vec<Geometry> {
    if rx <= 0.0 || ry <= 0.0 {
        return Vec::new();
    }
    let right = Point::new(center.x + rx, center.y);
    let left = Point::new(center.x - rx, center.y);
    let half = |start, end| Geometry::Arc {
        start,
        end,
        radius: Vector::new(rx, ry),
        rotation: 0.0,
        large_arc: false,
        sweep: true,
    };
    vec![half(right, left), half(left, right)]
}

/// Parse path data into primitives.
///
/// # Errors
///
/// Returns [`ImportError::Svg`] if the data cannot be parsed or a
/// command carries an incomplete parameter group.
pub fn path_data(d: &str) -> Result<Vec<Geometry>, ImportError> {
    let mut pen = Pen::default();
    for segment in PathParser::from(d) {
        let segment = segment.map_err(|e| ImportError::Svg(format!("path data: {e}")))?;
        pen.apply(segment);
    }
    Ok(pen.segments)
}

/// What the previous command left behind for smooth-curve reflection.
#[derive(Debug, Clone, Copy)]
enum LastControl {
    None,
    Cubic(Point),
    Quadratic(Point),
}

/// Path-data interpreter state.
#[derive(Debug)]
struct Pen {
    segments: Vec<Geometry>,
    current: Point,
    subpath_start: Point,
    last_control: LastControl,
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            segments: Vec::new(),
            current: Point::new(0.0, 0.0),
            subpath_start: Point::new(0.0, 0.0),
            last_control: LastControl::None,
        }
    }
}

impl Pen {
    fn apply(&mut self, segment: PathSegment) {
        match segment {
            PathSegment::MoveTo { abs, x, y } => {
                let to = self.resolve(abs, x, y);
                self.subpath_start = to;
                self.current = to;
                self.last_control = LastControl::None;
            }
            PathSegment::LineTo { abs, x, y } => {
                let to = self.resolve(abs, x, y);
                self.line_to(to);
            }
            PathSegment::HorizontalLineTo { abs, x } => {
                let x = if abs { x } else { self.current.x + x };
                self.line_to(Point::new(x, self.current.y));
            }
            PathSegment::VerticalLineTo { abs, y } => {
                let y = if abs { y } else { self.current.y + y };
                self.line_to(Point::new(self.current.x, y));
            }
            PathSegment::CurveTo {
                abs,
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                let control1 = self.resolve(abs, x1, y1);
                let control2 = self.resolve(abs, x2, y2);
                let end = self.resolve(abs, x, y);
                self.cubic_to(control1, control2, end);
            }
            PathSegment::SmoothCurveTo { abs, x2, y2, x, y } => {
                let control1 = match self.last_control {
                    LastControl::Cubic(previous) => self.reflect(previous),
                    LastControl::None | LastControl::Quadratic(_) => self.current,
                };
                let control2 = self.resolve(abs, x2, y2);
                let end = self.resolve(abs, x, y);
                self.cubic_to(control1, control2, end);
            }
            PathSegment::Quadratic { abs, x1, y1, x, y } => {
                let control = self.resolve(abs, x1, y1);
                let end = self.resolve(abs, x, y);
                self.quadratic_to(control, end);
            }
            PathSegment::SmoothQuadratic { abs, x, y } => {
                let control = match self.last_control {
                    LastControl::Quadratic(previous) => self.reflect(previous),
                    LastControl::None | LastControl::Cubic(_) => self.current,
                };
                let end = self.resolve(abs, x, y);
                self.quadratic_to(control, end);
            }
            PathSegment::EllipticalArc {
                abs,
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                x,
                y,
            } => {
                let end = self.resolve(abs, x, y);
                self.arc_to(
                    Vector::new(rx.abs(), ry.abs()),
                    x_axis_rotation,
                    large_arc,
                    sweep,
                    end,
                );
            }
            PathSegment::ClosePath { .. } => {
                if self.current != self.subpath_start {
                    self.segments.push(line(self.current, self.subpath_start));
                }
                self.current = self.subpath_start;
                self.last_control = LastControl::None;
            }
        }
    }

    fn resolve(&self, abs: bool, x: f64, y: f64) -> Point {
        if abs {
            Point::new(x, y)
        } else {
            Point::new(self.current.x + x, self.current.y + y)
        }
    }

    fn reflect(&self, control: Point) -> Point {
        Point::new(
            2.0f64.mul_add(self.current.x, -control.x),
            2.0f64.mul_add(self.current.y, -control.y),
        )
    }

    fn line_to(&mut self, end: Point) {
        self.segments.push(line(self.current, end));
        self.current = end;
        self.last_control = LastControl::None;
    }

    fn cubic_to(&mut self, control1: Point, control2: Point, end: Point) {
        self.segments.push(Geometry::CubicBezier {
            start: self.current,
            control1,
            control2,
            end,
        });
        self.current = end;
        self.last_control = LastControl::Cubic(control2);
    }

    fn quadratic_to(&mut self, control: Point, end: Point) {
        self.segments.push(Geometry::QuadraticBezier {
            start: self.current,
            control,
            end,
        });
        self.current = end;
        self.last_control = LastControl::Quadratic(control);
    }

    fn arc_to(&mut self, radius: Vector, rotation: f64, large_arc: bool, sweep: bool, end: Point) {
        if end == self.current {
            // An arc onto its own start point draws nothing.
            self.last_control = LastControl::None;
            return;
        }
        if radius.x == 0.0 || radius.y == 0.0 {
            self.line_to(end);
            return;
        }
        self.segments.push(Geometry::Arc {
            start: self.current,
            end,
            radius,
            rotation,
            large_arc,
            sweep,
        });
        self.current = end;
        self.last_control = LastControl::None;
    }
}
