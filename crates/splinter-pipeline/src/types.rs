//! Shared types for the splinter decomposition pipeline.

use serde::{Deserialize, Serialize};

/// A 2D point in source drawing coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Returns `true` if both coordinates are finite.
    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A 2D vector, used for the per-axis radii of an elliptical arc.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl Vector {
    /// Create a new vector.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The geometry of one decomposed primitive.
///
/// This is a closed set: every consumer (filter, deduplication,
/// assembler) matches on it exhaustively, so adding a variant is a
/// compile error everywhere it needs handling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    /// Straight line.
    Line {
        /// Start point.
        start: Point,
        /// End point.
        end: Point,
    },
    /// Elliptical arc in SVG endpoint parameterization.
    Arc {
        /// Start point.
        start: Point,
        /// End point.
        end: Point,
        /// Per-axis radii.
        radius: Vector,
        /// Rotation of the ellipse x-axis, in degrees.
        rotation: f64,
        /// Take the longer of the two candidate arcs.
        large_arc: bool,
        /// Sweep in the positive-angle direction.
        sweep: bool,
    },
    /// Cubic Bezier curve.
    CubicBezier {
        /// Start point.
        start: Point,
        /// First control point.
        control1: Point,
        /// Second control point.
        control2: Point,
        /// End point.
        end: Point,
    },
    /// Quadratic Bezier curve.
    QuadraticBezier {
        /// Start point.
        start: Point,
        /// Control point.
        control: Point,
        /// End point.
        end: Point,
    },
}

impl Geometry {
    /// Start point of the primitive.
    #[must_use]
    pub const fn start(&self) -> Point {
        match *self {
            Self::Line { start, .. }
            | Self::Arc { start, .. }
            | Self::CubicBezier { start, .. }
            | Self::QuadraticBezier { start, .. } => start,
        }
    }

    /// End point of the primitive.
    #[must_use]
    pub const fn end(&self) -> Point {
        match *self {
            Self::Line { end, .. }
            | Self::Arc { end, .. }
            | Self::CubicBezier { end, .. }
            | Self::QuadraticBezier { end, .. } => end,
        }
    }

    /// Short lowercase name of the primitive kind, for logs and reports.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Line { .. } => "line",
            Self::Arc { .. } => "arc",
            Self::CubicBezier { .. } => "cubic",
            Self::QuadraticBezier { .. } => "quadratic",
        }
    }
}

/// One primitive produced by an ingestor, tagged with where it came from.
///
/// `source_index` identifies the SVG sub-path or DXF entity; the
/// `position_index` is its ordinal under the format's counter (see
/// [`crate::ingest`]). Both are only used to build element identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// The primitive itself.
    pub geometry: Geometry,
    /// Index of the sub-path or entity the segment came from.
    pub source_index: usize,
    /// Ordinal of the segment under the format's counter.
    pub position_index: usize,
}

impl Segment {
    /// Create a new segment.
    #[must_use]
    pub const fn new(geometry: Geometry, source_index: usize, position_index: usize) -> Self {
        Self {
            geometry,
            source_index,
            position_index,
        }
    }
}

/// Which input format a run decomposed.
///
/// Selects the identifier scheme used by the assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    /// Scalable Vector Graphics.
    Svg,
    /// Drawing Exchange Format.
    Dxf,
}

/// Configuration for one decomposition run.
///
/// # Precision
///
/// `precision` is the single knob trading tolerance of numeric noise
/// against the risk of merging two distinct but very close lines.
/// Coordinates are rounded to this many decimal digits before two
/// lines are compared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecomposeConfig {
    /// Decimal digits kept when building canonical line keys.
    pub precision: u32,

    /// Lines strictly shorter than this (in source units) are dropped.
    pub min_line_length: f64,
}

impl DecomposeConfig {
    /// Default rounding precision for canonical line keys.
    pub const DEFAULT_PRECISION: u32 = 6;

    /// Default minimum line length, in source units.
    pub const DEFAULT_MIN_LINE_LENGTH: f64 = 1.0;

    /// Largest supported precision.
    ///
    /// Past this, rounding asks for digits an `f64` cannot hold for
    /// ordinary drawing coordinates.
    pub const MAX_PRECISION: u32 = 12;

    /// Check the configuration for values the pipeline cannot honour.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if `precision` exceeds
    /// [`Self::MAX_PRECISION`] or `min_line_length` is negative or not
    /// finite.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.precision > Self::MAX_PRECISION {
            return Err(PipelineError::InvalidConfig(format!(
                "precision {} exceeds maximum of {}",
                self.precision,
                Self::MAX_PRECISION,
            )));
        }
        if !self.min_line_length.is_finite() || self.min_line_length < 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "min_line_length must be finite and non-negative, got {}",
                self.min_line_length,
            )));
        }
        Ok(())
    }
}

impl Default for DecomposeConfig {
    fn default() -> Self {
        Self {
            precision: Self::DEFAULT_PRECISION,
            min_line_length: Self::DEFAULT_MIN_LINE_LENGTH,
        }
    }
}

/// Errors that can occur during decomposition.
///
/// Source-read failures belong to the import layer; everything else the
/// pipeline encounters (unsupported entities, duplicates, missing
/// extents) is absorbed and reported through diagnostics instead.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Decomposition configuration is invalid.
    #[error("invalid decompose configuration: {0}")]
    InvalidConfig(String),
}
