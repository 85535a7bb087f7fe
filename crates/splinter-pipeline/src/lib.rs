//! splinter-pipeline: Pure vector decomposition pipeline (sans-IO).
//!
//! Splits a parsed vector drawing into one output element per
//! primitive:
//! ingest -> degenerate filter -> line deduplication -> assembly.
//!
//! This crate has **no parser or filesystem dependencies** -- it operates
//! on already-parsed [`SvgDrawing`] and [`DxfDrawing`] models and returns
//! a structured [`Document`]. Reading files lives in `splinter-import`
//! and serialization in `splinter-export`.

pub mod arc;
pub mod assemble;
pub mod dedup;
pub mod diagnostics;
pub mod explode;
pub mod extents;
pub mod filter;
pub mod format;
pub mod ingest;
pub mod source;
pub mod types;

use std::time::Instant;

pub use assemble::{Decomposition, Document, LineElement, OutputElement, PathElement};
pub use dedup::CanonicalLineKey;
pub use diagnostics::{DecomposeDiagnostics, DuplicateNotice, ExtentsStatus};
pub use extents::ViewBox;
pub use ingest::DxfIngestor;
pub use source::{DxfDrawing, DxfEntity, Point3, PolylineVertex, SvgDrawing, SvgPath};
pub use types::{
    DecomposeConfig, Geometry, PipelineError, Point, Segment, SourceFormat, Vector,
};

use assemble::Assembler;

/// Decompose an SVG drawing into one element per primitive.
///
/// Elements keep the drawing's native order. Lines shorter than
/// `config.min_line_length` and repeated lines are dropped; curves and
/// arcs always survive. SVG output never carries a computed viewBox.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidConfig`] if `config` fails validation.
pub fn decompose_svg(
    drawing: &SvgDrawing,
    config: &DecomposeConfig,
) -> Result<Decomposition, PipelineError> {
    config.validate()?;
    let started = Instant::now();

    let mut assembler = Assembler::new(SourceFormat::Svg, config);
    assembler.extend(ingest::svg_segments(drawing));

    let mut result = assembler.finish(None, Vec::new());
    result.diagnostics.total_duration = started.elapsed();
    log_summary(&result.diagnostics);
    Ok(result)
}

/// Decompose a DXF drawing into one element per primitive.
///
/// Extents are computed over every entity before any filtering, so the
/// canvas matches the source drawing even when entities are skipped or
/// dropped. When extents are unavailable the document carries no
/// viewBox. Unsupported entity kinds are skipped and listed in the
/// diagnostics.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidConfig`] if `config` fails validation.
pub fn decompose_dxf(
    drawing: &DxfDrawing,
    config: &DecomposeConfig,
) -> Result<Decomposition, PipelineError> {
    config.validate()?;
    let started = Instant::now();

    let viewbox = extents::viewbox(drawing);

    let mut assembler = Assembler::new(SourceFormat::Dxf, config);
    let mut ingestor = DxfIngestor::new(drawing);
    assembler.extend(ingestor.by_ref());

    let mut result = assembler.finish(viewbox, ingestor.into_skipped());
    result.diagnostics.total_duration = started.elapsed();
    log_summary(&result.diagnostics);
    Ok(result)
}

fn log_summary(diagnostics: &DecomposeDiagnostics) {
    tracing::debug!(
        format = ?diagnostics.format,
        ingested = diagnostics.segments_ingested,
        degenerate = diagnostics.degenerate_lines_dropped,
        duplicates = diagnostics.duplicate_lines.len(),
        skipped = diagnostics.skipped_entities.len(),
        emitted = diagnostics.elements_emitted,
        "decomposition finished",
    );
}
