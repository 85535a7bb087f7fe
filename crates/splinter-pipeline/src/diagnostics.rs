//! Decomposition diagnostics: counts and notices for one run.
//!
//! Every call to [`decompose_svg`](crate::decompose_svg) or
//! [`decompose_dxf`](crate::decompose_dxf) collects diagnostics alongside
//! the output document. Nothing recorded here is an error; duplicates,
//! skipped entities, and missing extents are all normal outcomes.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::dedup::CanonicalLineKey;
use crate::types::SourceFormat;

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// A line dropped because an equivalent line was already emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateNotice {
    /// The shared canonical key.
    pub key: CanonicalLineKey,
    /// Identifier the dropped line would have received.
    pub segment_id: String,
}

/// Whether the output canvas could be sized from the source extents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtentsStatus {
    /// SVG input never carries a computed canvas.
    NotApplicable,
    /// Extents were computed and a viewBox attached.
    Available,
    /// Extents could not be computed; the viewBox was omitted.
    Unavailable,
}

/// Diagnostics collected from a single decomposition run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecomposeDiagnostics {
    /// Input format of the run.
    pub format: SourceFormat,
    /// Segments produced by the ingestor.
    pub segments_ingested: usize,
    /// Lines dropped by the minimum-length filter.
    pub degenerate_lines_dropped: usize,
    /// Lines dropped as duplicates, in the order they were seen.
    pub duplicate_lines: Vec<DuplicateNotice>,
    /// Entity kinds skipped during DXF ingestion, one entry per entity.
    pub skipped_entities: Vec<String>,
    /// Elements in the output document.
    pub elements_emitted: usize,
    /// Whether the canvas was sized from the source extents.
    pub extents: ExtentsStatus,
    /// Wall-clock duration of the run (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
}

impl DecomposeDiagnostics {
    /// Empty diagnostics for a run over `format`.
    #[must_use]
    pub const fn new(format: SourceFormat) -> Self {
        Self {
            format,
            segments_ingested: 0,
            degenerate_lines_dropped: 0,
            duplicate_lines: Vec::new(),
            skipped_entities: Vec::new(),
            elements_emitted: 0,
            extents: ExtentsStatus::NotApplicable,
            total_duration: Duration::ZERO,
        }
    }

    /// Skipped entity kinds with their counts, sorted by kind.
    #[must_use]
    pub fn skipped_by_kind(&self) -> Vec<(&str, usize)> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for kind in &self.skipped_entities {
            *counts.entry(kind.as_str()).or_insert(0) += 1;
        }
        counts.into_iter().collect()
    }

    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Decomposition Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Format: {}",
            match self.format {
                SourceFormat::Svg => "SVG",
                SourceFormat::Dxf => "DXF",
            }
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            self.total_duration.as_secs_f64() * 1000.0,
        ));
        lines.push(String::new());

        lines.push(format!("{:<28} {:>8}", "Stage", "Count"));
        lines.push("-".repeat(40));
        lines.push(format!("{:<28} {:>8}", "Segments ingested", self.segments_ingested));
        lines.push(format!(
            "{:<28} {:>8}",
            "Degenerate lines dropped", self.degenerate_lines_dropped
        ));
        lines.push(format!(
            "{:<28} {:>8}",
            "Duplicate lines dropped",
            self.duplicate_lines.len()
        ));
        lines.push(format!(
            "{:<28} {:>8}",
            "Entities skipped",
            self.skipped_entities.len()
        ));
        lines.push(format!("{:<28} {:>8}", "Elements emitted", self.elements_emitted));

        let skipped = self.skipped_by_kind();
        if !skipped.is_empty() {
            lines.push(String::new());
            lines.push("Skipped entity kinds:".to_owned());
            for (kind, count) in skipped {
                lines.push(format!("  {kind:<26} {count:>8}"));
            }
        }

        if !self.duplicate_lines.is_empty() {
            lines.push(String::new());
            lines.push("Duplicate lines:".to_owned());
            for notice in &self.duplicate_lines {
                lines.push(format!("  {} {}", notice.segment_id, notice.key));
            }
        }

        lines.push(String::new());
        lines.push(format!(
            "Extents: {}",
            match self.extents {
                ExtentsStatus::NotApplicable => "not applicable",
                ExtentsStatus::Available => "available",
                ExtentsStatus::Unavailable => "unavailable (no viewBox)",
            }
        ));

        lines.join("\n")
    }
}
