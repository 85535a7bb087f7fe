//! splinter-import: Read SVG and DXF files into splinter source models.
//!
//! This is the only crate that touches input bytes. It produces the
//! [`SvgDrawing`] and [`DxfDrawing`] models that `splinter-pipeline`
//! decomposes, so the pipeline itself never sees a parser.

pub mod dxf;
pub mod svg;

use std::path::{Path, PathBuf};

use splinter_pipeline::{DxfDrawing, SvgDrawing};

pub use self::dxf::{load_dxf, read_dxf};
pub use self::svg::{load_svg, read_svg};

/// Errors that can occur while reading a source drawing.
///
/// All of these are fatal: no partial drawing is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// The file that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The SVG document or its path data is malformed.
    #[error("malformed SVG: {0}")]
    Svg(String),

    /// The DXF document could not be parsed.
    #[error("malformed DXF: {0}")]
    Dxf(#[source] ::dxf::DxfError),

    /// The file extension names no supported format.
    #[error("unsupported file format: {0:?} (expected .svg or .dxf)")]
    UnsupportedFormat(String),
}

/// A parsed source drawing of either supported format.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceDrawing {
    /// Parsed SVG.
    Svg(SvgDrawing),
    /// Parsed DXF.
    Dxf(DxfDrawing),
}

/// Input formats recognized by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// `.svg`
    Svg,
    /// `.dxf`
    Dxf,
}

impl InputFormat {
    /// Detect the format from a path's extension, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::UnsupportedFormat`] for any other extension,
    /// including none.
    pub fn from_path(path: &Path) -> Result<Self, ImportError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        if extension.eq_ignore_ascii_case("svg") {
            Ok(Self::Svg)
        } else if extension.eq_ignore_ascii_case("dxf") {
            Ok(Self::Dxf)
        } else {
            Err(ImportError::UnsupportedFormat(extension.to_owned()))
        }
    }
}

/// Read the drawing at `path`, choosing the parser by extension.
///
/// # Errors
///
/// Returns [`ImportError::UnsupportedFormat`] before touching the file
/// if the extension is not `.svg` or `.dxf`; otherwise any error from
/// [`load_svg`] or [`load_dxf`].
pub fn load(path: &Path) -> Result<SourceDrawing, ImportError> {
    match InputFormat::from_path(path)? {
        InputFormat::Svg => load_svg(path).map(SourceDrawing::Svg),
        InputFormat::Dxf => load_dxf(path).map(SourceDrawing::Dxf),
    }
}
