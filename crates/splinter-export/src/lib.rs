//! splinter-export: Pure SVG serializer (sans-IO)
//!
//! Converts a decomposed document into SVG markup. Writing the result
//! to disk is left to the caller.

pub mod svg;

pub use svg::to_svg;
