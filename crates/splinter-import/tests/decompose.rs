//! Read real files from disk and decompose them.

#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::PathBuf;

use splinter_import::{ImportError, SourceDrawing, load};
use splinter_pipeline::{
    DecomposeConfig, Decomposition, ExtentsStatus, LineElement, OutputElement, decompose_dxf,
    decompose_svg,
};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn decompose(dir: &TempDir, name: &str, content: &str) -> Decomposition {
    let path = write(dir, name, content);
    let config = DecomposeConfig::default();
    match load(&path).unwrap() {
        SourceDrawing::Svg(drawing) => decompose_svg(&drawing, &config).unwrap(),
        SourceDrawing::Dxf(drawing) => decompose_dxf(&drawing, &config).unwrap(),
    }
}

fn svg(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
{body}
</svg>"#
    )
}

fn dxf_entities(entities: &str) -> String {
    format!("0\nSECTION\n2\nENTITIES\n{entities}0\nENDSEC\n0\nEOF\n")
}

fn dxf_line(x1: f64, y1: f64, x2: f64, y2: f64) -> String {
    format!("0\nLINE\n8\n0\n10\n{x1:?}\n20\n{y1:?}\n30\n0.0\n11\n{x2:?}\n21\n{y2:?}\n31\n0.0\n")
}

fn ids(result: &Decomposition) -> Vec<&str> {
    result
        .document
        .elements
        .iter()
        .map(OutputElement::id)
        .collect()
}

fn endpoints(line: &LineElement) -> (f64, f64, f64, f64) {
    (line.x1, line.y1, line.x2, line.y2)
}

// --- SVG ---

#[test]
fn svg_path_and_line_with_many_digits_deduplicate() {
    let dir = TempDir::new().unwrap();
    let result = decompose(
        &dir,
        "precise.svg",
        &svg(r#"<line x1="0" y1="0" x2="12345.6789" y2="0" stroke="black"/>
<path d="M 0,0 L 12345.6789,0" stroke="black" fill="none"/>"#),
    );
    assert_eq!(ids(&result), vec!["path0_seg0"]);
    let line = result.document.lines().next().unwrap();
    assert_eq!(endpoints(line), (0.0, 0.0, 12345.6789, 0.0));
    assert_eq!(result.diagnostics.duplicate_lines[0].segment_id, "path1_seg0");
}

#[test]
fn svg_line_element() {
    let dir = TempDir::new().unwrap();
    let result = decompose(
        &dir,
        "line.svg",
        &svg(r#"<line x1="10" y1="10" x2="90" y2="10" stroke="black"/>"#),
    );
    let lines: Vec<_> = result.document.lines().collect();
    assert_eq!(lines.len(), 1);
    assert_eq!(endpoints(lines[0]), (10.0, 10.0, 90.0, 10.0));
    assert_eq!(lines[0].stroke, "black");
    assert_eq!(lines[0].fill, "none");
    assert_eq!(lines[0].id, "path0_seg0");
}

#[test]
fn svg_rectangle_path() {
    let dir = TempDir::new().unwrap();
    let result = decompose(
        &dir,
        "rect.svg",
        &svg(r#"<path d="M 10,10 L 90,10 L 90,90 L 10,90 Z" stroke="black" fill="none"/>"#),
    );
    let lines: Vec<_> = result.document.lines().map(endpoints).collect();
    assert_eq!(
        lines,
        vec![
            (10.0, 10.0, 90.0, 10.0),
            (90.0, 10.0, 90.0, 90.0),
            (90.0, 90.0, 10.0, 90.0),
            (10.0, 90.0, 10.0, 10.0),
        ]
    );
}

#[test]
fn svg_duplicates_across_elements() {
    let dir = TempDir::new().unwrap();
    let result = decompose(
        &dir,
        "dupes.svg",
        &svg(r#"<line x1="10" y1="10" x2="90" y2="10" stroke="black"/>
<line x1="10" y1="10" x2="90" y2="10" stroke="red"/>
<line x1="90" y1="10" x2="10" y2="10" stroke="blue"/>"#),
    );
    assert_eq!(ids(&result), vec!["path0_seg0"]);
    assert_eq!(result.diagnostics.duplicate_lines.len(), 2);
}

#[test]
fn svg_curves_and_arcs_become_paths() {
    let dir = TempDir::new().unwrap();
    let result = decompose(
        &dir,
        "curves.svg",
        &svg(r#"<path d="M 30,30 A 20,20 0 0,1 70,30"/>
<path d="M 10,90 C 30,10 70,10 90,90"/>
<path d="M 30,30 Q 50,10 70,30"/>"#),
    );
    let d: Vec<&str> = result.document.paths().map(|p| p.d.as_str()).collect();
    assert_eq!(
        d,
        vec![
            "M 30.0,30.0 A 20.0,20.0 0.0 0,1 70.0,30.0",
            "M 10.0,90.0 C 30.0,10.0 70.0,10.0 90.0,90.0",
            "M 30.0,30.0 Q 50.0,10.0 70.0,30.0",
        ]
    );
    assert_eq!(ids(&result), vec!["path0_seg0", "path1_seg0", "path2_seg0"]);
}

#[test]
fn svg_mixed_elements_keep_order() {
    let dir = TempDir::new().unwrap();
    let result = decompose(
        &dir,
        "mixed.svg",
        &svg(r#"<line x1="10" y1="10" x2="90" y2="10"/>
<line x1="10" y1="20" x2="90" y2="20"/>
<path d="M 30,30 Q 50,10 70,30"/>"#),
    );
    assert_eq!(ids(&result), vec!["path0_seg0", "path1_seg0", "path2_seg0"]);
    assert_eq!(result.document.lines().count(), 2);
    assert_eq!(result.document.paths().count(), 1);
    assert!(result.document.viewbox.is_none());
}

#[test]
fn malformed_svg_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "bad.svg", &svg(r#"<path d="M 0,0 L 1"/>"#));
    assert!(matches!(load(&path), Err(ImportError::Svg(_))));
}

// --- DXF ---

#[test]
fn dxf_two_lines_with_viewbox() {
    let dir = TempDir::new().unwrap();
    let content = dxf_entities(&(dxf_line(10.0, 10.0, 90.0, 10.0) + &dxf_line(90.0, 10.0, 90.0, 90.0)));
    let result = decompose(&dir, "test.dxf", &content);
    assert_eq!(ids(&result), vec!["dxf_seg0", "dxf_seg1"]);

    let vb = result.document.viewbox.unwrap();
    assert_eq!((vb.min_x, vb.min_y, vb.width, vb.height), (10.0, 10.0, 80.0, 80.0));
    assert_eq!(vb.unit, "");
    assert_eq!(result.diagnostics.extents, ExtentsStatus::Available);
}

#[test]
fn dxf_paper_space_is_ignored() {
    let dir = TempDir::new().unwrap();
    let frame = "0\nLINE\n8\n0\n67\n1\n10\n0.0\n20\n0.0\n30\n0.0\n11\n500.0\n21\n500.0\n31\n0.0\n";
    let content = dxf_entities(&(dxf_line(10.0, 10.0, 90.0, 10.0) + frame));
    let result = decompose(&dir, "layout.dxf", &content);
    assert_eq!(ids(&result), vec!["dxf_seg0"]);
    let vb = result.document.viewbox.unwrap();
    assert_eq!((vb.min_x, vb.width), (10.0, 80.0));
}

#[test]
fn dxf_arc() {
    let dir = TempDir::new().unwrap();
    let content = dxf_entities(
        "0\nARC\n8\n0\n10\n50.0\n20\n50.0\n30\n0.0\n40\n25.0\n50\n0.0\n51\n180.0\n",
    );
    let result = decompose(&dir, "arc.dxf", &content);
    let paths: Vec<_> = result.document.paths().collect();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].d, "M 75.0,50.0 A 25.0,25.0 0.0 0,1 25.0,50.0");
    assert_eq!(paths[0].id, "dxf_seg0");
}

#[test]
fn dxf_closed_lwpolyline_rectangle() {
    let dir = TempDir::new().unwrap();
    let content = format!(
        "0\nSECTION\n2\nHEADER\n9\n$ACADVER\n1\nAC1015\n9\n$INSUNITS\n70\n4\n0\nENDSEC\n{}",
        dxf_entities(
            "0\nLWPOLYLINE\n8\n0\n90\n4\n70\n1\n\
             10\n10.0\n20\n10.0\n\
             10\n90.0\n20\n10.0\n\
             10\n90.0\n20\n90.0\n\
             10\n10.0\n20\n90.0\n",
        )
    );
    let result = decompose(&dir, "poly.dxf", &content);
    let lines: Vec<_> = result.document.lines().map(endpoints).collect();
    assert_eq!(
        lines,
        vec![
            (10.0, 10.0, 90.0, 10.0),
            (90.0, 10.0, 90.0, 90.0),
            (90.0, 90.0, 10.0, 90.0),
            (10.0, 90.0, 10.0, 10.0),
        ]
    );
    assert_eq!(ids(&result), vec!["dxf_seg0", "dxf_seg1", "dxf_seg2", "dxf_seg3"]);
    assert_eq!(result.document.viewbox.unwrap().unit, "mm");
}

#[test]
fn dxf_duplicates_are_dropped() {
    let dir = TempDir::new().unwrap();
    let content = dxf_entities(
        &(dxf_line(10.0, 10.0, 90.0, 10.0)
            + &dxf_line(10.0, 10.0, 90.0, 10.0)
            + &dxf_line(90.0, 10.0, 10.0, 10.0)),
    );
    let result = decompose(&dir, "dupes.dxf", &content);
    let lines: Vec<_> = result.document.lines().collect();
    assert_eq!(lines.len(), 1);
    assert_eq!(endpoints(lines[0]), (10.0, 10.0, 90.0, 10.0));
    assert_eq!(lines[0].id, "dxf_seg0");
}

#[test]
fn dxf_empty_entities_section() {
    let dir = TempDir::new().unwrap();
    let result = decompose(&dir, "empty.dxf", &dxf_entities(""));
    assert!(result.document.is_empty());
    assert!(result.document.viewbox.is_none());
    assert_eq!(result.diagnostics.extents, ExtentsStatus::Unavailable);
}

#[test]
fn uppercase_extension_is_accepted() {
    let dir = TempDir::new().unwrap();
    let result = decompose(&dir, "LOUD.DXF", &dxf_entities(&dxf_line(0.0, 0.0, 5.0, 0.0)));
    assert_eq!(result.document.len(), 1);
}
