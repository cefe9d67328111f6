// tests/render_inject.rs
// Marker-based page injection on real files.

use literature_digest::render::{inject_into_file, InjectError, END_MARKER, START_MARKER};
use std::fs;

const PAGE: &str = include_str!("fixtures/literature.html");

#[test]
fn injects_and_reports_change() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("literature.html");
    fs::write(&p, PAGE).unwrap();

    assert!(inject_into_file(&p, "<div class=\"grid\"></div>").unwrap());
    let out = fs::read_to_string(&p).unwrap();
    assert!(out.contains(&format!("{START_MARKER}\n<div class=\"grid\"></div>\n{END_MARKER}")));
    assert!(!out.contains("placeholder"));
    assert!(out.contains("<h1>Weekly literature</h1>"));
    assert!(out.contains("<footer>Clinic</footer>"));

    // same content again: no rewrite
    assert!(!inject_into_file(&p, "<div class=\"grid\"></div>").unwrap());
}

#[test]
fn missing_markers_fail_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("literature.html");
    let original = "<html><body>no markers here</body></html>";
    fs::write(&p, original).unwrap();

    let err = inject_into_file(&p, "<p>new</p>").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<InjectError>(),
        Some(InjectError::MarkersMissing { .. })
    ));
    assert_eq!(fs::read_to_string(&p).unwrap(), original);
}

#[test]
fn missing_page_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(inject_into_file(&dir.path().join("absent.html"), "x").is_err());
}
