mod common;

use common::{cmd, letter_pdf, shapes_file};
use predicates::prelude::*;
use serde_json::json;

#[test]
fn debug_writes_svg_with_cells() {
    let pdf = letter_pdf();
    let columns = shapes_file(json!([{"left": 0, "top": 0, "width": 10, "height": 100}]));
    let rows = shapes_file(json!([{"left": 0, "top": 0, "width": 100, "height": 10}]));
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("page.svg");

    cmd()
        .arg("debug")
        .arg(pdf.path())
        .arg("--columns")
        .arg(columns.path())
        .arg("--rows")
        .arg(rows.path())
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote"));

    let svg = std::fs::read_to_string(&out).unwrap();
    assert!(svg.contains("viewBox=\"0 0 612 792\""));
    assert!(svg.contains("class=\"cells\""));
    assert!(svg.contains("<rect x=\"0\" y=\"0\" width=\"10\" height=\"10\"/>"));
}

#[test]
fn debug_without_rows_still_draws_columns() {
    let pdf = letter_pdf();
    let columns = shapes_file(json!([{"left": 5, "top": 5, "width": 10, "height": 100}]));
    let rows = shapes_file(json!([]));

    cmd()
        .arg("debug")
        .arg(pdf.path())
        .arg("--columns")
        .arg(columns.path())
        .arg("--rows")
        .arg(rows.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("class=\"columns\""))
        .stdout(predicate::str::contains("class=\"cells\"").not());
}

#[test]
fn debug_page_out_of_range() {
    let pdf = letter_pdf();
    let columns = shapes_file(json!([]));
    let rows = shapes_file(json!([]));

    cmd()
        .arg("debug")
        .arg(pdf.path())
        .arg("--columns")
        .arg(columns.path())
        .arg("--rows")
        .arg(rows.path())
        .args(["--page", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("page not available"));
}
