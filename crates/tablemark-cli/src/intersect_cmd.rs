use std::path::Path;

use tablemark_core::{
    AnnotateError, BoxType, IntersectionMatrix, RectangleStore, compute_intersections,
};

use crate::cli::TextFormat;
use crate::shared::load_shapes;

/// Save both shape files into a fresh store and intersect them.
pub fn build_matrix(columns: &Path, rows: &Path, page: usize) -> Result<IntersectionMatrix, i32> {
    let column_shapes = load_shapes(columns)?;
    let row_shapes = load_shapes(rows)?;

    let mut store = RectangleStore::new();
    for (box_type, shapes) in [(BoxType::Column, &column_shapes), (BoxType::Row, &row_shapes)] {
        store.save(box_type, shapes).map_err(|e| {
            eprintln!("Error: {box_type} annotations: {e}");
            1
        })?;
    }

    if store.columns().is_empty() || store.rows().is_empty() {
        eprintln!("Error: {}", AnnotateError::MissingAnnotations);
        return Err(1);
    }

    Ok(compute_intersections(
        store.columns().rects(),
        store.rows().rects(),
        page,
    ))
}

pub fn run(columns: &Path, rows: &Path, page: usize, format: &TextFormat) -> Result<(), i32> {
    let matrix = build_matrix(columns, rows, page)?;

    match format {
        TextFormat::Text => print!("{}", format_matrix(&matrix)),
        TextFormat::Json => {
            let json = serde_json::to_string_pretty(&matrix).map_err(|e| {
                eprintln!("Error: {e}");
                1
            })?;
            println!("{json}");
        }
    }
    Ok(())
}

/// One line per row; cells separated by tabs, `-` for no intersection.
pub fn format_matrix(matrix: &IntersectionMatrix) -> String {
    let mut out = format!(
        "Page {} ({} rows x {} columns)\n",
        matrix.page,
        matrix.row_count(),
        matrix.column_count()
    );
    for (r, row) in matrix.values.iter().enumerate() {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| cell.bbox().map_or_else(|| "-".to_string(), |b| b.to_string()))
            .collect();
        out.push_str(&format!("row {r}:\t{}\n", cells.join("\t")));
    }
    out
}
