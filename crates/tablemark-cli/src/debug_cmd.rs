use std::fs;
use std::path::Path;

use tablemark_core::{
    BoxType, RectangleStore, RenderOptions, SvgOptions, compute_intersections, load_page_image,
    render_annotations,
};

use crate::shared::{load_shapes, open_document};

#[allow(clippy::too_many_arguments)]
pub fn run(
    file: &Path,
    columns: &Path,
    rows: &Path,
    page: usize,
    dpi: f64,
    output: Option<&Path>,
    no_cells: bool,
    password: Option<&str>,
) -> Result<(), i32> {
    let doc = open_document(file, password)?;
    let index = page.saturating_sub(1);
    let image = load_page_image(&doc, index, &RenderOptions { dpi }).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;

    let mut store = RectangleStore::new();
    store.save(BoxType::Column, &load_shapes(columns)?).map_err(|e| {
        eprintln!("Error: column annotations: {e}");
        1
    })?;
    store.save(BoxType::Row, &load_shapes(rows)?).map_err(|e| {
        eprintln!("Error: row annotations: {e}");
        1
    })?;

    let matrix = (!store.columns().is_empty() && !store.rows().is_empty()).then(|| {
        compute_intersections(store.columns().rects(), store.rows().rects(), index + 1)
    });

    let options = SvgOptions {
        show_cells: !no_cells,
        ..SvgOptions::default()
    };
    let svg = render_annotations(
        f64::from(image.width),
        f64::from(image.height),
        store.columns().rects(),
        store.rows().rects(),
        matrix.as_ref(),
        &options,
    );

    match output {
        Some(path) => {
            fs::write(path, &svg).map_err(|e| {
                eprintln!("Error writing {}: {e}", path.display());
                1
            })?;
            eprintln!("Wrote {}", path.display());
        }
        None => print!("{svg}"),
    }

    Ok(())
}
