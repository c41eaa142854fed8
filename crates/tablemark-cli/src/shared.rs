use std::path::Path;

use serde_json::Value;
use tablemark_core::shapes_from_json;
use tablemark_parse::LopdfDocument;
use tracing::Level;

/// Install the stderr log subscriber for the given `-v` count.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Open a PDF file with user-friendly error messages.
///
/// Returns `Err(1)` with a message printed to stderr if the file is not found
/// or cannot be parsed as a valid PDF.
pub fn open_document(file: &Path, password: Option<&str>) -> Result<LopdfDocument, i32> {
    if !file.exists() {
        eprintln!("Error: file not found: {}", file.display());
        return Err(1);
    }

    LopdfDocument::open_file(file, password).map_err(|e| {
        eprintln!("Error: failed to open PDF: {e}");
        1
    })
}

/// Read the shapes of a canvas JSON file.
///
/// Accepts `{"objects": [...]}` or a bare array of shape objects.
pub fn read_shapes(path: &Path) -> Result<Vec<Value>, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let data: Value = serde_json::from_str(&text)
        .map_err(|e| format!("{} is not valid JSON: {e}", path.display()))?;
    shapes_from_json(&data).map_err(|e| format!("{}: {e}", path.display()))
}

/// [`read_shapes`] for one-shot commands: report and exit on failure.
pub fn load_shapes(path: &Path) -> Result<Vec<Value>, i32> {
    read_shapes(path).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })
}
