use std::path::Path;

use tablemark_core::{PageImageProvider, RenderOptions};

use crate::cli::TextFormat;
use crate::shared::open_document;

pub fn run(
    file: &Path,
    dpi: f64,
    format: &TextFormat,
    password: Option<&str>,
) -> Result<(), i32> {
    let doc = open_document(file, password)?;
    let options = RenderOptions { dpi };
    let page_count = doc.page_count();

    let mut page_infos: Vec<serde_json::Value> = Vec::new();
    for idx in 0..page_count {
        let image = doc.render_page(idx, &options);
        match format {
            TextFormat::Text => match image {
                Some(img) => println!("Page {}: {} x {} px", idx + 1, img.width, img.height),
                None => println!("Page {}: not available", idx + 1),
            },
            TextFormat::Json => {
                let value = match image {
                    Some(img) => serde_json::json!({
                        "page": idx + 1,
                        "width": img.width,
                        "height": img.height,
                    }),
                    None => serde_json::json!({
                        "page": idx + 1,
                        "available": false,
                    }),
                };
                page_infos.push(value);
            }
        }
    }

    match format {
        TextFormat::Text => {
            println!();
            println!("Pages: {page_count}");
        }
        TextFormat::Json => {
            let output = serde_json::json!({
                "pages": page_count,
                "dpi": dpi,
                "page_info": page_infos,
            });
            println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
        }
    }

    Ok(())
}
