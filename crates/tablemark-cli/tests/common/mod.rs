//! Shared helpers for tablemark CLI integration tests.
#![allow(dead_code)]

use std::io::Write;

use assert_cmd::Command;

pub fn cmd() -> Command {
    Command::cargo_bin("tablemark").unwrap()
}

/// Create a PDF with one empty page per `(width, height)` MediaBox.
pub fn pdf_with_pages(sizes: &[(i64, i64)]) -> Vec<u8> {
    save(&mut document_with_pages(sizes))
}

/// Like [`pdf_with_pages`], encrypted so that it opens only with `user_password`.
pub fn encrypted_pdf_with_pages(sizes: &[(i64, i64)], user_password: &str) -> Vec<u8> {
    use lopdf::{EncryptionState, EncryptionVersion, Object, Permissions, StringFormat};

    let mut doc = document_with_pages(sizes);
    doc.trailer.set(
        "ID",
        Object::Array(vec![
            Object::String(vec![1u8; 16], StringFormat::Literal),
            Object::String(vec![2u8; 16], StringFormat::Literal),
        ]),
    );
    let state = EncryptionState::try_from(EncryptionVersion::V2 {
        document: &doc,
        owner_password: "owner",
        user_password,
        key_length: 128,
        permissions: Permissions::all(),
    })
    .unwrap();
    doc.encrypt(&state).unwrap();
    save(&mut doc)
}

fn document_with_pages(sizes: &[(i64, i64)]) -> lopdf::Document {
    use lopdf::{Object, ObjectId, dictionary};

    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id: ObjectId = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::new();
    for &(width, height) in sizes {
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => sizes.len() as i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

fn save(doc: &mut lopdf::Document) -> Vec<u8> {
    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// Write a two-page US Letter PDF to a temp file.
pub fn letter_pdf() -> tempfile::NamedTempFile {
    write_temp(&pdf_with_pages(&[(612, 792), (612, 792)]), ".pdf")
}

/// Write bytes to a temp file with the given suffix.
pub fn write_temp(bytes: &[u8], suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

/// Write a canvas JSON document holding the given shapes.
pub fn shapes_file(shapes: serde_json::Value) -> tempfile::NamedTempFile {
    let doc = serde_json::json!({ "version": "4.4.0", "objects": shapes });
    write_temp(doc.to_string().as_bytes(), ".json")
}
