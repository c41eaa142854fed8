//! lopdf-based document backend.
//!
//! Implements [`PageImageProvider`] using the
//! [lopdf](https://crates.io/crates/lopdf) crate. A page image is sized from
//! the page's visible area: the CropBox when one is set (directly or through
//! the page tree), otherwise the MediaBox, with width and height swapped for
//! pages rotated by 90 or 270 degrees.

use std::collections::HashSet;
use std::path::Path;

use tablemark_core::{PageImage, PageImageProvider, RenderOptions};

use crate::error::BackendError;

/// A parsed PDF document backed by lopdf.
pub struct LopdfDocument {
    /// The underlying lopdf document.
    inner: lopdf::Document,
    /// Cached ordered list of page ObjectIds (indexed by 0-based page number).
    page_ids: Vec<lopdf::ObjectId>,
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("page_count", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

/// Visible page size in PDF points, after rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
    /// Page rotation normalized to 0, 90, 180 or 270.
    pub rotation: i64,
}

impl LopdfDocument {
    /// Parse PDF bytes.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Parse`] for malformed input and
    /// [`BackendError::PasswordRequired`] for encrypted documents.
    pub fn open(bytes: &[u8]) -> Result<Self, BackendError> {
        let inner = lopdf::Document::load_mem(bytes)
            .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;

        if inner.is_encrypted() {
            return Err(BackendError::PasswordRequired);
        }

        Ok(Self::from_inner(inner))
    }

    /// Parse an encrypted PDF with a password.
    ///
    /// The password is ignored for documents that are not encrypted.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidPassword`] when the password does not
    /// unlock the document.
    pub fn open_with_password(bytes: &[u8], password: &str) -> Result<Self, BackendError> {
        let inner = lopdf::Document::load_mem_with_password(bytes, password).map_err(|e| match e {
            lopdf::Error::InvalidPassword => BackendError::InvalidPassword,
            other => BackendError::Parse(format!("failed to parse PDF: {other}")),
        })?;

        if inner.is_encrypted() {
            return Err(BackendError::InvalidPassword);
        }

        Ok(Self::from_inner(inner))
    }

    /// Read and parse a PDF file, decrypting it when a password is given.
    pub fn open_file(path: impl AsRef<Path>, password: Option<&str>) -> Result<Self, BackendError> {
        let bytes = std::fs::read(path.as_ref())?;
        match password {
            Some(pw) => Self::open_with_password(&bytes, pw),
            None => Self::open(&bytes),
        }
    }

    fn from_inner(inner: lopdf::Document) -> Self {
        // get_pages returns BTreeMap<u32, ObjectId> with 1-based keys
        let page_ids: Vec<lopdf::ObjectId> = inner.get_pages().values().copied().collect();

        #[cfg(feature = "tracing")]
        tracing::debug!(page_count = page_ids.len(), "loaded PDF document");

        Self { inner, page_ids }
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Visible size of page `index` in points.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Parse`] if the index is out of range or the
    /// page has no usable MediaBox.
    pub fn page_size(&self, index: usize) -> Result<PageSize, BackendError> {
        let page_id = *self.page_ids.get(index).ok_or_else(|| {
            BackendError::Parse(format!(
                "page index {index} out of range (0..{})",
                self.page_ids.len()
            ))
        })?;

        let visible = match resolve_inherited(&self.inner, page_id, b"CropBox")? {
            Some(obj) => page_box(obj, "CropBox")?,
            None => {
                let obj = resolve_inherited(&self.inner, page_id, b"MediaBox")?.ok_or_else(
                    || BackendError::Parse("MediaBox not found on page or ancestors".into()),
                )?;
                page_box(obj, "MediaBox")?
            }
        };

        let rotation = match resolve_inherited(&self.inner, page_id, b"Rotate")? {
            Some(obj) => obj
                .as_i64()
                .map_err(|e| BackendError::Parse(format!("Rotate is not an integer: {e}")))?,
            None => 0,
        }
        .rem_euclid(360);

        let (width, height) = (visible.2 - visible.0, visible.3 - visible.1);
        let (width, height) = if rotation == 90 || rotation == 270 {
            (height.abs(), width.abs())
        } else {
            (width.abs(), height.abs())
        };

        Ok(PageSize {
            width,
            height,
            rotation,
        })
    }
}

impl PageImageProvider for LopdfDocument {
    fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn render_page(&self, index: usize, options: &RenderOptions) -> Option<PageImage> {
        if index >= self.page_ids.len() {
            return None;
        }
        match self.page_size(index) {
            Ok(size) => Some(PageImage {
                index,
                width: options.to_pixels(size.width),
                height: options.to_pixels(size.height),
            }),
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(page = index + 1, error = %_e, "page box unavailable");
                None
            }
        }
    }
}

/// Parse a page box array `[x0, y0, x1, y1]`.
fn page_box(obj: &lopdf::Object, name: &str) -> Result<(f64, f64, f64, f64), BackendError> {
    let array = obj
        .as_array()
        .map_err(|e| BackendError::Parse(format!("{name} is not an array: {e}")))?;
    if array.len() != 4 {
        return Err(BackendError::Parse(format!(
            "expected 4-element array for {name}, got {}",
            array.len()
        )));
    }
    Ok((
        object_to_f64(&array[0])?,
        object_to_f64(&array[1])?,
        object_to_f64(&array[2])?,
        object_to_f64(&array[3])?,
    ))
}

/// Convert a lopdf numeric object (Integer or Real) to f64.
fn object_to_f64(obj: &lopdf::Object) -> Result<f64, BackendError> {
    match obj {
        lopdf::Object::Integer(i) => Ok(*i as f64),
        lopdf::Object::Real(f) => Ok(*f as f64),
        _ => Err(BackendError::Parse(format!("expected number, got {obj:?}"))),
    }
}

/// Look up a key in the page dictionary, walking up the page tree
/// (via /Parent) if the key is not found on the page itself.
///
/// A /Parent chain that revisits a node is reported as a parse error.
fn resolve_inherited<'a>(
    doc: &'a lopdf::Document,
    page_id: lopdf::ObjectId,
    key: &[u8],
) -> Result<Option<&'a lopdf::Object>, BackendError> {
    let mut visited = HashSet::new();
    let mut current_id = page_id;
    loop {
        if !visited.insert(current_id) {
            return Err(BackendError::Parse("cyclic /Parent chain".into()));
        }

        let dict = doc
            .get_object(current_id)
            .and_then(|o| o.as_dict())
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;

        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }

        match dict.get(b"Parent") {
            Ok(parent_obj) => {
                current_id = parent_obj
                    .as_reference()
                    .map_err(|e| BackendError::Parse(format!("invalid /Parent reference: {e}")))?;
            }
            Err(_) => return Ok(None),
        }
    }
}

/// Build a PDF whose pages are described by their page dictionary extras.
#[cfg(test)]
fn create_test_pdf(pages: &[lopdf::Dictionary], parent_extra: lopdf::Dictionary) -> Vec<u8> {
    let mut doc = build_test_document(pages, parent_extra);
    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("failed to save test PDF");
    buf
}

/// Like [`create_test_pdf`], encrypted with RC4-128 under `user_password`.
#[cfg(test)]
fn create_encrypted_test_pdf(pages: &[lopdf::Dictionary], user_password: &str) -> Vec<u8> {
    use lopdf::{EncryptionState, EncryptionVersion, Object, Permissions, StringFormat};

    let mut doc = build_test_document(pages, lopdf::Dictionary::new());
    doc.trailer.set(
        "ID",
        Object::Array(vec![
            Object::String(vec![7u8; 16], StringFormat::Literal),
            Object::String(vec![9u8; 16], StringFormat::Literal),
        ]),
    );
    let state = EncryptionState::try_from(EncryptionVersion::V2 {
        document: &doc,
        owner_password: "owner",
        user_password,
        key_length: 128,
        permissions: Permissions::all(),
    })
    .expect("failed to set up encryption");
    doc.encrypt(&state).expect("failed to encrypt test PDF");

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("failed to save test PDF");
    buf
}

#[cfg(test)]
fn build_test_document(
    pages: &[lopdf::Dictionary],
    parent_extra: lopdf::Dictionary,
) -> lopdf::Document {
    use lopdf::{Document, Object, ObjectId, dictionary};

    let mut doc = Document::with_version("1.5");
    let pages_id: ObjectId = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::new();
    for extra in pages {
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
        };
        for (key, value) in extra.iter() {
            page.set(key.clone(), value.clone());
        }
        kids.push(doc.add_object(page).into());
    }

    let mut parent = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => pages.len() as i64,
    };
    for (key, value) in parent_extra.iter() {
        parent.set(key.clone(), value.clone());
    }
    doc.objects.insert(pages_id, Object::Dictionary(parent));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}
