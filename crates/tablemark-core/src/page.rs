//! Page image contract between the annotation session and a PDF backend.

use crate::error::AnnotateError;

/// Resolution assumed when none is configured, in dots per inch.
pub const DEFAULT_DPI: f64 = 72.0;

/// Options controlling page rasterization.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Output resolution. At 72 dpi one PDF point maps to one pixel.
    pub dpi: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { dpi: DEFAULT_DPI }
    }
}

impl RenderOptions {
    /// Pixels per PDF point.
    pub fn zoom(&self) -> f64 {
        self.dpi / DEFAULT_DPI
    }

    /// Convert a length in points to whole pixels.
    pub fn to_pixels(&self, points: f64) -> u32 {
        (points * self.zoom()).round().max(0.0) as u32
    }
}

/// A rasterized page: the drawing background and its pixel size.
#[derive(Debug, Clone, PartialEq)]
pub struct PageImage {
    /// 0-based page index.
    pub index: usize,
    pub width: u32,
    pub height: u32,
}

/// Something that can turn document pages into images.
pub trait PageImageProvider {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Rasterize page `index`, or `None` when the page is not available.
    fn render_page(&self, index: usize, options: &RenderOptions) -> Option<PageImage>;
}

/// Fetch the image for page `index`, turning "not available" into an error.
///
/// # Errors
///
/// Returns [`AnnotateError::PageUnavailable`] when `index` is outside
/// `[0, page_count)` or the provider cannot produce the page.
pub fn load_page_image<P: PageImageProvider + ?Sized>(
    provider: &P,
    index: usize,
    options: &RenderOptions,
) -> Result<PageImage, AnnotateError> {
    let page_count = provider.page_count();
    let unavailable = AnnotateError::PageUnavailable { index, page_count };
    if index >= page_count {
        return Err(unavailable);
    }
    provider.render_page(index, options).ok_or(unavailable)
}
