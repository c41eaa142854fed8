//! tablemark-core: Backend-independent data types and algorithms.
//!
//! This crate provides the annotation data model (rectangles, the column/row
//! store, intersection matrices), the intersection engine, the drawing canvas
//! model, the page-image contract that a PDF backend implements, and the
//! per-session state that ties them together.

pub mod canvas;
pub mod error;
pub mod geometry;
pub mod intersection;
pub mod page;
pub mod session;
pub mod shape;
pub mod store;
pub mod svg;

pub use canvas::{Canvas, DrawingMode, shapes_from_json};
pub use error::AnnotateError;
pub use geometry::BBox;
pub use intersection::{Cell, IntersectionMatrix, compute_intersections};
pub use page::{PageImage, PageImageProvider, RenderOptions, load_page_image};
pub use session::Session;
pub use shape::{MetaValue, Rectangle, normalize_shapes};
pub use store::{BoxType, RectangleCollection, RectangleStore};
pub use svg::{AnnotationSvg, DrawStyle, SvgOptions, render_annotations};
