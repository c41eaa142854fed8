//! tablemark-parse: PDF loading for tablemark.
//!
//! Provides [`LopdfDocument`], the lopdf-backed implementation of the
//! [`PageImageProvider`](tablemark_core::PageImageProvider) contract used by
//! the annotation session.

pub mod error;
pub mod lopdf_backend;

pub use error::BackendError;
pub use lopdf_backend::{LopdfDocument, PageSize};
pub use tablemark_core;
