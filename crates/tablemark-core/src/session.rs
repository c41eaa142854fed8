//! Per-session annotation state.
//!
//! A [`Session`] owns the current page index, the rectangle store and the
//! append-only history of intersection matrices. Every action runs to
//! completion on `&mut self`; a failed action changes nothing.

use serde_json::Value;

use crate::error::AnnotateError;
use crate::intersection::{IntersectionMatrix, compute_intersections};
use crate::store::{BoxType, RectangleStore};

/// Annotation state for one interactive session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    page_index: usize,
    store: RectangleStore,
    history: Vec<IntersectionMatrix>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current 0-based page index.
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Current 1-based page number.
    pub fn page_number(&self) -> usize {
        self.page_index + 1
    }

    /// Navigate to a 1-based page, clamped to `[1, page_count]`.
    ///
    /// Returns the new 0-based index. With an empty document the index
    /// stays at 0.
    pub fn go_to_page(&mut self, requested: i64, page_count: usize) -> usize {
        let last = page_count.max(1) as i64;
        let page = requested.clamp(1, last);
        self.page_index = (page - 1) as usize;

        #[cfg(feature = "tracing")]
        tracing::debug!(requested, page_index = self.page_index, "navigated");

        self.page_index
    }

    /// Return to the first page, as when a new document is loaded.
    pub fn reset_page(&mut self) {
        self.page_index = 0;
    }

    pub fn store(&self) -> &RectangleStore {
        &self.store
    }

    /// Commit `shapes` as the current collection for `box_type`.
    pub fn save(&mut self, box_type: BoxType, shapes: &[Value]) -> Result<usize, AnnotateError> {
        self.store.save(box_type, shapes)
    }

    /// Empty both rectangle collections. The matrix history is kept.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Intersect the stored rows and columns for the current page and append
    /// the result to the history.
    ///
    /// # Errors
    ///
    /// Returns [`AnnotateError::MissingAnnotations`] if either collection is
    /// empty. Nothing is computed or appended in that case.
    pub fn create_boxes(&mut self) -> Result<&IntersectionMatrix, AnnotateError> {
        let columns = self.store.columns();
        let rows = self.store.rows();
        if columns.is_empty() || rows.is_empty() {
            return Err(AnnotateError::MissingAnnotations);
        }

        let matrix = compute_intersections(columns.rects(), rows.rects(), self.page_number());

        #[cfg(feature = "tracing")]
        tracing::debug!(
            page = matrix.page,
            rows = matrix.row_count(),
            columns = matrix.column_count(),
            "computed intersections"
        );

        self.history.push(matrix);
        let last = self.history.len() - 1;
        Ok(&self.history[last])
    }

    /// Every matrix computed in this session, oldest first.
    pub fn history(&self) -> &[IntersectionMatrix] {
        &self.history
    }

    /// The most recent matrix computed for 1-based `page`, if any.
    pub fn latest_for_page(&self, page: usize) -> Option<&IntersectionMatrix> {
        self.history.iter().rev().find(|m| m.page == page)
    }

    /// The history as JSON, in the form shown after "Create Boxes".
    pub fn history_json(&self) -> Value {
        serde_json::to_value(&self.history).unwrap_or(Value::Null)
    }
}
