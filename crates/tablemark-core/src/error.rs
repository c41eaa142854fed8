//! Error types for tablemark.
//!
//! Every [`AnnotateError`] is user-facing and recoverable: the action that
//! produced it leaves all session state untouched, and the user may retry.

use std::fmt;

use crate::canvas::DrawingMode;

/// Errors surfaced by annotation actions.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotateError {
    /// The requested page index is outside `[0, page_count)`.
    PageUnavailable {
        /// The 0-based page index that was requested.
        index: usize,
        /// Number of pages in the loaded document.
        page_count: usize,
    },
    /// A page was needed but no document is loaded.
    NoDocument,
    /// "Create Boxes" was requested while a rectangle collection is empty.
    MissingAnnotations,
    /// A shape record could not be turned into a rectangle.
    InvalidShape {
        /// Position of the offending shape in the submitted sequence.
        index: usize,
        /// What was wrong with it.
        reason: String,
    },
    /// A canvas edit needs a different drawing-tool mode.
    WrongDrawingMode {
        /// The mode the edit requires.
        required: DrawingMode,
    },
    /// A canvas edit addressed a shape that does not exist.
    ShapeNotFound {
        /// The 0-based index that was requested.
        index: usize,
        /// Number of shapes on the canvas.
        len: usize,
    },
}

impl fmt::Display for AnnotateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotateError::PageUnavailable { index, page_count } => write!(
                f,
                "page not available: page {} is outside 1-{page_count}",
                index + 1
            ),
            AnnotateError::NoDocument => f.write_str("no document loaded"),
            AnnotateError::MissingAnnotations => f.write_str(
                "please save both column and row annotations before creating boxes",
            ),
            AnnotateError::InvalidShape { index, reason } => {
                write!(f, "invalid shape at index {index}: {reason}")
            }
            AnnotateError::WrongDrawingMode { required } => {
                write!(f, "switch the drawing tool to '{required}' first")
            }
            AnnotateError::ShapeNotFound { index, len } => {
                write!(f, "no shape at index {index} (canvas has {len})")
            }
        }
    }
}

impl std::error::Error for AnnotateError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_unavailable_reports_one_based_page() {
        let err = AnnotateError::PageUnavailable {
            index: 4,
            page_count: 3,
        };
        assert_eq!(err.to_string(), "page not available: page 5 is outside 1-3");
    }

    #[test]
    fn no_document_message() {
        assert_eq!(AnnotateError::NoDocument.to_string(), "no document loaded");
    }

    #[test]
    fn missing_annotations_message() {
        let msg = AnnotateError::MissingAnnotations.to_string();
        assert!(msg.contains("column and row"));
    }

    #[test]
    fn invalid_shape_message() {
        let err = AnnotateError::InvalidShape {
            index: 2,
            reason: "missing 'left'".to_string(),
        };
        assert_eq!(err.to_string(), "invalid shape at index 2: missing 'left'");
    }

    #[test]
    fn wrong_mode_message() {
        let err = AnnotateError::WrongDrawingMode {
            required: DrawingMode::Transform,
        };
        assert_eq!(err.to_string(), "switch the drawing tool to 'transform' first");
    }

    #[test]
    fn implements_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(AnnotateError::MissingAnnotations);
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn clone_and_eq() {
        let err = AnnotateError::ShapeNotFound { index: 1, len: 0 };
        assert_eq!(err.clone(), err);
    }
}
