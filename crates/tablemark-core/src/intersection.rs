//! Row/column intersection engine.
//!
//! Given the current column and row rectangles, [`compute_intersections`]
//! derives one cell box per (row, column) pair. Rows form the outer
//! dimension and columns the inner one, both in collection order, so a
//! downstream consumer can address a cell as `values[row][column]`.

use serde::ser::{Serialize, Serializer};

use crate::geometry::BBox;
use crate::shape::Rectangle;

/// One entry of an [`IntersectionMatrix`].
///
/// Serializes as the descriptor string `(x,y,w,h)`, or `""` when the row and
/// column do not overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell(pub Option<BBox>);

impl Cell {
    pub fn bbox(&self) -> Option<&BBox> {
        self.0.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.0 {
            Some(bbox) => serializer.collect_str(bbox),
            None => serializer.serialize_str(""),
        }
    }
}

/// Snapshot of the cell boxes computed for one page.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct IntersectionMatrix {
    /// 1-based page number current when the matrix was computed.
    pub page: usize,
    /// `values[row][column]`.
    pub values: Vec<Vec<Cell>>,
}

impl IntersectionMatrix {
    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.values.len()
    }

    /// Number of columns (0 when there are no rows).
    pub fn column_count(&self) -> usize {
        self.values.first().map_or(0, Vec::len)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.values.get(row).and_then(|r| r.get(column))
    }

    /// All non-empty cells as `(row, column, bbox)`.
    pub fn boxes(&self) -> impl Iterator<Item = (usize, usize, &BBox)> {
        self.values.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(c, cell)| cell.bbox().map(|b| (r, c, b)))
        })
    }
}

/// Intersect every row with every column.
///
/// The result always has `rows.len()` rows of `columns.len()` cells. Empty
/// inputs are not rejected here; callers check for them first.
pub fn compute_intersections(
    columns: &[Rectangle],
    rows: &[Rectangle],
    page: usize,
) -> IntersectionMatrix {
    let values = rows
        .iter()
        .map(|row| {
            let row_box = row.bbox();
            columns
                .iter()
                .map(|col| Cell(col.bbox().intersection(&row_box)))
                .collect()
        })
        .collect();

    IntersectionMatrix { page, values }
}
