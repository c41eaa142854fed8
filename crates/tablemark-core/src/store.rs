//! The rectangle store: one current collection per box type.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::AnnotateError;
use crate::shape::{Rectangle, normalize_shapes};

/// Semantic role of an annotated rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxType {
    #[default]
    Column,
    Row,
}

impl BoxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoxType::Column => "column",
            BoxType::Row => "row",
        }
    }
}

impl fmt::Display for BoxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoxType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "column" => Ok(BoxType::Column),
            "row" => Ok(BoxType::Row),
            other => Err(format!("unknown box type '{other}' (expected column or row)")),
        }
    }
}

/// An ordered sequence of rectangles sharing a box type.
#[derive(Debug, Clone, PartialEq)]
pub struct RectangleCollection {
    box_type: BoxType,
    rects: Vec<Rectangle>,
}

impl RectangleCollection {
    /// Create an empty collection.
    pub fn new(box_type: BoxType) -> Self {
        Self {
            box_type,
            rects: Vec::new(),
        }
    }

    pub fn box_type(&self) -> BoxType {
        self.box_type
    }

    pub fn rects(&self) -> &[Rectangle] {
        &self.rects
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Render the collection as an aligned text table.
    ///
    /// Columns are `#`, the four geometry fields, then every metadata key
    /// present in any rectangle, sorted. Missing metadata is left blank.
    pub fn to_table(&self) -> String {
        let meta_keys: BTreeSet<&str> = self
            .rects
            .iter()
            .flat_map(|r| r.metadata.keys().map(String::as_str))
            .collect();

        let mut header: Vec<String> = ["#", "left", "top", "width", "height"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        header.extend(meta_keys.iter().map(|k| k.to_string()));

        let mut rows = vec![header];
        for (i, rect) in self.rects.iter().enumerate() {
            let mut row = vec![
                i.to_string(),
                rect.left.to_string(),
                rect.top.to_string(),
                rect.width.to_string(),
                rect.height.to_string(),
            ];
            for key in &meta_keys {
                row.push(
                    rect.metadata
                        .get(*key)
                        .map(|v| v.to_string())
                        .unwrap_or_default(),
                );
            }
            rows.push(row);
        }

        let ncols = rows[0].len();
        let widths: Vec<usize> = (0..ncols)
            .map(|c| rows.iter().map(|r| r[c].chars().count()).max().unwrap_or(0))
            .collect();

        let mut out = String::new();
        for row in &rows {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, &w)| format!("{cell:<w$}"))
                .collect();
            out.push_str(line.join("  ").trim_end());
            out.push('\n');
        }
        out
    }
}

/// Holds the current column and row collections.
#[derive(Debug, Clone, PartialEq)]
pub struct RectangleStore {
    columns: RectangleCollection,
    rows: RectangleCollection,
}

impl Default for RectangleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RectangleStore {
    pub fn new() -> Self {
        Self {
            columns: RectangleCollection::new(BoxType::Column),
            rows: RectangleCollection::new(BoxType::Row),
        }
    }

    /// Normalize `shapes` and replace the whole collection for `box_type`.
    ///
    /// Returns the number of rectangles stored.
    ///
    /// # Errors
    ///
    /// Returns [`AnnotateError::InvalidShape`] if any shape is unusable; the
    /// current collection is left unchanged.
    pub fn save(&mut self, box_type: BoxType, shapes: &[Value]) -> Result<usize, AnnotateError> {
        let rects = normalize_shapes(shapes)?;
        let count = rects.len();
        self.collection_mut(box_type).rects = rects;

        #[cfg(feature = "tracing")]
        tracing::debug!(box_type = %box_type, count, "saved annotations");

        Ok(count)
    }

    /// Empty both collections.
    pub fn clear(&mut self) {
        self.columns.rects.clear();
        self.rows.rects.clear();

        #[cfg(feature = "tracing")]
        tracing::debug!("cleared annotations");
    }

    pub fn columns(&self) -> &RectangleCollection {
        &self.columns
    }

    pub fn rows(&self) -> &RectangleCollection {
        &self.rows
    }

    /// The current collection for `box_type`.
    pub fn collection(&self, box_type: BoxType) -> &RectangleCollection {
        match box_type {
            BoxType::Column => &self.columns,
            BoxType::Row => &self.rows,
        }
    }

    fn collection_mut(&mut self, box_type: BoxType) -> &mut RectangleCollection {
        match box_type {
            BoxType::Column => &mut self.columns,
            BoxType::Row => &mut self.rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::MetaValue;
    use serde_json::json;

    fn shape(left: f64, top: f64, width: f64, height: f64) -> Value {
        json!({"type": "rect", "left": left, "top": top, "width": width, "height": height})
    }

    #[test]
    fn box_type_parse_and_display() {
        assert_eq!("column".parse::<BoxType>().unwrap(), BoxType::Column);
        assert_eq!("row".parse::<BoxType>().unwrap(), BoxType::Row);
        assert!("cell".parse::<BoxType>().is_err());
        assert_eq!(BoxType::Row.to_string(), "row");
    }

    #[test]
    fn new_store_is_empty() {
        let store = RectangleStore::new();
        assert!(store.columns().is_empty());
        assert!(store.rows().is_empty());
        assert_eq!(store.columns().box_type(), BoxType::Column);
        assert_eq!(store.rows().box_type(), BoxType::Row);
    }

    #[test]
    fn save_column_leaves_rows_untouched() {
        let mut store = RectangleStore::new();
        store.save(BoxType::Row, &[shape(0.0, 0.0, 100.0, 10.0)]).unwrap();
        let rows_before = store.rows().clone();

        let shapes = [shape(0.0, 0.0, 10.0, 100.0), shape(20.0, 0.0, 10.0, 100.0)];
        assert_eq!(store.save(BoxType::Column, &shapes).unwrap(), 2);

        assert_eq!(store.columns().rects(), normalize_shapes(&shapes).unwrap());
        assert_eq!(store.rows(), &rows_before);
    }

    #[test]
    fn save_replaces_rather_than_appends() {
        let mut store = RectangleStore::new();
        store
            .save(BoxType::Column, &[shape(0.0, 0.0, 1.0, 1.0), shape(1.0, 0.0, 1.0, 1.0)])
            .unwrap();
        store.save(BoxType::Column, &[shape(5.0, 5.0, 1.0, 1.0)]).unwrap();
        assert_eq!(store.columns().len(), 1);
        assert_eq!(store.columns().rects()[0].left, 5.0);
    }

    #[test]
    fn save_empty_batch_empties_collection() {
        let mut store = RectangleStore::new();
        store.save(BoxType::Row, &[shape(0.0, 0.0, 1.0, 1.0)]).unwrap();
        store.save(BoxType::Row, &[]).unwrap();
        assert!(store.rows().is_empty());
    }

    #[test]
    fn failed_save_keeps_previous_collection() {
        let mut store = RectangleStore::new();
        store.save(BoxType::Column, &[shape(0.0, 0.0, 1.0, 1.0)]).unwrap();
        let err = store
            .save(BoxType::Column, &[json!({"left": 0, "top": 0})])
            .unwrap_err();
        assert!(matches!(err, AnnotateError::InvalidShape { .. }));
        assert_eq!(store.columns().len(), 1);
    }

    #[test]
    fn clear_empties_both() {
        let mut store = RectangleStore::new();
        store.save(BoxType::Column, &[shape(0.0, 0.0, 1.0, 1.0)]).unwrap();
        store.save(BoxType::Row, &[shape(0.0, 0.0, 1.0, 1.0)]).unwrap();
        store.clear();
        assert!(store.collection(BoxType::Column).is_empty());
        assert!(store.collection(BoxType::Row).is_empty());
    }

    #[test]
    fn table_lists_geometry_and_metadata() {
        let mut store = RectangleStore::new();
        store
            .save(
                BoxType::Column,
                &[
                    json!({"left": 0, "top": 0, "width": 10, "height": 100, "stroke": "#000000"}),
                    json!({"left": 20.5, "top": 0, "width": 10, "height": 100}),
                ],
            )
            .unwrap();
        let table = store.columns().to_table();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("#"));
        assert!(lines[0].contains("stroke"));
        assert!(lines[1].contains("#000000"));
        assert!(lines[2].contains("20.5"));
        assert_eq!(
            store.columns().rects()[0].metadata["stroke"],
            MetaValue::Text("#000000".to_string())
        );
    }

    #[test]
    fn table_of_empty_collection_is_header_only() {
        let table = RectangleCollection::new(BoxType::Row).to_table();
        assert_eq!(table, "#  left  top  width  height\n");
    }
}
