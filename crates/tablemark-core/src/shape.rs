//! Rectangle records and shape normalization.
//!
//! Shapes arrive from the drawing surface as loosely typed JSON objects.
//! [`normalize_shapes`] turns a batch of them into [`Rectangle`] records with
//! numeric geometry and a metadata map whose values have one representation
//! per field across the whole batch.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde_json::Value;

use crate::error::AnnotateError;
use crate::geometry::BBox;

/// Keys that make up a rectangle's geometry.
pub const GEOMETRY_KEYS: [&str; 4] = ["left", "top", "width", "height"];

/// A metadata value carried opaquely alongside a rectangle.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Number(n) => write!(f, "{n}"),
            MetaValue::Text(s) => f.write_str(s),
        }
    }
}

/// A committed annotation rectangle.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rectangle {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// Drawing-tool fields other than geometry (stroke, fill, angle, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, MetaValue>,
}

impl Rectangle {
    /// Create a rectangle with no metadata.
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
            metadata: BTreeMap::new(),
        }
    }

    /// Geometry of this rectangle.
    pub fn bbox(&self) -> BBox {
        BBox::new(self.left, self.top, self.width, self.height)
    }
}

/// Normalize a batch of raw shape objects into rectangles.
///
/// Geometry fields must be finite JSON numbers, with non-negative width and
/// height. Every other field becomes metadata: a field that holds a number in
/// every shape where it appears stays numeric, otherwise every occurrence of
/// it is converted to its textual form.
///
/// # Errors
///
/// Returns [`AnnotateError::InvalidShape`] for the first shape that is not an
/// object or has unusable geometry. Nothing is produced in that case.
pub fn normalize_shapes(shapes: &[Value]) -> Result<Vec<Rectangle>, AnnotateError> {
    let mut objects = Vec::with_capacity(shapes.len());
    for (index, shape) in shapes.iter().enumerate() {
        let obj = shape.as_object().ok_or_else(|| AnnotateError::InvalidShape {
            index,
            reason: format!("expected an object, got {}", json_kind(shape)),
        })?;
        objects.push(obj);
    }

    let textual_keys = textual_keys(&objects);

    let mut rects = Vec::with_capacity(objects.len());
    for (index, obj) in objects.iter().enumerate() {
        let left = geometry_field(obj, "left", index)?;
        let top = geometry_field(obj, "top", index)?;
        let width = geometry_field(obj, "width", index)?;
        let height = geometry_field(obj, "height", index)?;
        if width < 0.0 || height < 0.0 {
            return Err(AnnotateError::InvalidShape {
                index,
                reason: format!("negative size {width}x{height}"),
            });
        }

        let metadata = obj
            .iter()
            .filter(|(key, _)| !GEOMETRY_KEYS.contains(&key.as_str()))
            .map(|(key, value)| {
                let meta = match value.as_f64() {
                    Some(n) if !textual_keys.contains(key.as_str()) => MetaValue::Number(n),
                    _ => MetaValue::Text(textual_form(value)),
                };
                (key.clone(), meta)
            })
            .collect();

        rects.push(Rectangle {
            left,
            top,
            width,
            height,
            metadata,
        });
    }
    Ok(rects)
}

/// Metadata keys holding at least one non-numeric value in the batch.
fn textual_keys<'a>(objects: &[&'a serde_json::Map<String, Value>]) -> BTreeSet<&'a str> {
    objects
        .iter()
        .copied()
        .flat_map(|obj| obj.iter())
        .filter(|(key, value)| !GEOMETRY_KEYS.contains(&key.as_str()) && !value.is_number())
        .map(|(key, _)| key.as_str())
        .collect()
}

fn geometry_field(
    obj: &serde_json::Map<String, Value>,
    key: &str,
    index: usize,
) -> Result<f64, AnnotateError> {
    let value = obj.get(key).ok_or_else(|| AnnotateError::InvalidShape {
        index,
        reason: format!("missing '{key}'"),
    })?;
    match value.as_f64() {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(AnnotateError::InvalidShape {
            index,
            reason: format!("'{key}' is not a finite number: {value}"),
        }),
    }
}

/// Text form of a JSON value: strings verbatim, everything else as compact JSON.
fn textual_form(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
