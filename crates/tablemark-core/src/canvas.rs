//! Drawing surface model.
//!
//! The canvas holds fabric-style JSON shape objects, which is what the
//! rectangle store consumes on save. Drawing new rectangles requires the
//! [`DrawingMode::Rect`] tool; moving or resizing existing ones requires
//! [`DrawingMode::Transform`].

use std::fmt;
use std::str::FromStr;

use serde_json::{Value, json};

use crate::error::AnnotateError;

/// Fill applied to every drawn rectangle.
pub const FILL_COLOR: &str = "rgba(255, 165, 0, 0.3)";
/// Stroke color applied to every drawn rectangle.
pub const STROKE_COLOR: &str = "#000000";
/// Stroke width applied to every drawn rectangle.
pub const STROKE_WIDTH: f64 = 1.0;

/// Drawing-tool mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawingMode {
    /// Draw new rectangles.
    #[default]
    Rect,
    /// Move and resize existing shapes.
    Transform,
}

impl fmt::Display for DrawingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawingMode::Rect => f.write_str("rect"),
            DrawingMode::Transform => f.write_str("transform"),
        }
    }
}

impl FromStr for DrawingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rect" => Ok(DrawingMode::Rect),
            "transform" => Ok(DrawingMode::Transform),
            other => Err(format!(
                "unknown drawing tool '{other}' (expected rect or transform)"
            )),
        }
    }
}

/// The shapes currently drawn on the page.
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    mode: DrawingMode,
    objects: Vec<Value>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> DrawingMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: DrawingMode) {
        self.mode = mode;
    }

    /// Shape objects in drawing order.
    pub fn objects(&self) -> &[Value] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Draw a rectangle and return its index.
    pub fn draw(
        &mut self,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    ) -> Result<usize, AnnotateError> {
        self.require_mode(DrawingMode::Rect)?;
        self.objects.push(json!({
            "type": "rect",
            "left": left,
            "top": top,
            "width": width,
            "height": height,
            "fill": FILL_COLOR,
            "stroke": STROKE_COLOR,
            "strokeWidth": STROKE_WIDTH,
            "angle": 0,
            "scaleX": 1,
            "scaleY": 1,
        }));
        Ok(self.objects.len() - 1)
    }

    /// Move shape `index` so its top-left corner sits at (`left`, `top`).
    pub fn move_shape(&mut self, index: usize, left: f64, top: f64) -> Result<(), AnnotateError> {
        self.require_mode(DrawingMode::Transform)?;
        let obj = self.object_mut(index)?;
        obj.insert("left".to_string(), json!(left));
        obj.insert("top".to_string(), json!(top));
        Ok(())
    }

    /// Give shape `index` a new size, keeping its top-left corner.
    pub fn resize_shape(
        &mut self,
        index: usize,
        width: f64,
        height: f64,
    ) -> Result<(), AnnotateError> {
        self.require_mode(DrawingMode::Transform)?;
        let obj = self.object_mut(index)?;
        obj.insert("width".to_string(), json!(width));
        obj.insert("height".to_string(), json!(height));
        Ok(())
    }

    /// Remove shape `index`.
    pub fn erase(&mut self, index: usize) -> Result<Value, AnnotateError> {
        if index >= self.objects.len() {
            return Err(AnnotateError::ShapeNotFound {
                index,
                len: self.objects.len(),
            });
        }
        Ok(self.objects.remove(index))
    }

    /// Remove every shape.
    pub fn reset(&mut self) {
        self.objects.clear();
    }

    /// Replace all shapes from a canvas JSON document.
    ///
    /// Accepts either `{"objects": [...]}` or a bare array of shapes.
    pub fn load(&mut self, data: &Value) -> Result<usize, String> {
        self.objects = shapes_from_json(data)?;
        Ok(self.objects.len())
    }

    /// The canvas as a JSON document (`{"objects": [...]}`).
    pub fn to_json(&self) -> Value {
        json!({ "objects": self.objects })
    }

    fn require_mode(&self, required: DrawingMode) -> Result<(), AnnotateError> {
        if self.mode == required {
            Ok(())
        } else {
            Err(AnnotateError::WrongDrawingMode { required })
        }
    }

    fn object_mut(
        &mut self,
        index: usize,
    ) -> Result<&mut serde_json::Map<String, Value>, AnnotateError> {
        let len = self.objects.len();
        self.objects
            .get_mut(index)
            .and_then(Value::as_object_mut)
            .ok_or(AnnotateError::ShapeNotFound { index, len })
    }
}

/// Extract the shape list from a canvas JSON document.
///
/// Accepts either `{"objects": [...]}` or a bare array.
pub fn shapes_from_json(data: &Value) -> Result<Vec<Value>, String> {
    match data {
        Value::Array(items) => Ok(items.clone()),
        Value::Object(map) => match map.get("objects") {
            Some(Value::Array(items)) => Ok(items.clone()),
            Some(_) => Err("'objects' must be an array".to_string()),
            None => Err("expected an 'objects' array".to_string()),
        },
        _ => Err("expected a canvas object or an array of shapes".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawing_mode_parse_and_display() {
        assert_eq!("rect".parse::<DrawingMode>().unwrap(), DrawingMode::Rect);
        assert_eq!(
            "transform".parse::<DrawingMode>().unwrap(),
            DrawingMode::Transform
        );
        assert!("line".parse::<DrawingMode>().is_err());
        assert_eq!(DrawingMode::Transform.to_string(), "transform");
    }

    #[test]
    fn draw_appends_styled_rect() {
        let mut canvas = Canvas::new();
        assert_eq!(canvas.draw(1.0, 2.0, 3.0, 4.0).unwrap(), 0);
        assert_eq!(canvas.draw(5.0, 6.0, 7.0, 8.0).unwrap(), 1);
        let first = &canvas.objects()[0];
        assert_eq!(first["type"], "rect");
        assert_eq!(first["left"], 1.0);
        assert_eq!(first["height"], 4.0);
        assert_eq!(first["fill"], FILL_COLOR);
        assert_eq!(first["stroke"], STROKE_COLOR);
    }

    #[test]
    fn draw_requires_rect_mode() {
        let mut canvas = Canvas::new();
        canvas.set_mode(DrawingMode::Transform);
        assert_eq!(
            canvas.draw(0.0, 0.0, 1.0, 1.0).unwrap_err(),
            AnnotateError::WrongDrawingMode {
                required: DrawingMode::Rect
            }
        );
        assert!(canvas.is_empty());
    }

    #[test]
    fn transform_requires_transform_mode() {
        let mut canvas = Canvas::new();
        canvas.draw(0.0, 0.0, 1.0, 1.0).unwrap();
        assert!(matches!(
            canvas.move_shape(0, 5.0, 5.0),
            Err(AnnotateError::WrongDrawingMode { .. })
        ));

        canvas.set_mode(DrawingMode::Transform);
        canvas.move_shape(0, 5.0, 6.0).unwrap();
        canvas.resize_shape(0, 20.0, 30.0).unwrap();
        let obj = &canvas.objects()[0];
        assert_eq!(obj["left"], 5.0);
        assert_eq!(obj["top"], 6.0);
        assert_eq!(obj["width"], 20.0);
        assert_eq!(obj["height"], 30.0);
    }

    #[test]
    fn transform_missing_shape() {
        let mut canvas = Canvas::new();
        canvas.set_mode(DrawingMode::Transform);
        assert_eq!(
            canvas.resize_shape(3, 1.0, 1.0).unwrap_err(),
            AnnotateError::ShapeNotFound { index: 3, len: 0 }
        );
    }

    #[test]
    fn erase_and_reset() {
        let mut canvas = Canvas::new();
        canvas.draw(0.0, 0.0, 1.0, 1.0).unwrap();
        canvas.draw(1.0, 0.0, 1.0, 1.0).unwrap();
        let removed = canvas.erase(0).unwrap();
        assert_eq!(removed["left"], 0.0);
        assert_eq!(canvas.len(), 1);
        assert!(canvas.erase(5).is_err());
        canvas.reset();
        assert!(canvas.is_empty());
    }

    #[test]
    fn load_accepts_canvas_document_and_array() {
        let mut canvas = Canvas::new();
        let doc = json!({"version": "4.4.0", "objects": [{"left": 1}, {"left": 2}]});
        assert_eq!(canvas.load(&doc).unwrap(), 2);
        assert_eq!(canvas.load(&json!([{"left": 1}])).unwrap(), 1);
        assert!(canvas.load(&json!({"shapes": []})).is_err());
        assert!(canvas.load(&json!("rect")).is_err());
        assert_eq!(canvas.len(), 1);
    }

    #[test]
    fn to_json_round_trips_through_load() {
        let mut canvas = Canvas::new();
        canvas.draw(0.0, 0.0, 1.0, 1.0).unwrap();
        let mut other = Canvas::new();
        other.load(&canvas.to_json()).unwrap();
        assert_eq!(other.objects(), canvas.objects());
    }
}
