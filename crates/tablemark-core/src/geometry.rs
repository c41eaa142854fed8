use std::fmt;

/// Axis-aligned box in page-image pixel coordinates.
///
/// Coordinates use a top-left origin:
/// - `left`: x-offset of the left edge
/// - `top`: y-offset of the top edge (distance from top of image)
/// - `width`, `height`: extents, never negative for boxes built by the store
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl BBox {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge (`left + width`).
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge (`top + height`).
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Overlap of two boxes, or `None` unless it has strictly positive area.
    ///
    /// Boxes that only share an edge or a corner do not intersect.
    pub fn intersection(&self, other: &BBox) -> Option<BBox> {
        let x1 = self.left.max(other.left);
        let y1 = self.top.max(other.top);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        if x1 < x2 && y1 < y2 {
            Some(BBox::new(x1, y1, x2 - x1, y2 - y1))
        } else {
            None
        }
    }
}

/// Formats as the cell descriptor `(x,y,w,h)`.
impl fmt::Display for BBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{},{},{})",
            self.left, self.top, self.width, self.height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_new() {
        let bbox = BBox::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(bbox.left, 10.0);
        assert_eq!(bbox.top, 20.0);
        assert_eq!(bbox.width, 30.0);
        assert_eq!(bbox.height, 40.0);
    }

    #[test]
    fn test_bbox_edges() {
        let bbox = BBox::new(10.0, 20.0, 40.0, 5.0);
        assert_eq!(bbox.right(), 50.0);
        assert_eq!(bbox.bottom(), 25.0);
        assert_eq!(bbox.area(), 200.0);
    }

    #[test]
    fn test_intersection_overlap() {
        let column = BBox::new(0.0, 0.0, 10.0, 100.0);
        let row = BBox::new(0.0, 0.0, 100.0, 10.0);
        assert_eq!(
            column.intersection(&row),
            Some(BBox::new(0.0, 0.0, 10.0, 10.0))
        );
    }

    #[test]
    fn test_intersection_is_symmetric() {
        let a = BBox::new(5.0, 5.0, 20.0, 20.0);
        let b = BBox::new(15.0, 0.0, 30.0, 10.0);
        assert_eq!(a.intersection(&b), b.intersection(&a));
        assert_eq!(a.intersection(&b), Some(BBox::new(15.0, 5.0, 10.0, 5.0)));
    }

    #[test]
    fn test_touching_edge_is_not_intersection() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BBox::new(10.0, 0.0, 10.0, 10.0);
        assert_eq!(a.intersection(&b), None);

        let below = BBox::new(0.0, 10.0, 10.0, 10.0);
        assert_eq!(a.intersection(&below), None);
    }

    #[test]
    fn test_touching_corner_is_not_intersection() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BBox::new(10.0, 10.0, 5.0, 5.0);
        assert_eq!(a.intersection(&b), None);
    }

    #[test]
    fn test_zero_area_never_intersects() {
        let line = BBox::new(5.0, 0.0, 0.0, 100.0);
        let row = BBox::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(line.intersection(&row), None);
    }

    #[test]
    fn test_disjoint() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BBox::new(50.0, 50.0, 10.0, 10.0);
        assert_eq!(a.intersection(&b), None);
    }

    #[test]
    fn test_contained() {
        let outer = BBox::new(0.0, 0.0, 100.0, 100.0);
        let inner = BBox::new(10.5, 20.25, 5.0, 5.0);
        assert_eq!(outer.intersection(&inner), Some(inner));
    }

    #[test]
    fn test_display_descriptor() {
        assert_eq!(BBox::new(0.0, 0.0, 10.0, 10.0).to_string(), "(0,0,10,10)");
        assert_eq!(BBox::new(1.5, 2.0, 3.25, 4.0).to_string(), "(1.5,2,3.25,4)");
    }
}
