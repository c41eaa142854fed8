//! SVG rendering of annotations for visual checking.
//!
//! Produces an SVG document the size of the page image showing the page
//! boundary, the column and row rectangles, and the cells of an
//! intersection matrix. Coordinates are page-image pixels with a top-left
//! origin, the same system the rectangles are drawn in.

use std::fmt::Write;

use crate::geometry::BBox;
use crate::intersection::IntersectionMatrix;
use crate::shape::Rectangle;

/// Options for SVG generation.
#[derive(Debug, Clone)]
pub struct SvgOptions {
    /// Scale factor for the SVG output. Default is `1.0`.
    pub scale: f64,
    /// Draw matrix cells. Default is `true`.
    pub show_cells: bool,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            show_cells: true,
        }
    }
}

/// Stroke and fill for one kind of box.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawStyle {
    pub stroke: &'static str,
    pub fill: &'static str,
    pub fill_opacity: f64,
    pub stroke_width: f64,
}

impl DrawStyle {
    pub fn columns_default() -> Self {
        Self {
            stroke: "blue",
            fill: "blue",
            fill_opacity: 0.1,
            stroke_width: 1.0,
        }
    }

    pub fn rows_default() -> Self {
        Self {
            stroke: "red",
            fill: "red",
            fill_opacity: 0.1,
            stroke_width: 1.0,
        }
    }

    pub fn cells_default() -> Self {
        Self {
            stroke: "green",
            fill: "green",
            fill_opacity: 0.3,
            stroke_width: 0.5,
        }
    }
}

/// Renders annotations on a page-sized canvas.
pub struct AnnotationSvg {
    width: f64,
    height: f64,
    body: String,
}

impl AnnotationSvg {
    /// Create a renderer for a page image of the given pixel size.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            body: String::new(),
        }
    }

    pub fn draw_columns(&mut self, rects: &[Rectangle]) {
        self.draw_group(
            "columns",
            rects.iter().map(Rectangle::bbox),
            &DrawStyle::columns_default(),
        );
    }

    pub fn draw_rows(&mut self, rects: &[Rectangle]) {
        self.draw_group(
            "rows",
            rects.iter().map(Rectangle::bbox),
            &DrawStyle::rows_default(),
        );
    }

    pub fn draw_cells(&mut self, matrix: &IntersectionMatrix) {
        self.draw_group(
            "cells",
            matrix.boxes().map(|(_, _, b)| *b),
            &DrawStyle::cells_default(),
        );
    }

    fn draw_group(&mut self, class: &str, boxes: impl Iterator<Item = BBox>, style: &DrawStyle) {
        let _ = writeln!(
            self.body,
            "  <g class=\"{class}\" stroke=\"{}\" stroke-width=\"{}\" fill=\"{}\" fill-opacity=\"{}\">",
            style.stroke, style.stroke_width, style.fill, style.fill_opacity
        );
        for b in boxes {
            let _ = writeln!(
                self.body,
                "    <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"/>",
                b.left, b.top, b.width, b.height
            );
        }
        self.body.push_str("  </g>\n");
    }

    /// Generate the SVG document.
    pub fn to_svg(&self, options: &SvgOptions) -> String {
        let view_width = self.width;
        let view_height = self.height;
        let svg_width = self.width * options.scale;
        let svg_height = self.height * options.scale;

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" \
             width=\"{svg_width}\" height=\"{svg_height}\" \
             viewBox=\"0 0 {view_width} {view_height}\">"
        );

        // Page boundary
        let _ = writeln!(
            svg,
            "  <rect x=\"0\" y=\"0\" width=\"{view_width}\" height=\"{view_height}\" \
             fill=\"white\" stroke=\"black\" stroke-width=\"0.5\"/>"
        );

        svg.push_str(&self.body);
        svg.push_str("</svg>\n");
        svg
    }
}

/// Render columns, rows and optionally a matrix in one call.
pub fn render_annotations(
    width: f64,
    height: f64,
    columns: &[Rectangle],
    rows: &[Rectangle],
    matrix: Option<&IntersectionMatrix>,
    options: &SvgOptions,
) -> String {
    let mut renderer = AnnotationSvg::new(width, height);
    renderer.draw_columns(columns);
    renderer.draw_rows(rows);
    if options.show_cells {
        if let Some(m) = matrix {
            renderer.draw_cells(m);
        }
    }
    renderer.to_svg(options)
}
