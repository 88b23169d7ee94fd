//! # Draw Operations
//!
//! Layout output: pages of positioned drawing operations in top-down
//! millimetre coordinates. Layout code builds these; [`crate::pdf`] paints
//! them. Keeping the two apart lets layout be inspected directly.

use crate::layout::{pdf_safe, text_width, Face, PAGE_CENTER_X};

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb8(pub u8, pub u8, pub u8);

impl Rgb8 {
    pub const BLACK: Rgb8 = Rgb8(0, 0, 0);
    pub const WHITE: Rgb8 = Rgb8(255, 255, 255);
    /// Footer gray.
    pub const GRAY: Rgb8 = Rgb8(100, 100, 100);
    /// Invoice table header fill.
    pub const HEADER_BLUE: Rgb8 = Rgb8(41, 128, 185);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Text with its left edge at `x` and baseline at `y`.
    Text {
        text: String,
        size: f32,
        x: f32,
        y: f32,
        face: Face,
        color: Rgb8,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        thickness: f32,
    },
    /// Rectangle with top-left corner at `(x, y)`.
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<Rgb8>,
        stroke: Option<f32>,
    },
    /// The letterhead logo with top-left corner at `(x, y)`.
    Logo {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

/// One page of operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// Left-aligned text.
    pub fn text(&mut self, text: &str, size: f32, x: f32, y: f32, face: Face, color: Rgb8) {
        self.ops.push(DrawOp::Text {
            text: pdf_safe(text),
            size,
            x,
            y,
            face,
            color,
        });
    }

    /// Text centered on `center_x`.
    pub fn text_centered(
        &mut self,
        text: &str,
        size: f32,
        center_x: f32,
        y: f32,
        face: Face,
        color: Rgb8,
    ) {
        let safe = pdf_safe(text);
        let x = center_x - text_width(&safe, size, face) / 2.0;
        self.text(&safe, size, x, y, face, color);
    }

    /// Text centered on the page.
    pub fn text_page_centered(&mut self, text: &str, size: f32, y: f32, face: Face, color: Rgb8) {
        self.text_centered(text, size, PAGE_CENTER_X, y, face, color);
    }

    /// Text with its right edge at `right_x`.
    pub fn text_right(&mut self, text: &str, size: f32, right_x: f32, y: f32, face: Face, color: Rgb8) {
        let safe = pdf_safe(text);
        let x = right_x - text_width(&safe, size, face);
        self.text(&safe, size, x, y, face, color);
    }

    pub fn hline(&mut self, x1: f32, x2: f32, y: f32, thickness: f32) {
        self.ops.push(DrawOp::Line {
            x1,
            y1: y,
            x2,
            y2: y,
            thickness,
        });
    }

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: Option<Rgb8>, stroke: Option<f32>) {
        self.ops.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
        });
    }

    pub fn logo(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ops.push(DrawOp::Logo {
            x,
            y,
            width,
            height,
        });
    }

    /// All text drawn on this page, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }
}

/// A top-down cursor that starts a new page when content would cross the
/// bottom limit.
#[derive(Debug)]
pub struct PageFlow {
    done: Vec<Page>,
    current: Page,
    y: f32,
    top: f32,
    bottom: f32,
}

impl PageFlow {
    /// `top` is where continuation pages start; `bottom` is the lowest y
    /// content may reach.
    pub fn new(top: f32, bottom: f32) -> Self {
        PageFlow {
            done: Vec::new(),
            current: Page::default(),
            y: top,
            top,
            bottom,
        }
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn set_y(&mut self, y: f32) {
        self.y = y;
    }

    pub fn advance(&mut self, dy: f32) {
        self.y += dy;
    }

    pub fn page(&mut self) -> &mut Page {
        &mut self.current
    }

    /// Makes room for `height` more millimetres. Returns true when a new
    /// page was started. Content taller than a whole page is placed at the
    /// top of a fresh page and allowed to overflow.
    pub fn ensure(&mut self, height: f32) -> bool {
        let at_top = self.y <= self.top;
        if self.y + height <= self.bottom || at_top {
            return false;
        }
        self.break_page();
        true
    }

    pub fn break_page(&mut self) {
        let full = std::mem::take(&mut self.current);
        self.done.push(full);
        self.y = self.top;
    }

    pub fn finish(mut self) -> Vec<Page> {
        self.done.push(self.current);
        self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_breaks_pages() {
        let mut flow = PageFlow::new(20.0, 100.0);
        for _ in 0..10 {
            flow.ensure(15.0);
            let y = flow.y();
            flow.page().hline(0.0, 10.0, y, 0.1);
            flow.advance(15.0);
        }
        let pages = flow.finish();
        // 20, 35, 50, 65, 80 fit (80 + 15 <= 100), then a new page
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].ops.len(), 5);
    }

    #[test]
    fn test_text_right_aligns() {
        let mut page = Page::default();
        page.text_right("PHP 1.00", 10.0, 190.0, 50.0, Face::Regular, Rgb8::BLACK);
        match &page.ops[0] {
            DrawOp::Text { x, text, .. } => {
                let w = text_width(text, 10.0, Face::Regular);
                assert!((x + w - 190.0).abs() < 1e-3);
            }
            other => panic!("unexpected op {:?}", other),
        }
    }

    #[test]
    fn test_text_is_made_pdf_safe() {
        let mut page = Page::default();
        page.text("CBC — Blood", 10.0, 0.0, 0.0, Face::Regular, Rgb8::BLACK);
        assert!(page.contains_text("CBC - Blood"));
    }
}
