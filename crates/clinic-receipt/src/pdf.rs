//! # PDF Painter
//!
//! Paints laid-out [`Page`]s with printpdf using the builtin Helvetica
//! faces, so no font files ship with the application.

use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Rect, Rgb,
};
use std::io::BufWriter;

use crate::document::{DrawOp, Page, Rgb8};
use crate::error::{RenderError, RenderResult};
use crate::layout::{Face, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use crate::logo::Logo;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn load(doc: &PdfDocumentReference) -> RenderResult<Self> {
        Ok(Fonts {
            regular: doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(|e| RenderError::Pdf(e.to_string()))?,
            bold: doc
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(|e| RenderError::Pdf(e.to_string()))?,
        })
    }

    fn face(&self, face: Face) -> &IndirectFontRef {
        match face {
            Face::Regular => &self.regular,
            Face::Bold => &self.bold,
        }
    }
}

fn color(c: Rgb8) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(c.0) / 255.0,
        f32::from(c.1) / 255.0,
        f32::from(c.2) / 255.0,
        None,
    ))
}

/// Converts a top-down y to PDF's bottom-up y.
fn flip(y: f32) -> Mm {
    Mm(PAGE_HEIGHT_MM - y)
}

/// Paints `pages` into a PDF and returns its bytes.
pub fn paint(title: &str, pages: &[Page], logo: Option<&Logo>) -> RenderResult<Vec<u8>> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let fonts = Fonts::load(&doc)?;

    for (index, page) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (p, l) = doc.add_page(
                Mm(PAGE_WIDTH_MM),
                Mm(PAGE_HEIGHT_MM),
                format!("Page {}", index + 1),
            );
            doc.get_page(p).get_layer(l)
        };
        paint_page(&layer, &fonts, page, logo);
    }

    let mut writer = BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    writer
        .into_inner()
        .map_err(|e| RenderError::Pdf(e.to_string()))
}

fn paint_page(layer: &PdfLayerReference, fonts: &Fonts, page: &Page, logo: Option<&Logo>) {
    for op in &page.ops {
        match op {
            DrawOp::Text {
                text,
                size,
                x,
                y,
                face,
                color: c,
            } => {
                layer.set_fill_color(color(*c));
                layer.use_text(text.as_str(), *size, Mm(*x), flip(*y), fonts.face(*face));
            }
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                thickness,
            } => {
                layer.set_outline_color(color(Rgb8::BLACK));
                layer.set_outline_thickness(thickness * 72.0 / 25.4);
                layer.add_line(Line {
                    points: vec![
                        (Point::new(Mm(*x1), flip(*y1)), false),
                        (Point::new(Mm(*x2), flip(*y2)), false),
                    ],
                    is_closed: false,
                });
            }
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                fill,
                stroke,
            } => {
                let rect = Rect::new(Mm(*x), flip(y + height), Mm(x + width), flip(*y));
                if let Some(fill) = fill {
                    layer.set_fill_color(color(*fill));
                    layer.add_rect(rect.clone().with_mode(PaintMode::Fill));
                }
                if let Some(thickness) = stroke {
                    layer.set_outline_color(color(Rgb8::BLACK));
                    layer.set_outline_thickness(thickness * 72.0 / 25.4);
                    layer.add_rect(rect.with_mode(PaintMode::Stroke));
                }
            }
            DrawOp::Logo {
                x,
                y,
                width,
                height,
            } => {
                if let Some(logo) = logo {
                    let (px_w, _) = logo.pixel_size();
                    let dpi = px_w as f32 * 25.4 / width;
                    Image::from_dynamic_image(logo.image()).add_to_layer(
                        layer.clone(),
                        ImageTransform {
                            translate_x: Some(Mm(*x)),
                            translate_y: Some(flip(y + height)),
                            dpi: Some(dpi),
                            ..Default::default()
                        },
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_produces_pdf() {
        let mut page = Page::default();
        page.text("Hello", 12.0, 20.0, 20.0, Face::Regular, Rgb8::BLACK);
        page.hline(10.0, 200.0, 30.0, 0.2);
        page.rect(20.0, 40.0, 170.0, 10.0, Some(Rgb8::HEADER_BLUE), Some(0.1));

        let bytes = paint("Test", &[page.clone(), page], None).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_paint_with_logo() {
        let logo = Logo::from_bytes(&crate::logo::tests::png_bytes(16, 8)).unwrap();
        let mut page = Page::default();
        page.logo(85.0, 10.0, 40.0, 20.0);

        let bytes = paint("Logo", &[page], Some(&logo)).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }
}
