//! # Official Receipt Layout
//!
//! A compact receipt: letterhead, customer, itemized services, pricing
//! summary, date and time. Long service lists continue on further pages.
//!
//! ```text
//!  ┌──────────────────────────────────────────┐
//!  │                 [ logo ]                 │
//!  │   Toledo Doctors & Diagnostic Center     │
//!  │             Official Receipt             │
//!  │──────────────────────────────────────────│
//!  │ Customer Name: Ana Reyes                 │
//!  │ Services:                                │
//!  │    CBC - Complete blood count  PHP 500.00│
//!  │    Chest X-Ray - PA view       PHP 300.00│
//!  │ Subtotal:                      PHP 800.00│
//!  │ Discount (10%):                -PHP 80.00│
//!  │ Total Price:                   PHP 720.00│
//!  │ Date: 03/05/2026                         │
//!  │ Time: 02:30 PM                           │
//!  │──────────────────────────────────────────│
//!  │   Thank you for trusting our services!   │
//!  └──────────────────────────────────────────┘
//! ```

use chrono::FixedOffset;
use clinic_core::types::Transaction;

use crate::document::{Page, PageFlow, Rgb8};
use crate::format::{pdf_deduction, pdf_money, short_date, short_time};
use crate::layout::{line_height, wrap_text, Face, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use crate::letterhead::Letterhead;
use crate::LOGO_Y;

const LEFT: f32 = 10.0;
const RIGHT: f32 = 200.0;
const ITEM_INDENT: f32 = 15.0;
/// Room kept between a line label and its right-aligned price.
const PRICE_GUTTER: f32 = 45.0;
const BODY_SIZE: f32 = 10.0;
const RULE: f32 = 0.2;

const CONTINUATION_TOP: f32 = 20.0;
/// Lowest y the body may reach; the footer band sits below.
const CONTENT_BOTTOM: f32 = PAGE_HEIGHT_MM - 28.0;
const FOOTER_RULE_Y: f32 = PAGE_HEIGHT_MM - 22.0;
const FOOTER_TEXT_Y: f32 = PAGE_HEIGHT_MM - 14.0;

const THANKS: &str = "Thank you for trusting our services!";

pub fn layout_receipt(
    tx: &Transaction,
    letterhead: &Letterhead,
    offset: FixedOffset,
    logo_size: Option<(f32, f32)>,
) -> Vec<Page> {
    let mut flow = PageFlow::new(CONTINUATION_TOP, CONTENT_BOTTOM);

    // Heading baseline sits below the logo when there is one.
    let y = match logo_size {
        Some((w, h)) => {
            flow.page().logo((PAGE_WIDTH_MM - w) / 2.0, LOGO_Y, w, h);
            (LOGO_Y + h + 8.0).max(40.0)
        }
        None => 25.0,
    };

    let page = flow.page();
    page.text_page_centered(&letterhead.name, 16.0, y, Face::Bold, Rgb8::BLACK);
    page.text_page_centered(&letterhead.receipt_title, 12.0, y + 7.0, Face::Regular, Rgb8::BLACK);
    page.hline(LEFT, RIGHT, y + 14.0, RULE);

    let customer = if tx.customer_name.trim().is_empty() {
        "-"
    } else {
        tx.customer_name.as_str()
    };
    page.text(
        &format!("Customer Name: {}", customer),
        BODY_SIZE,
        LEFT,
        y + 22.0,
        Face::Regular,
        Rgb8::BLACK,
    );
    page.text("Services:", BODY_SIZE, LEFT, y + 29.0, Face::Regular, Rgb8::BLACK);
    flow.set_y(y + 35.0);

    let lh = line_height(BODY_SIZE);
    let label_width = RIGHT - ITEM_INDENT - PRICE_GUTTER;
    for line in &tx.lines {
        let wrapped = wrap_text(&line.label(), label_width, BODY_SIZE, Face::Regular);
        let height = wrapped.len() as f32 * lh + 2.0;
        flow.ensure(height);

        let top = flow.y();
        let page = flow.page();
        for (i, text) in wrapped.iter().enumerate() {
            page.text(text, BODY_SIZE, ITEM_INDENT, top + i as f32 * lh, Face::Regular, Rgb8::BLACK);
        }
        page.text_right(&pdf_money(line.price()), BODY_SIZE, RIGHT, top, Face::Regular, Rgb8::BLACK);
        flow.advance(height);
    }

    let b = tx.breakdown();
    let mut summary: Vec<(String, String, Face)> = vec![(
        "Subtotal:".to_string(),
        pdf_money(b.subtotal),
        Face::Regular,
    )];
    if b.has_discount() {
        summary.push((
            format!("Discount ({}):", b.discount_rate),
            pdf_deduction(b.discount_amount),
            Face::Regular,
        ));
    }
    summary.push(("Total Price:".to_string(), pdf_money(b.total), Face::Bold));
    summary.push((
        format!("Date: {}", short_date(tx.finished_at, offset)),
        String::new(),
        Face::Regular,
    ));
    summary.push((
        format!("Time: {}", short_time(tx.finished_at, offset)),
        String::new(),
        Face::Regular,
    ));

    flow.advance(4.0);
    for (label, amount, face) in &summary {
        flow.ensure(7.0);
        let y = flow.y();
        let page = flow.page();
        page.text(label, BODY_SIZE, LEFT, y, *face, Rgb8::BLACK);
        if !amount.is_empty() {
            page.text_right(amount, BODY_SIZE, RIGHT, y, *face, Rgb8::BLACK);
        }
        flow.advance(7.0);
    }

    let mut pages = flow.finish();
    for page in &mut pages {
        page.hline(LEFT, RIGHT, FOOTER_RULE_Y, RULE);
        page.text_page_centered(THANKS, BODY_SIZE, FOOTER_TEXT_Y, Face::Regular, Rgb8::BLACK);
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DrawOp;
    use crate::invoice::tests::transaction;

    fn manila() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    #[test]
    fn test_receipt_contents() {
        let pages = layout_receipt(&transaction(2, 1_000), &Letterhead::default(), manila(), None);
        assert_eq!(pages.len(), 1);

        let page = &pages[0];
        assert!(page.contains_text("Toledo Doctors & Diagnostic Center"));
        assert!(page.contains_text("Official Receipt"));
        assert!(page.contains_text("Customer Name: Ana Reyes"));
        assert!(page.contains_text("Service 1 - Routine"));
        assert!(page.contains_text("Discount (10%):"));
        assert!(page.contains_text("PHP 180.00"));
        assert!(page.contains_text("Date: 03/05/2026"));
        assert!(page.contains_text("Time: 02:30 PM"));
        assert!(page.contains_text(THANKS));
    }

    #[test]
    fn test_receipt_without_discount() {
        let pages = layout_receipt(&transaction(1, 0), &Letterhead::default(), manila(), None);
        assert!(!pages[0].contains_text("Discount"));
        assert!(pages[0].contains_text("Total Price:"));
    }

    #[test]
    fn test_many_services_continue_on_next_page() {
        let pages = layout_receipt(&transaction(80, 0), &Letterhead::default(), manila(), None);
        assert!(pages.len() > 1);

        for page in &pages {
            for op in &page.ops {
                if let DrawOp::Text { text, y, .. } = op {
                    if text != THANKS {
                        assert!(*y < FOOTER_RULE_Y);
                    }
                }
            }
        }
    }

    #[test]
    fn test_footer_on_every_page() {
        let pages = layout_receipt(&transaction(80, 0), &Letterhead::default(), manila(), None);
        assert!(pages.len() > 1);

        for page in &pages {
            assert!(page.contains_text(THANKS));
            assert!(page
                .ops
                .iter()
                .any(|op| matches!(op, DrawOp::Line { y1, .. } if (*y1 - FOOTER_RULE_Y).abs() < 1e-3)));
        }
    }

    #[test]
    fn test_logo_placed_when_available() {
        let pages = layout_receipt(
            &transaction(1, 0),
            &Letterhead::default(),
            manila(),
            Some((40.0, 20.0)),
        );
        assert!(pages[0]
            .ops
            .iter()
            .any(|op| matches!(op, DrawOp::Logo { x, .. } if (*x - 85.0).abs() < 1e-3)));
    }
}
