//! # Invoice Layout
//!
//! The paginated invoice: letterhead, transaction details, a two-column
//! service table with pricing summary rows, and a footer on every page.
//!
//! ```text
//!  ┌──────────────────────────────────────────┐
//!  │                 [ logo ]                 │
//!  │             Clinic Name (22pt)           │
//!  │          address / contact (12pt)        │
//!  │                                          │
//!  │               INVOICE (18pt)             │
//!  │  Receipt #: ...                          │
//!  │  Date: ...                               │
//!  │  Customer: ...                           │
//!  │ ┌──────────────────────────┬───────────┐ │
//!  │ │         Service          │   Price   │ │ ← repeated on each page
//!  │ ├──────────────────────────┼───────────┤ │
//!  │ │ CBC - Complete blood...  │ PHP 500.00│ │
//!  │ │ SUBTOTAL                 │ PHP 800.00│ │
//!  │ │ DISCOUNT (10%)           │-PHP 80.00 │ │ ← only when discounted
//!  │ │ TOTAL                    │ PHP 720.00│ │
//!  │ └──────────────────────────┴───────────┘ │
//!  │       Thank you for your business!       │ ← every page
//!  │ For any inquiries, please contact ...    │
//!  └──────────────────────────────────────────┘
//! ```

use chrono::FixedOffset;
use clinic_core::types::Transaction;

use crate::document::{Page, PageFlow, Rgb8};
use crate::format::{long_timestamp, pdf_deduction, pdf_money};
use crate::layout::{ascent, line_height, wrap_text, Face, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use crate::letterhead::Letterhead;
use crate::LOGO_Y;

const MARGIN_X: f32 = 20.0;
const TABLE_WIDTH: f32 = 170.0;
const PRICE_COL_WIDTH: f32 = 50.0;
const SERVICE_COL_WIDTH: f32 = TABLE_WIDTH - PRICE_COL_WIDTH;
const CELL_PADDING: f32 = 3.0;
const GRID_LINE: f32 = 0.1;
const BODY_SIZE: f32 = 10.0;

/// Where continuation pages start.
const CONTINUATION_TOP: f32 = 20.0;
/// Lowest y the table may reach; the footer sits below.
const CONTENT_BOTTOM: f32 = PAGE_HEIGHT_MM - 28.0;

const FOOTER_LINES: [(&str, f32); 2] = [
    ("Thank you for your business!", PAGE_HEIGHT_MM - 20.0),
    ("For any inquiries, please contact our office.", PAGE_HEIGHT_MM - 15.0),
];

/// Lays out an invoice. `logo_size` is the drawn size in mm, if a logo is
/// available.
pub fn layout_invoice(
    tx: &Transaction,
    letterhead: &Letterhead,
    offset: FixedOffset,
    logo_size: Option<(f32, f32)>,
) -> Vec<Page> {
    let mut flow = PageFlow::new(CONTINUATION_TOP, CONTENT_BOTTOM);

    draw_header(&mut flow, tx, letterhead, offset, logo_size);

    draw_header_row(&mut flow);

    for line in &tx.lines {
        let price = pdf_money(line.price());
        draw_row(&mut flow, &line.label(), &price, Face::Regular);
    }

    let b = tx.breakdown();
    draw_row(&mut flow, "SUBTOTAL", &pdf_money(b.subtotal), Face::Bold);
    if b.has_discount() {
        draw_row(
            &mut flow,
            &format!("DISCOUNT ({})", b.discount_rate),
            &pdf_deduction(b.discount_amount),
            Face::Bold,
        );
    }
    draw_row(&mut flow, "TOTAL", &pdf_money(b.total), Face::Bold);

    let mut pages = flow.finish();
    for page in &mut pages {
        for (text, y) in FOOTER_LINES {
            page.text_page_centered(text, BODY_SIZE, y, Face::Regular, Rgb8::GRAY);
        }
    }
    pages
}

fn draw_header(
    flow: &mut PageFlow,
    tx: &Transaction,
    letterhead: &Letterhead,
    offset: FixedOffset,
    logo_size: Option<(f32, f32)>,
) {
    // Name baseline sits below the logo when there is one.
    let mut y: f32 = 23.0;
    if let Some((w, h)) = logo_size {
        flow.page().logo((PAGE_WIDTH_MM - w) / 2.0, LOGO_Y, w, h);
        y = y.max(LOGO_Y + h + 9.0);
    }

    let page = flow.page();
    page.text_page_centered(&letterhead.name, 22.0, y, Face::Regular, Rgb8::BLACK);
    y += 7.0;
    for detail in letterhead.detail_lines() {
        page.text_page_centered(detail, 12.0, y, Face::Regular, Rgb8::BLACK);
        y += 6.0;
    }

    y += 12.0;
    page.text_page_centered("INVOICE", 18.0, y, Face::Regular, Rgb8::BLACK);

    y += 15.0;
    let details = [
        format!("Receipt #: {}", tx.id),
        format!("Date: {}", long_timestamp(tx.finished_at, offset)),
        format!("Customer: {}", tx.customer_name),
    ];
    for detail in &details {
        page.text(detail, BODY_SIZE, MARGIN_X, y, Face::Regular, Rgb8::BLACK);
        y += 5.0;
    }

    flow.set_y(y + 5.0);
}

fn one_line_row_height() -> f32 {
    line_height(BODY_SIZE) + 2.0 * CELL_PADDING
}

fn draw_header_row(flow: &mut PageFlow) {
    let height = one_line_row_height();
    let top = flow.y();
    let baseline = top + CELL_PADDING + ascent(BODY_SIZE);
    let page = flow.page();

    page.rect(MARGIN_X, top, SERVICE_COL_WIDTH, height, Some(Rgb8::HEADER_BLUE), Some(GRID_LINE));
    page.rect(
        MARGIN_X + SERVICE_COL_WIDTH,
        top,
        PRICE_COL_WIDTH,
        height,
        Some(Rgb8::HEADER_BLUE),
        Some(GRID_LINE),
    );
    page.text_centered(
        "Service",
        BODY_SIZE,
        MARGIN_X + SERVICE_COL_WIDTH / 2.0,
        baseline,
        Face::Bold,
        Rgb8::WHITE,
    );
    page.text_centered(
        "Price",
        BODY_SIZE,
        MARGIN_X + SERVICE_COL_WIDTH + PRICE_COL_WIDTH / 2.0,
        baseline,
        Face::Bold,
        Rgb8::WHITE,
    );

    flow.advance(height);
}

fn draw_row(flow: &mut PageFlow, label: &str, amount: &str, face: Face) {
    let lines = wrap_text(label, SERVICE_COL_WIDTH - 2.0 * CELL_PADDING, BODY_SIZE, face);
    let lh = line_height(BODY_SIZE);
    let height = lines.len() as f32 * lh + 2.0 * CELL_PADDING;

    if flow.ensure(height) {
        draw_header_row(flow);
    }

    let top = flow.y();
    let first_baseline = top + CELL_PADDING + ascent(BODY_SIZE);
    let page = flow.page();

    page.rect(MARGIN_X, top, SERVICE_COL_WIDTH, height, None, Some(GRID_LINE));
    page.rect(MARGIN_X + SERVICE_COL_WIDTH, top, PRICE_COL_WIDTH, height, None, Some(GRID_LINE));

    for (i, text) in lines.iter().enumerate() {
        page.text(
            text,
            BODY_SIZE,
            MARGIN_X + CELL_PADDING,
            first_baseline + i as f32 * lh,
            face,
            Rgb8::BLACK,
        );
    }
    page.text_right(
        amount,
        BODY_SIZE,
        MARGIN_X + TABLE_WIDTH - CELL_PADDING,
        first_baseline,
        face,
        Rgb8::BLACK,
    );

    flow.advance(height);
}

// =============================================================================
// Unit Tests
// =============================================================================
