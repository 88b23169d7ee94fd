//! # clinic-receipt: Invoice & Receipt Rendering
//!
//! Renders committed transactions as PDF documents.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Transaction ──► layout (invoice.rs / receipt.rs) ──► Vec<Page>         │
//! │                       │                                   │             │
//! │                       │ uses                              ▼             │
//! │                  layout.rs  (A4, Helvetica widths)    pdf.rs (printpdf) │
//! │                  format.rs  (PHP amounts, names)          │             │
//! │                                                           ▼             │
//! │                                              RenderedDocument (bytes)   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`renderer`] - `ReceiptRenderer`, the entry point
//! - [`invoice`] - Paginated invoice layout
//! - [`receipt`] - Official receipt layout
//! - [`document`] - Draw operations and page flow
//! - [`layout`] - Page metrics and text measurement
//! - [`format`] - Amounts, dates and file names
//! - [`logo`] - Best-effort logo loading
//! - [`pdf`] - printpdf painter
//!
//! ## Usage
//!
//! ```rust,ignore
//! use clinic_receipt::{Letterhead, ReceiptRenderer};
//!
//! let renderer = ReceiptRenderer::load(Letterhead::default(), offset, logo_path).await;
//! let doc = renderer.render_invoice(&tx, Utc::now())?;
//! doc.save_to(&output_dir).await?;
//! ```

pub mod document;
pub mod error;
pub mod format;
pub mod invoice;
pub mod layout;
pub mod letterhead;
pub mod logo;
pub mod pdf;
pub mod receipt;
pub mod renderer;

pub use error::{RenderError, RenderResult};
pub use letterhead::Letterhead;
pub use logo::Logo;
pub use renderer::{DocumentKind, ReceiptRenderer, RenderedDocument};

/// Logo top edge.
pub(crate) const LOGO_Y: f32 = 10.0;
/// Logo drawn width.
pub(crate) const LOGO_WIDTH: f32 = 40.0;
/// Tall logos are scaled down to this height.
pub(crate) const LOGO_MAX_HEIGHT: f32 = 30.0;
