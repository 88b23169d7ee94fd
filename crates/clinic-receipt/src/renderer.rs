//! # Receipt Renderer
//!
//! Entry point: transaction in, named PDF bytes out.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ReceiptRenderer::load(letterhead, offset, logo_path)                   │
//! │       │   logo failure → warn!, continue without it                     │
//! │       ▼                                                                 │
//! │  render_invoice(tx, now) / render_receipt(tx)                           │
//! │       │                                                                 │
//! │       ├── layout_*()  → Vec<Page>       (pure)                          │
//! │       ├── pdf::paint() → bytes          (printpdf)                      │
//! │       └── file name from customer / id / timestamp                      │
//! │       ▼                                                                 │
//! │  RenderedDocument { file_name, bytes } ──► save_to(dir)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rendering runs after the transaction is committed and never touches the
//! store, so a render failure cannot undo a sale.

use chrono::{DateTime, FixedOffset, Utc};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

use crate::document::Page;
use crate::error::RenderResult;
use crate::format::{invoice_file_name, receipt_file_name};
use crate::invoice::layout_invoice;
use crate::letterhead::Letterhead;
use crate::logo::Logo;
use crate::pdf;
use crate::receipt::layout_receipt;
use crate::{LOGO_MAX_HEIGHT, LOGO_WIDTH};
use clinic_core::types::Transaction;

/// Which document to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentKind {
    /// Paginated invoice table.
    #[default]
    Invoice,
    /// Compact official receipt.
    Receipt,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Invoice => write!(f, "invoice"),
            DocumentKind::Receipt => write!(f, "receipt"),
        }
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "invoice" => Ok(DocumentKind::Invoice),
            "receipt" => Ok(DocumentKind::Receipt),
            other => Err(format!("unknown document kind '{}'", other)),
        }
    }
}

/// A finished document ready to be written.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

impl RenderedDocument {
    /// Writes the document into `dir` (created if missing) and returns the
    /// full path.
    pub async fn save_to(&self, dir: &Path) -> RenderResult<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(&self.file_name);
        tokio::fs::write(&path, &self.bytes).await?;

        info!(path = %path.display(), bytes = self.bytes.len(), "Document saved");
        Ok(path)
    }
}

/// Renders invoices and receipts for one clinic.
#[derive(Debug, Clone)]
pub struct ReceiptRenderer {
    letterhead: Letterhead,
    offset: FixedOffset,
    logo: Option<Logo>,
}

impl ReceiptRenderer {
    pub fn new(letterhead: Letterhead, offset: FixedOffset) -> Self {
        ReceiptRenderer {
            letterhead,
            offset,
            logo: None,
        }
    }

    /// Builds a renderer, loading the logo if one is configured.
    pub async fn load(letterhead: Letterhead, offset: FixedOffset, logo_path: Option<&Path>) -> Self {
        let logo = Logo::load_optional(logo_path).await;
        ReceiptRenderer::new(letterhead, offset).with_logo(logo)
    }

    pub fn with_logo(mut self, logo: Option<Logo>) -> Self {
        self.logo = logo;
        self
    }

    pub fn has_logo(&self) -> bool {
        self.logo.is_some()
    }

    pub fn letterhead(&self) -> &Letterhead {
        &self.letterhead
    }

    fn logo_size(&self) -> Option<(f32, f32)> {
        self.logo.as_ref().map(|l| l.fit(LOGO_WIDTH, LOGO_MAX_HEIGHT))
    }

    /// Renders the paginated invoice. `generated_at` stamps the file name.
    pub fn render_invoice(
        &self,
        tx: &Transaction,
        generated_at: DateTime<Utc>,
    ) -> RenderResult<RenderedDocument> {
        let pages = layout_invoice(tx, &self.letterhead, self.offset, self.logo_size());
        self.finish(
            &format!("Invoice {}", tx.id),
            pages,
            invoice_file_name(&tx.id, generated_at),
        )
    }

    /// Renders the official receipt.
    pub fn render_receipt(&self, tx: &Transaction) -> RenderResult<RenderedDocument> {
        let pages = layout_receipt(tx, &self.letterhead, self.offset, self.logo_size());
        self.finish(
            &format!("Receipt {}", tx.id),
            pages,
            receipt_file_name(&tx.customer_name, &tx.id),
        )
    }

    pub fn render(
        &self,
        kind: DocumentKind,
        tx: &Transaction,
        now: DateTime<Utc>,
    ) -> RenderResult<RenderedDocument> {
        match kind {
            DocumentKind::Invoice => self.render_invoice(tx, now),
            DocumentKind::Receipt => self.render_receipt(tx),
        }
    }

    fn finish(&self, title: &str, pages: Vec<Page>, file_name: String) -> RenderResult<RenderedDocument> {
        let bytes = pdf::paint(title, &pages, self.logo.as_ref())?;
        debug!(file = %file_name, pages = pages.len(), bytes = bytes.len(), "Document rendered");

        Ok(RenderedDocument {
            file_name,
            bytes,
            page_count: pages.len(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::tests::transaction;
    use crate::logo::tests::png_bytes;
    use chrono::TimeZone;

    fn renderer() -> ReceiptRenderer {
        ReceiptRenderer::new(Letterhead::default(), FixedOffset::east_opt(8 * 3600).unwrap())
    }

    #[test]
    fn test_render_invoice() {
        let now = Utc.timestamp_millis_opt(1_770_000_000_000).unwrap();
        let doc = renderer().render_invoice(&transaction(3, 500), now).unwrap();

        assert!(doc.bytes.starts_with(b"%PDF-"));
        assert_eq!(doc.page_count, 1);
        assert_eq!(doc.file_name, "invoice-tx-1-1770000000000.pdf");
    }

    #[test]
    fn test_render_receipt() {
        let doc = renderer().render_receipt(&transaction(1, 0)).unwrap();
        assert!(doc.bytes.starts_with(b"%PDF-"));
        assert_eq!(doc.file_name, "receipt-Ana_Reyes-tx-1.pdf");
    }

    #[test]
    fn test_render_long_invoice_has_pages() {
        let doc = renderer()
            .render(DocumentKind::Invoice, &transaction(60, 0), Utc::now())
            .unwrap();
        assert!(doc.page_count > 1);
    }

    #[tokio::test]
    async fn test_missing_logo_still_renders() {
        let r = ReceiptRenderer::load(
            Letterhead::default(),
            FixedOffset::east_opt(0).unwrap(),
            Some(Path::new("/no/such/logo.png")),
        )
        .await;
        assert!(!r.has_logo());
        assert!(r.render_receipt(&transaction(1, 0)).is_ok());
    }

    #[tokio::test]
    async fn test_logo_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let logo_path = dir.path().join("logo.png");
        std::fs::write(&logo_path, png_bytes(32, 16)).unwrap();

        let r = ReceiptRenderer::load(
            Letterhead::default(),
            FixedOffset::east_opt(0).unwrap(),
            Some(&logo_path),
        )
        .await;
        assert!(r.has_logo());

        let doc = r.render_invoice(&transaction(2, 0), Utc::now()).unwrap();
        let out = dir.path().join("out");
        let path = doc.save_to(&out).await.unwrap();

        let written = std::fs::read(&path).unwrap();
        assert_eq!(written, doc.bytes);
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("Receipt".parse::<DocumentKind>().unwrap(), DocumentKind::Receipt);
        assert!("memo".parse::<DocumentKind>().is_err());
    }
}
