//! # Document State
//!
//! The receipt renderer plus the directory documents are saved into.

use chrono::Utc;
use std::path::{Path, PathBuf};

use clinic_core::Transaction;
use clinic_receipt::{DocumentKind, ReceiptRenderer, RenderResult};

#[derive(Debug, Clone)]
pub struct DocumentState {
    renderer: ReceiptRenderer,
    output_dir: PathBuf,
}

impl DocumentState {
    pub fn new(renderer: ReceiptRenderer, output_dir: impl Into<PathBuf>) -> Self {
        DocumentState {
            renderer,
            output_dir: output_dir.into(),
        }
    }

    pub fn renderer(&self) -> &ReceiptRenderer {
        &self.renderer
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Renders `kind` for `tx` and writes it to the output directory.
    pub async fn save(&self, kind: DocumentKind, tx: &Transaction) -> RenderResult<PathBuf> {
        let doc = self.renderer.render(kind, tx, Utc::now())?;
        doc.save_to(&self.output_dir).await
    }
}
