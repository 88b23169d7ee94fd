//! # Letterhead Logo
//!
//! Loads the clinic logo for embedding. Loading is best-effort: any failure
//! is logged and the document renders without a logo.
//!
//! ```text
//!   logo path ──► tokio::fs::read ──► spawn_blocking(decode) ──► RGB8
//!        │               │                    │
//!        └── None ───────┴── error ───────────┴──► warn!, no logo
//! ```

use image::DynamicImage;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{RenderError, RenderResult};

/// A decoded logo, flattened to RGB (PDF images here carry no alpha).
#[derive(Debug, Clone)]
pub struct Logo {
    image: DynamicImage,
}

impl Logo {
    /// Decodes PNG or JPEG bytes.
    pub fn from_bytes(bytes: &[u8]) -> RenderResult<Self> {
        let decoded =
            image::load_from_memory(bytes).map_err(|e| RenderError::Image(e.to_string()))?;
        if decoded.width() == 0 || decoded.height() == 0 {
            return Err(RenderError::Image("empty image".to_string()));
        }

        Ok(Logo {
            image: DynamicImage::ImageRgb8(decoded.to_rgb8()),
        })
    }

    /// Reads and decodes a logo file without blocking the runtime.
    pub async fn load(path: &Path) -> RenderResult<Self> {
        let bytes = tokio::fs::read(path).await?;
        tokio::task::spawn_blocking(move || Logo::from_bytes(&bytes))
            .await
            .map_err(|e| RenderError::Image(e.to_string()))?
    }

    /// Best-effort load. Returns `None` (and logs) on any failure.
    pub async fn load_optional(path: Option<&Path>) -> Option<Self> {
        let path = path?;
        match Logo::load(path).await {
            Ok(logo) => {
                debug!(path = %path.display(), "Logo loaded");
                Some(logo)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Logo unavailable, rendering without it");
                None
            }
        }
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    /// Size in millimetres when drawn `width_mm` wide, shrunk if needed so
    /// the height stays within `max_height_mm`.
    pub fn fit(&self, width_mm: f32, max_height_mm: f32) -> (f32, f32) {
        let (w, h) = self.pixel_size();
        let aspect = h as f32 / w as f32;
        let height = width_mm * aspect;
        if height <= max_height_mm {
            (width_mm, height)
        } else {
            (max_height_mm / aspect, max_height_mm)
        }
    }

    pub(crate) fn image(&self) -> &DynamicImage {
        &self.image
    }
}
