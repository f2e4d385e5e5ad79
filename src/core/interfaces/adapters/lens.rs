use std::path::PathBuf;

use async_trait::async_trait;

use crate::core::models::RawImage;

/// Receives captures. Both hooks are optional to implement.
#[async_trait]
pub trait Lens: Send + Sync {
    /// Called with the raw capture before it is saved. The returned image,
    /// possibly cropped or annotated, is what gets persisted.
    async fn on_raw_capture(&self, image: RawImage) -> Option<RawImage> {
        Some(image)
    }

    /// Called once per capture with the saved file, or `None` when nothing
    /// was saved.
    fn on_artifact_saved(&self, _artifact: Option<PathBuf>) {}
}
