use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::core::models::RawImage;

/// A node of the host view tree whose rendered pixels can be read back.
#[async_trait]
pub trait ViewSurface: Send + Sync {
    fn describe(&self) -> String;

    /// The enclosing surface, `None` at the root of the tree.
    fn parent(&self) -> Option<Arc<dyn ViewSurface>>;

    async fn read_back(&self) -> Result<RawImage>;
}
