use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::core::interfaces::ports::ViewSurface;
use crate::core::models::{RawImage, SurfaceRegion};
use crate::global_constants::LOG_TAG_CAPTURE;

use super::xcap_monitor::{self, MonitorSnapshot};

/// An on-screen rectangle read back by grabbing the monitor underneath it and
/// cropping. Surfaces nest so whole-window capture can walk up to the root.
pub struct XcapWindowSurface {
    label: String,
    region: SurfaceRegion,
    parent: Option<Arc<dyn ViewSurface>>,
}

impl XcapWindowSurface {
    pub fn at_region(label: impl Into<String>, region: SurfaceRegion) -> Self {
        Self {
            label: label.into(),
            region,
            parent: None,
        }
    }

    pub fn nested_in(
        parent: Arc<dyn ViewSurface>,
        label: impl Into<String>,
        region: SurfaceRegion,
    ) -> Self {
        Self {
            label: label.into(),
            region,
            parent: Some(parent),
        }
    }

    pub fn region(&self) -> SurfaceRegion {
        self.region
    }
}

fn crop_snapshot(snapshot: MonitorSnapshot, region: &SurfaceRegion) -> Result<RawImage> {
    let MonitorSnapshot {
        origin,
        scale_factor,
        image,
    } = snapshot;

    let Some((x, y, width, height)) =
        region.to_physical_within(origin, scale_factor, image.width, image.height)
    else {
        anyhow::bail!("Surface {:?} is not on the captured monitor", region);
    };

    image.crop_region(x, y, width, height)
}

#[async_trait]
impl ViewSurface for XcapWindowSurface {
    fn describe(&self) -> String {
        format!(
            "{} {}x{}@({}, {})",
            self.label,
            self.region.width,
            self.region.height,
            self.region.x_position,
            self.region.y_position
        )
    }

    fn parent(&self) -> Option<Arc<dyn ViewSurface>> {
        self.parent.clone()
    }

    async fn read_back(&self) -> Result<RawImage> {
        let region = self.region;
        log::debug!("{} reading back {}", LOG_TAG_CAPTURE, self.describe());

        tokio::task::spawn_blocking(move || {
            let monitor = match xcap::Monitor::from_point(region.x_position, region.y_position) {
                Ok(monitor) => monitor,
                Err(_) => xcap_monitor::find_primary_monitor()?,
            };
            let snapshot = xcap_monitor::capture_monitor(&monitor)?;
            crop_snapshot(snapshot, &region)
        })
        .await?
    }
}
