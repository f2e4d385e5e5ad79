use anyhow::Result;

use crate::core::interfaces::ports::DisplayMetricsProvider;
use crate::core::models::DisplayMetrics;
use crate::global_constants::LOG_TAG_CAPTURE;

use super::xcap_monitor;

/// Reports the primary monitor in physical pixels.
pub struct XcapDisplayMetrics;

impl XcapDisplayMetrics {
    pub fn initialize() -> Self {
        log::debug!("{} initializing xcap display metrics", LOG_TAG_CAPTURE);
        Self
    }
}

impl DisplayMetricsProvider for XcapDisplayMetrics {
    fn real_metrics(&self) -> Result<DisplayMetrics> {
        let monitor = xcap_monitor::find_primary_monitor()?;
        let metrics = xcap_monitor::read_display_metrics(&monitor)?;

        log::debug!("{} display metrics: {:?}", LOG_TAG_CAPTURE, metrics);
        Ok(metrics)
    }
}
