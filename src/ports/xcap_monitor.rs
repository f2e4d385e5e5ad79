use anyhow::{Context, Result};

use crate::core::models::{DisplayMetrics, RawImage};
use crate::global_constants::{
    ERROR_CONTEXT_CAPTURE_MONITOR, ERROR_CONTEXT_PRIMARY_MONITOR, LOG_TAG_CAPTURE,
};

/// Origin, scale and captured pixels of one monitor.
pub struct MonitorSnapshot {
    pub origin: (i32, i32),
    pub scale_factor: f32,
    pub image: RawImage,
}

pub fn find_primary_monitor() -> Result<xcap::Monitor> {
    let monitors = xcap::Monitor::all().context(ERROR_CONTEXT_PRIMARY_MONITOR)?;

    let mut fallback = None;
    for monitor in monitors {
        if monitor.is_primary().unwrap_or(false) {
            return Ok(monitor);
        }
        fallback.get_or_insert(monitor);
    }

    fallback.ok_or_else(|| anyhow::anyhow!(ERROR_CONTEXT_PRIMARY_MONITOR))
}

pub fn read_display_metrics(monitor: &xcap::Monitor) -> Result<DisplayMetrics> {
    let scale_factor = monitor.scale_factor().unwrap_or(1.0);
    let width = monitor.width().context(ERROR_CONTEXT_PRIMARY_MONITOR)?;
    let height = monitor.height().context(ERROR_CONTEXT_PRIMARY_MONITOR)?;

    Ok(DisplayMetrics::new(
        (width as f32 * scale_factor).round() as u32,
        (height as f32 * scale_factor).round() as u32,
        scale_factor,
    ))
}

pub fn capture_monitor(monitor: &xcap::Monitor) -> Result<MonitorSnapshot> {
    let origin = (monitor.x().unwrap_or(0), monitor.y().unwrap_or(0));
    let scale_factor = monitor.scale_factor().unwrap_or(1.0);
    let captured = monitor
        .capture_image()
        .context(ERROR_CONTEXT_CAPTURE_MONITOR)?;

    let width = captured.width();
    let height = captured.height();
    log::info!(
        "{} captured {}x{} monitor image, scale_factor={}",
        LOG_TAG_CAPTURE,
        width,
        height,
        scale_factor
    );

    Ok(MonitorSnapshot {
        origin,
        scale_factor,
        image: RawImage::build_from_raw_data(width, height, captured.into_raw())?,
    })
}
