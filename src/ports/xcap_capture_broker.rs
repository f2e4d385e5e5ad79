use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::core::interfaces::ports::{
    CaptureGrant, CapturePermissionBroker, CaptureSession, CapturedFrame, FramePlane,
    FrameReceiver, VirtualDisplay,
};
use crate::core::models::{DisplayMetrics, RawImage};
use crate::global_constants::{BYTES_PER_PIXEL, LOG_TAG_CAPTURE};

use super::xcap_monitor;

/// Whole-display capture backed by xcap. Desktop platforms need no runtime
/// consent dialog, so every request is granted.
pub struct XcapCaptureBroker {
    settle_delay: Duration,
}

impl XcapCaptureBroker {
    pub fn initialize() -> Self {
        log::debug!("{} initializing xcap capture broker", LOG_TAG_CAPTURE);
        Self {
            settle_delay: Duration::ZERO,
        }
    }
}

#[async_trait]
impl CapturePermissionBroker for XcapCaptureBroker {
    async fn request_capture(&self) -> CaptureGrant {
        log::debug!("{} granting xcap capture session", LOG_TAG_CAPTURE);
        CaptureGrant::granted(Box::new(XcapCaptureSession), self.settle_delay)
    }
}

struct XcapCaptureSession;

impl CaptureSession for XcapCaptureSession {
    fn open_frame_receiver(&mut self, metrics: &DisplayMetrics) -> Result<Box<dyn FrameReceiver>> {
        Ok(Box::new(XcapFrameReceiver { metrics: *metrics }))
    }

    fn create_virtual_display(
        &mut self,
        name: &str,
        metrics: &DisplayMetrics,
        _receiver: &dyn FrameReceiver,
    ) -> Result<Box<dyn VirtualDisplay>> {
        log::debug!(
            "{} mirroring {}x{} into '{}'",
            LOG_TAG_CAPTURE,
            metrics.width_pixels,
            metrics.height_pixels,
            name
        );
        Ok(Box::new(XcapVirtualDisplay {
            name: name.to_string(),
        }))
    }

    fn stop(self: Box<Self>) {
        log::debug!("{} xcap capture session stopped", LOG_TAG_CAPTURE);
    }
}

struct XcapFrameReceiver {
    metrics: DisplayMetrics,
}

#[async_trait]
impl FrameReceiver for XcapFrameReceiver {
    async fn acquire_next_frame(&mut self) -> Option<Box<dyn CapturedFrame>> {
        let captured = tokio::task::spawn_blocking(|| {
            let monitor = xcap_monitor::find_primary_monitor()?;
            xcap_monitor::capture_monitor(&monitor)
        })
        .await;

        let snapshot = match captured {
            Ok(Ok(snapshot)) => snapshot,
            Ok(Err(e)) => {
                log::error!("{} xcap frame capture failed: {:#}", LOG_TAG_CAPTURE, e);
                return None;
            }
            Err(e) => {
                log::error!("{} xcap capture worker failed: {}", LOG_TAG_CAPTURE, e);
                return None;
            }
        };

        match fit_to_metrics(snapshot.image, &self.metrics) {
            Ok(image) => Some(Box::new(XcapFrame { image })),
            Err(e) => {
                log::error!("{} unable to fit frame to display: {:#}", LOG_TAG_CAPTURE, e);
                None
            }
        }
    }

    fn close(self: Box<Self>) {
        log::debug!("{} xcap frame receiver closed", LOG_TAG_CAPTURE);
    }
}

/// Pads with transparent pixels or crops so the frame matches the receiver size.
fn fit_to_metrics(image: RawImage, metrics: &DisplayMetrics) -> Result<RawImage> {
    if image.width == metrics.width_pixels && image.height == metrics.height_pixels {
        return Ok(image);
    }

    log::debug!(
        "{} fitting {}x{} frame into {}x{}",
        LOG_TAG_CAPTURE,
        image.width,
        image.height,
        metrics.width_pixels,
        metrics.height_pixels
    );

    let mut canvas = image::RgbaImage::new(metrics.width_pixels, metrics.height_pixels);
    image::imageops::overlay(&mut canvas, &image.into_rgba_image()?, 0, 0);
    Ok(RawImage::from_rgba_image(canvas))
}

struct XcapFrame {
    image: RawImage,
}

impl CapturedFrame for XcapFrame {
    fn plane(&self) -> FramePlane<'_> {
        FramePlane {
            bytes: self.image.pixels(),
            pixel_stride: BYTES_PER_PIXEL,
            row_stride: self.image.width as usize * BYTES_PER_PIXEL,
        }
    }

    fn release(self: Box<Self>) {}
}

struct XcapVirtualDisplay {
    name: String,
}

impl VirtualDisplay for XcapVirtualDisplay {
    fn release(self: Box<Self>) {
        log::debug!("{} released virtual display '{}'", LOG_TAG_CAPTURE, self.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_image(width: u32, height: u32) -> RawImage {
        RawImage::build_from_raw_data(width, height, vec![200u8; (width * height * 4) as usize])
            .unwrap()
    }

    #[test]
    fn test_fit_to_metrics_keeps_matching_frame() {
        let fitted = fit_to_metrics(solid_image(8, 4), &DisplayMetrics::new(8, 4, 1.0)).unwrap();

        assert_eq!((fitted.width, fitted.height), (8, 4));
    }

    #[test]
    fn test_fit_to_metrics_pads_smaller_frame_with_transparency() {
        let fitted = fit_to_metrics(solid_image(2, 2), &DisplayMetrics::new(4, 3, 1.0)).unwrap();

        assert_eq!((fitted.width, fitted.height), (4, 3));
        assert_eq!(&fitted.pixels()[0..4], &[200, 200, 200, 200]);
        let last = fitted.pixels().len() - 4;
        assert_eq!(&fitted.pixels()[last..], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_fit_to_metrics_crops_larger_frame() {
        let fitted = fit_to_metrics(solid_image(10, 10), &DisplayMetrics::new(6, 5, 1.0)).unwrap();

        assert_eq!((fitted.width, fitted.height), (6, 5));
    }

    #[test]
    fn test_frame_plane_is_tightly_packed() {
        let frame = XcapFrame {
            image: solid_image(5, 3),
        };

        let plane = frame.plane();

        assert_eq!(plane.pixel_stride, 4);
        assert_eq!(plane.row_stride, 20);
        assert_eq!(plane.bytes.len(), 60);
    }

    #[tokio::test]
    async fn test_request_capture_is_always_granted() {
        let broker = XcapCaptureBroker::initialize();

        let grant = broker.request_capture().await;

        assert!(grant.session.is_some());
        assert!(grant.settle_delay.is_zero());
        assert!(broker.is_supported_on_host());
    }
}
