use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::core::models::DisplayMetrics;

/// Result of asking the platform for a screen-mirroring session.
pub struct CaptureGrant {
    /// `None` when the request was denied.
    pub session: Option<Box<dyn CaptureSession>>,
    /// Time to wait after the grant before the first frame can be trusted.
    pub settle_delay: Duration,
}

impl CaptureGrant {
    pub fn denied() -> Self {
        Self {
            session: None,
            settle_delay: Duration::ZERO,
        }
    }

    pub fn granted(session: Box<dyn CaptureSession>, settle_delay: Duration) -> Self {
        Self {
            session: Some(session),
            settle_delay,
        }
    }
}

impl std::fmt::Debug for CaptureGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureGrant")
            .field("granted", &self.session.is_some())
            .field("settle_delay", &self.settle_delay)
            .finish()
    }
}

/// Caller-registered collaborator that obtains whole-window capture sessions.
#[async_trait]
pub trait CapturePermissionBroker: Send + Sync {
    /// Whether the host platform can do composited capture at all.
    fn is_supported_on_host(&self) -> bool {
        true
    }

    async fn request_capture(&self) -> CaptureGrant;
}

pub trait CaptureSession: Send {
    /// Allocates a receiver that holds at most one frame of the given size.
    fn open_frame_receiver(&mut self, metrics: &DisplayMetrics) -> Result<Box<dyn FrameReceiver>>;

    /// Mirrors the display into `receiver`.
    fn create_virtual_display(
        &mut self,
        name: &str,
        metrics: &DisplayMetrics,
        receiver: &dyn FrameReceiver,
    ) -> Result<Box<dyn VirtualDisplay>>;

    fn stop(self: Box<Self>);
}

#[async_trait]
pub trait FrameReceiver: Send + Sync {
    /// Waits until a frame is available and acquires it. `None` means the
    /// producer signalled availability but had no image data.
    async fn acquire_next_frame(&mut self) -> Option<Box<dyn CapturedFrame>>;

    fn close(self: Box<Self>);
}

pub trait VirtualDisplay: Send {
    fn release(self: Box<Self>);
}

pub struct FramePlane<'a> {
    pub bytes: &'a [u8],
    pub pixel_stride: usize,
    pub row_stride: usize,
}

pub trait CapturedFrame: Send {
    fn plane(&self) -> FramePlane<'_>;
    fn release(self: Box<Self>);
}
