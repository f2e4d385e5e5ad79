mod capture_broker;
mod display_metrics_provider;
mod tactile_feedback;
mod view_surface;

pub use capture_broker::{
    CaptureGrant, CapturePermissionBroker, CaptureSession, CapturedFrame, FramePlane,
    FrameReceiver, VirtualDisplay,
};
pub use display_metrics_provider::DisplayMetricsProvider;
pub use tactile_feedback::TactileFeedback;
pub use view_surface::ViewSurface;
