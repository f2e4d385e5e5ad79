use std::sync::Arc;

use crate::core::interfaces::ports::ViewSurface;

/// Built once per trigger and consumed by the capture strategy.
pub struct CaptureRequest {
    pub target: Arc<dyn ViewSurface>,
    pub whole_window: bool,
    pub native_capture_opt_in: bool,
}

impl std::fmt::Debug for CaptureRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureRequest")
            .field("target", &self.target.describe())
            .field("whole_window", &self.whole_window)
            .field("native_capture_opt_in", &self.native_capture_opt_in)
            .finish()
    }
}
