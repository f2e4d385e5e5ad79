mod logging_tactile_feedback;
mod xcap_capture_broker;
mod xcap_display_metrics;
mod xcap_monitor;
mod xcap_window_surface;

pub use logging_tactile_feedback::LoggingTactileFeedback;
pub use xcap_capture_broker::XcapCaptureBroker;
pub use xcap_display_metrics::XcapDisplayMetrics;
pub use xcap_window_surface::XcapWindowSurface;
