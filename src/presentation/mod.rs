mod progress_overlay;

pub use progress_overlay::{edge_segments, OverlayResponse, PointerTracking, ProgressOverlay};
