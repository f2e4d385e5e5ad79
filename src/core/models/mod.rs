mod capture_request;
mod display_metrics;
mod gesture_state;
mod pointer_event;
mod progress_fractions;
mod raw_image;
mod surface_region;
mod telescope_settings;

pub use capture_request::CaptureRequest;
pub use display_metrics::DisplayMetrics;
pub use gesture_state::GestureState;
pub use pointer_event::{PointerAction, PointerEvent, PointerSession};
pub use progress_fractions::ProgressFractions;
pub use raw_image::{ImageHandoff, RawImage};
pub use surface_region::SurfaceRegion;
pub use telescope_settings::TelescopeSettings;
