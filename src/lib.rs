pub mod core;
pub mod global_constants;
pub mod ports;
pub mod presentation;

pub use crate::core::interfaces::adapters::Lens;
pub use crate::core::models::{RawImage, TelescopeSettings};
pub use crate::core::orchestrators::{CaptureController, TelescopeMessage};
pub use crate::core::services::ScreenshotStore;
