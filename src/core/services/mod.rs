pub mod capture_strategy;
mod gesture_tracker;
mod progress_animator;
mod screenshot_store;

pub use capture_strategy::{CaptureCollaborators, CaptureStrategy};
pub use gesture_tracker::{GestureIntent, GestureTracker, GestureVerdict};
pub use progress_animator::ProgressAnimator;
pub use screenshot_store::{persist_off_thread, ScreenshotStore};
