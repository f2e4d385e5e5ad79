mod capture_controller;

pub use capture_controller::{CaptureController, Effect, TelescopeMessage};
