#![allow(dead_code)]

pub const APPLICATION_NAME: &str = "telescope-lens";
pub const APPLICATION_TITLE: &str = "Telescope";

pub const LOG_TAG_TELESCOPE: &str = "[TELESCOPE]";
pub const LOG_TAG_GESTURE: &str = "[GESTURE]";
pub const LOG_TAG_ANIMATION: &str = "[ANIMATION]";
pub const LOG_TAG_CAPTURE: &str = "[CAPTURE]";
pub const LOG_TAG_PERSIST: &str = "[PERSIST]";
pub const LOG_TAG_SETTINGS: &str = "[SETTINGS]";

pub const DEFAULT_POINTER_COUNT: usize = 2;
pub const DEFAULT_PROGRESS_COLOR_RGBA: [f32; 4] = [0.2, 0.6, 1.0, 0.75];
pub const DEFAULT_PROGRESS_STROKE_WIDTH: f32 = 4.0;

pub const DEFAULT_TRIGGER_DURATION_MS: u64 = 1000;
pub const DEFAULT_CANCEL_DURATION_MS: u64 = 250;
pub const DEFAULT_DONE_DURATION_MS: u64 = 1000;
pub const DEFAULT_VIBRATION_DURATION_MS: u64 = 50;
pub const DEFAULT_FRAME_TIMEOUT_MS: u64 = 5000;

pub const ARTIFACT_FOLDER_NAME: &str = "telescope";
pub const ARTIFACT_FILE_PREFIX: &str = "telescope";
pub const ARTIFACT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H%M%S";
pub const ARTIFACT_FILE_EXTENSION: &str = "png";

pub const BYTES_PER_PIXEL: usize = 4;

pub const VIRTUAL_DISPLAY_NAME: &str = "telescope";

pub const SETTINGS_FILE_NAME: &str = "settings.json";

pub const ERROR_CONTEXT_CREATE_FOLDER: &str = "Unable to create artifact folder";
pub const ERROR_CONTEXT_CREATE_FILE: &str = "Unable to create artifact file";
pub const ERROR_CONTEXT_ENCODE_PNG: &str = "Unable to encode screenshot as PNG";
pub const ERROR_CONTEXT_FLUSH_FILE: &str = "Unable to flush artifact file";
pub const ERROR_CONTEXT_CAPTURE_MONITOR: &str = "Unable to capture Monitor";
pub const ERROR_CONTEXT_PRIMARY_MONITOR: &str = "Unable to find primary Monitor";

pub const MESSAGE_SAVE_FAILED: &str =
    "failed to save screenshot, is the artifact folder writable?";
pub const MESSAGE_NO_FRAME: &str = "no frame data became available, giving up";
