use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::global_constants;

/// Widget configuration. Every field falls back to its default when missing
/// from the stored JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TelescopeSettings {
    pub pointer_count: usize,
    pub progress_color: [f32; 4],
    pub progress_stroke_width: f32,
    pub screenshot: bool,
    pub screenshot_children_only: bool,
    pub vibrate: bool,
    pub trigger_duration_ms: u64,
    pub cancel_duration_ms: u64,
    pub done_duration_ms: u64,
    pub vibration_duration_ms: u64,
    pub frame_timeout_ms: u64,
    pub artifact_folder: Option<PathBuf>,
}

impl Default for TelescopeSettings {
    fn default() -> Self {
        Self {
            pointer_count: global_constants::DEFAULT_POINTER_COUNT,
            progress_color: global_constants::DEFAULT_PROGRESS_COLOR_RGBA,
            progress_stroke_width: global_constants::DEFAULT_PROGRESS_STROKE_WIDTH,
            screenshot: true,
            screenshot_children_only: false,
            vibrate: true,
            trigger_duration_ms: global_constants::DEFAULT_TRIGGER_DURATION_MS,
            cancel_duration_ms: global_constants::DEFAULT_CANCEL_DURATION_MS,
            done_duration_ms: global_constants::DEFAULT_DONE_DURATION_MS,
            vibration_duration_ms: global_constants::DEFAULT_VIBRATION_DURATION_MS,
            frame_timeout_ms: global_constants::DEFAULT_FRAME_TIMEOUT_MS,
            artifact_folder: None,
        }
    }
}

impl TelescopeSettings {
    pub fn trigger_duration(&self) -> Duration {
        Duration::from_millis(self.trigger_duration_ms)
    }

    pub fn cancel_duration(&self) -> Duration {
        Duration::from_millis(self.cancel_duration_ms)
    }

    pub fn done_duration(&self) -> Duration {
        Duration::from_millis(self.done_duration_ms)
    }

    pub fn vibration_duration(&self) -> Duration {
        Duration::from_millis(self.vibration_duration_ms)
    }

    pub fn frame_timeout(&self) -> Duration {
        Duration::from_millis(self.frame_timeout_ms)
    }

    pub fn load() -> anyhow::Result<Self> {
        let settings_path = Self::get_settings_file_path()?;

        if !settings_path.exists() {
            log::info!(
                "{} No settings file found, using defaults",
                global_constants::LOG_TAG_SETTINGS
            );
            let default_settings = Self::default();
            default_settings.save()?;
            return Ok(default_settings);
        }

        Self::load_from(&settings_path)
    }

    pub fn load_from(settings_path: &std::path::Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(settings_path)
            .with_context(|| format!("Unable to read settings from {:?}", settings_path))?;
        let settings: TelescopeSettings =
            serde_json::from_str(&contents).context("Settings file is not valid JSON")?;

        log::info!(
            "{} Loaded settings from {:?}",
            global_constants::LOG_TAG_SETTINGS,
            settings_path
        );
        log::debug!(
            "{} Pointer count: {}, screenshot: {}, vibrate: {}",
            global_constants::LOG_TAG_SETTINGS,
            settings.pointer_count,
            settings.screenshot,
            settings.vibrate
        );

        Ok(settings)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let settings_path = Self::get_settings_file_path()?;
        self.save_to(&settings_path)
    }

    pub fn save_to(&self, settings_path: &std::path::Path) -> anyhow::Result<()> {
        if let Some(parent) = settings_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Unable to create settings folder {:?}", parent))?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(settings_path, contents)
            .with_context(|| format!("Unable to write settings to {:?}", settings_path))?;

        log::info!(
            "{} Saved settings to {:?}",
            global_constants::LOG_TAG_SETTINGS,
            settings_path
        );
        Ok(())
    }

    fn get_settings_file_path() -> anyhow::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join(global_constants::APPLICATION_NAME);

        Ok(config_dir.join(global_constants::SETTINGS_FILE_NAME))
    }
}
