use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use image::ImageFormat;

use crate::core::models::{RawImage, TelescopeSettings};
use crate::global_constants::{
    APPLICATION_NAME, ARTIFACT_FILE_EXTENSION, ARTIFACT_FILE_PREFIX, ARTIFACT_FOLDER_NAME,
    ARTIFACT_TIMESTAMP_FORMAT, ERROR_CONTEXT_CREATE_FILE, ERROR_CONTEXT_CREATE_FOLDER,
    ERROR_CONTEXT_ENCODE_PNG, ERROR_CONTEXT_FLUSH_FILE, LOG_TAG_PERSIST, MESSAGE_SAVE_FAILED,
};

/// Writes captures as timestamped PNG files into a single artifact folder.
#[derive(Debug, Clone)]
pub struct ScreenshotStore {
    folder: PathBuf,
}

impl ScreenshotStore {
    pub fn at_folder(folder: impl Into<PathBuf>) -> Self {
        let folder = folder.into();
        log::debug!("{} artifact folder: {:?}", LOG_TAG_PERSIST, folder);
        Self { folder }
    }

    pub fn for_settings(settings: &TelescopeSettings) -> Result<Self> {
        let folder = match settings.artifact_folder.clone() {
            Some(folder) => folder,
            None => Self::default_folder()?,
        };
        Ok(Self::at_folder(folder))
    }

    pub fn default_folder() -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find local data directory"))?;
        Ok(data_dir.join(APPLICATION_NAME).join(ARTIFACT_FOLDER_NAME))
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn artifact_file_name(at: DateTime<Local>) -> String {
        format!(
            "{}-{}.{}",
            ARTIFACT_FILE_PREFIX,
            at.format(ARTIFACT_TIMESTAMP_FORMAT),
            ARTIFACT_FILE_EXTENSION
        )
    }

    /// Persists `image` if there is one. I/O failures are logged and reported
    /// as no artifact. The image is dropped before this returns either way.
    pub fn save(&self, image: Option<RawImage>) -> Option<PathBuf> {
        let image = image?;

        match self.write_png(image) {
            Ok(path) => {
                log::info!("{} saved screenshot to {:?}", LOG_TAG_PERSIST, path);
                Some(path)
            }
            Err(e) => {
                log::error!("{} {}: {:#}", LOG_TAG_PERSIST, MESSAGE_SAVE_FAILED, e);
                None
            }
        }
    }

    fn write_png(&self, image: RawImage) -> Result<PathBuf> {
        fs::create_dir_all(&self.folder)
            .with_context(|| format!("{} {:?}", ERROR_CONTEXT_CREATE_FOLDER, self.folder))?;

        let path = self.folder.join(Self::artifact_file_name(Local::now()));
        let rgba = image.into_rgba_image()?;

        let file = File::create(&path)
            .with_context(|| format!("{} {:?}", ERROR_CONTEXT_CREATE_FILE, path))?;
        let mut writer = BufWriter::new(file);
        rgba.write_to(&mut writer, ImageFormat::Png)
            .context(ERROR_CONTEXT_ENCODE_PNG)?;
        writer.flush().context(ERROR_CONTEXT_FLUSH_FILE)?;

        Ok(path)
    }

    /// Deletes the artifact folder and everything in it. Callers must make sure
    /// no previously delivered artifact is still in use.
    pub fn clean_up(folder: &Path) -> Result<()> {
        if !folder.exists() {
            log::debug!("{} nothing to clean up at {:?}", LOG_TAG_PERSIST, folder);
            return Ok(());
        }

        log::info!("{} deleting artifact folder {:?}", LOG_TAG_PERSIST, folder);
        delete_recursively(folder).with_context(|| format!("Unable to delete {:?}", folder))
    }
}

fn delete_recursively(path: &Path) -> std::io::Result<()> {
    // Links are unlinked, never followed.
    if fs::symlink_metadata(path)?.file_type().is_dir() {
        for entry in fs::read_dir(path)? {
            delete_recursively(&entry?.path())?;
        }
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    }
}

/// Runs [`ScreenshotStore::save`] on the blocking pool so disk I/O never
/// stalls the interactive loop.
pub async fn persist_off_thread(
    store: Arc<ScreenshotStore>,
    image: Option<RawImage>,
) -> Option<PathBuf> {
    if image.is_none() {
        log::debug!("{} no screenshot to persist", LOG_TAG_PERSIST);
        return None;
    }

    match tokio::task::spawn_blocking(move || store.save(image)).await {
        Ok(artifact) => artifact,
        Err(e) => {
            log::error!("{} persistence worker failed: {}", LOG_TAG_PERSIST, e);
            None
        }
    }
}
