use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use image::RgbaImage;

use crate::global_constants::BYTES_PER_PIXEL;

/// Owned RGBA8 pixel buffer produced by a capture strategy.
///
/// Not `Clone`: a capture cycle holds exactly one image and it is released
/// when the last stage drops it.
pub struct RawImage {
    pub width: u32,
    pub height: u32,
    raw_data: Vec<u8>,
}

impl std::fmt::Debug for RawImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl RawImage {
    pub fn build_from_raw_data(
        width_pixels: u32,
        height_pixels: u32,
        raw_rgba_data: Vec<u8>,
    ) -> Result<Self> {
        let expected_len = width_pixels as usize * height_pixels as usize * BYTES_PER_PIXEL;
        if raw_rgba_data.len() != expected_len {
            anyhow::bail!(
                "Pixel buffer holds {} bytes, expected {} for {}x{}",
                raw_rgba_data.len(),
                expected_len,
                width_pixels,
                height_pixels
            );
        }

        log::debug!(
            "[RAW_IMAGE] building image: {}x{}",
            width_pixels,
            height_pixels
        );

        Ok(Self {
            width: width_pixels,
            height: height_pixels,
            raw_data: raw_rgba_data,
        })
    }

    /// Copies a strided plane into an owned buffer, dropping the row padding so
    /// the result is exactly `width` pixels wide.
    pub fn copy_from_strided_plane(
        plane_bytes: &[u8],
        pixel_stride: usize,
        row_stride: usize,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        if pixel_stride != BYTES_PER_PIXEL {
            anyhow::bail!("Unsupported pixel stride {}", pixel_stride);
        }

        let row_padding = row_stride
            .checked_sub(pixel_stride * width as usize)
            .context("Row stride is narrower than the frame width")?;
        let padded_width = width as usize + row_padding / pixel_stride;
        let padded_row_bytes = padded_width * pixel_stride;
        let needed = padded_row_bytes * height as usize;

        if plane_bytes.len() < needed {
            anyhow::bail!(
                "Frame plane holds {} bytes, expected at least {}",
                plane_bytes.len(),
                needed
            );
        }

        let padded = Self::build_from_raw_data(
            padded_width as u32,
            height,
            plane_bytes[..needed].to_vec(),
        )?;

        if padded.width == width {
            return Ok(padded);
        }

        padded.crop_region(0, 0, width, height)
    }

    /// Copies a rectangle out of the buffer. Offsets past the edge snap to the
    /// last pixel and the size shrinks to what is left.
    pub fn crop_region(&self, x: u32, y: u32, crop_width: u32, crop_height: u32) -> Result<Self> {
        if crop_width == 0 || crop_height == 0 {
            anyhow::bail!("Crop dimensions must be greater than zero");
        }
        if self.width == 0 || self.height == 0 {
            anyhow::bail!("Cannot crop an empty {}x{} image", self.width, self.height);
        }

        let left = x.min(self.width - 1);
        let top = y.min(self.height - 1);
        let kept_width = crop_width.min(self.width - left);
        let kept_height = crop_height.min(self.height - top);
        log::debug!(
            "[RAW_IMAGE] keeping {}x{} at ({}, {}) of {}x{}",
            kept_width, kept_height, left, top, self.width, self.height
        );

        let stride = self.width as usize * BYTES_PER_PIXEL;
        let columns = left as usize * BYTES_PER_PIXEL..(left + kept_width) as usize * BYTES_PER_PIXEL;
        let kept: Vec<u8> = self
            .raw_data
            .chunks_exact(stride)
            .skip(top as usize)
            .take(kept_height as usize)
            .flat_map(|row| row[columns.clone()].iter().copied())
            .collect();

        Self::build_from_raw_data(kept_width, kept_height, kept)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.raw_data
    }

    pub fn into_rgba_image(self) -> Result<RgbaImage> {
        let (width, height) = (self.width, self.height);
        RgbaImage::from_raw(width, height, self.raw_data)
            .with_context(|| format!("Pixel buffer does not fit {}x{}", width, height))
    }

    pub fn from_rgba_image(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            raw_data: image.into_raw(),
        }
    }
}

/// Take-once slot used to move a [`RawImage`] through iced messages.
///
/// Messages must be cloneable, images must not be duplicated; every clone of a
/// handoff shares the same slot so only the first `take` gets the image.
#[derive(Clone, Default)]
pub struct ImageHandoff(Arc<Mutex<Option<RawImage>>>);

impl ImageHandoff {
    pub fn holding(image: Option<RawImage>) -> Self {
        Self(Arc::new(Mutex::new(image)))
    }

    pub fn take(&self) -> Option<RawImage> {
        match self.0.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => {
                log::error!("[RAW_IMAGE] image handoff lock poisoned, recovering slot");
                poisoned.into_inner().take()
            }
        }
    }
}

impl std::fmt::Debug for ImageHandoff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let description = match self.0.lock() {
            Ok(slot) => match slot.as_ref() {
                Some(image) => format!("{}x{}", image.width, image.height),
                None => "empty".to_string(),
            },
            Err(_) => "poisoned".to_string(),
        };
        write!(f, "ImageHandoff({})", description)
    }
}
