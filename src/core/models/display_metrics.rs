/// Real pixel geometry of the host display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayMetrics {
    pub width_pixels: u32,
    pub height_pixels: u32,
    pub scale_factor: f32,
}

impl DisplayMetrics {
    pub fn new(width_pixels: u32, height_pixels: u32, scale_factor: f32) -> Self {
        log::debug!(
            "[DISPLAY_METRICS] {}x{} at scale {}",
            width_pixels,
            height_pixels,
            scale_factor
        );

        Self {
            width_pixels,
            height_pixels,
            scale_factor,
        }
    }
}
