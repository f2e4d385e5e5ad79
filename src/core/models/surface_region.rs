/// A rectangle on screen in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceRegion {
    pub x_position: i32,
    pub y_position: i32,
    pub width: u32,
    pub height: u32,
}

impl SurfaceRegion {
    pub fn at_coordinates(x_position: i32, y_position: i32, width: u32, height: u32) -> Self {
        log::debug!(
            "[SURFACE_REGION] creating {}x{} region at ({}, {})",
            width,
            height,
            x_position,
            y_position
        );

        Self {
            x_position,
            y_position,
            width,
            height,
        }
    }

    /// Scales into physical pixels relative to `origin`, clamped to the
    /// `bounds_width` x `bounds_height` area. `None` when nothing overlaps.
    pub fn to_physical_within(
        &self,
        origin: (i32, i32),
        scale_factor: f32,
        bounds_width: u32,
        bounds_height: u32,
    ) -> Option<(u32, u32, u32, u32)> {
        let scale = |value: i64| (value as f32 * scale_factor).round() as i64;

        let left = scale(i64::from(self.x_position) - i64::from(origin.0)).max(0);
        let top = scale(i64::from(self.y_position) - i64::from(origin.1)).max(0);
        let right = scale(i64::from(self.x_position) - i64::from(origin.0) + i64::from(self.width))
            .min(i64::from(bounds_width));
        let bottom = scale(i64::from(self.y_position) - i64::from(origin.1) + i64::from(self.height))
            .min(i64::from(bounds_height));

        if right <= left || bottom <= top {
            return None;
        }

        Some((
            left as u32,
            top as u32,
            (right - left) as u32,
            (bottom - top) as u32,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_physical_within_scales_and_offsets() {
        let region = SurfaceRegion::at_coordinates(110, 60, 50, 20);

        let physical = region.to_physical_within((100, 50), 2.0, 1000, 1000);

        assert_eq!(physical, Some((20, 20, 100, 40)));
    }

    #[test]
    fn test_to_physical_within_clamps_to_bounds() {
        let region = SurfaceRegion::at_coordinates(-10, -10, 40, 40);

        let physical = region.to_physical_within((0, 0), 1.0, 20, 20);

        assert_eq!(physical, Some((0, 0, 20, 20)));
    }

    #[test]
    fn test_to_physical_within_outside_bounds_is_none() {
        let region = SurfaceRegion::at_coordinates(500, 500, 10, 10);

        assert_eq!(region.to_physical_within((0, 0), 1.0, 100, 100), None);
    }
}
