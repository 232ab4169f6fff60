/// Logical viewport size plus the pixel ratio used for the output buffer.
///
/// Renderers allocate `physical_size()` pixels; cameras only care about
/// `aspect()`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width_px: u32,
    pub height_px: u32,
    pub device_pixel_ratio: f64,
}

impl Viewport {
    #[inline]
    pub const fn new(width_px: u32, height_px: u32, device_pixel_ratio: f64) -> Self {
        Self {
            width_px,
            height_px,
            device_pixel_ratio,
        }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width_px > 0
            && self.height_px > 0
            && self.device_pixel_ratio > 0.0
            && self.device_pixel_ratio.is_finite()
    }

    #[inline]
    pub fn aspect(self) -> f32 {
        self.width_px as f32 / self.height_px.max(1) as f32
    }

    /// Output buffer size in device pixels (never zero).
    pub fn physical_size(self) -> (u32, u32) {
        let scale = |v: u32| ((v as f64 * self.device_pixel_ratio).round() as u32).max(1);
        (scale(self.width_px), scale(self.height_px))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_is_width_over_height() {
        assert_eq!(Viewport::new(800, 600, 1.0).aspect(), 800.0 / 600.0);
    }

    #[test]
    fn physical_size_scales_and_rounds() {
        assert_eq!(Viewport::new(801, 600, 1.5).physical_size(), (1202, 900));
    }

    #[test]
    fn zero_dimension_is_invalid() {
        assert!(!Viewport::new(0, 600, 1.0).is_valid());
        assert!(!Viewport::new(800, 0, 1.0).is_valid());
        assert!(!Viewport::new(800, 600, 0.0).is_valid());
        assert!(Viewport::new(800, 600, 2.0).is_valid());
    }
}
