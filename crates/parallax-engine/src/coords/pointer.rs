use super::Viewport;

/// Latest pointer sample, normalized against the viewport.
///
/// Both axes lie in `[-0.5, 0.5]` with the origin at the viewport centre.
/// Y is flipped relative to screen space so that moving the pointer up
/// yields positive values.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct PointerState {
    pub normalized_x: f32,
    pub normalized_y: f32,
}

impl PointerState {
    #[inline]
    pub const fn new(normalized_x: f32, normalized_y: f32) -> Self {
        Self {
            normalized_x,
            normalized_y,
        }
    }

    /// Normalizes a raw pointer position given in logical pixels.
    ///
    /// Positions outside the viewport (captured drags) are clamped.
    pub fn from_raw(x: f32, y: f32, viewport: Viewport) -> Self {
        let w = viewport.width_px.max(1) as f32;
        let h = viewport.height_px.max(1) as f32;
        Self {
            normalized_x: (x / w - 0.5).clamp(-0.5, 0.5),
            normalized_y: (-(y / h - 0.5)).clamp(-0.5, 0.5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VP: Viewport = Viewport::new(800, 600, 1.0);

    #[test]
    fn centre_maps_to_origin() {
        assert_eq!(PointerState::from_raw(400.0, 300.0, VP), PointerState::new(0.0, 0.0));
    }

    #[test]
    fn top_right_corner_is_positive_on_both_axes() {
        assert_eq!(PointerState::from_raw(800.0, 0.0, VP), PointerState::new(0.5, 0.5));
    }

    #[test]
    fn bottom_left_corner_is_negative_on_both_axes() {
        assert_eq!(PointerState::from_raw(0.0, 600.0, VP), PointerState::new(-0.5, -0.5));
    }

    #[test]
    fn outside_positions_are_clamped() {
        let p = PointerState::from_raw(-100.0, 900.0, VP);
        assert_eq!(p, PointerState::new(-0.5, -0.5));
    }
}
