/// Timing and distance window for synthesizing double clicks.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DoubleClickConfig {
    /// Longest gap between the two presses, seconds.
    pub max_interval: f64,
    /// Largest pointer travel between the two presses, logical pixels.
    pub max_distance: f32,
}

impl Default for DoubleClickConfig {
    fn default() -> Self {
        Self {
            max_interval: 0.5,
            max_distance: 4.0,
        }
    }
}

/// Turns primary-button presses into double-click notifications.
///
/// Native windowing systems report only single presses.
#[derive(Debug, Clone, Default)]
pub struct DoubleClickDetector {
    config: DoubleClickConfig,
    last_press: Option<(f64, f32, f32)>,
}

impl DoubleClickDetector {
    pub fn new(config: DoubleClickConfig) -> Self {
        Self {
            config,
            last_press: None,
        }
    }

    /// Records a press at `time` seconds and (`x`, `y`). Returns `true` if it
    /// completes a double click. A third quick press starts a new pair.
    pub fn on_press(&mut self, time: f64, x: f32, y: f32) -> bool {
        if let Some((t0, x0, y0)) = self.last_press.take() {
            let dt = time - t0;
            let travel = ((x - x0).powi(2) + (y - y0).powi(2)).sqrt();
            if (0.0..=self.config.max_interval).contains(&dt) && travel <= self.config.max_distance {
                return true;
            }
        }

        self.last_press = Some((time, x, y));
        false
    }

    pub fn reset(&mut self) {
        self.last_press = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_quick_presses_are_a_double_click() {
        let mut d = DoubleClickDetector::default();
        assert!(!d.on_press(1.0, 10.0, 10.0));
        assert!(d.on_press(1.2, 11.0, 10.0));
    }

    #[test]
    fn slow_presses_are_not() {
        let mut d = DoubleClickDetector::default();
        d.on_press(1.0, 10.0, 10.0);
        assert!(!d.on_press(1.6, 10.0, 10.0));
        // The late press starts its own pair.
        assert!(d.on_press(1.8, 10.0, 10.0));
    }

    #[test]
    fn distant_presses_are_not() {
        let mut d = DoubleClickDetector::default();
        d.on_press(1.0, 10.0, 10.0);
        assert!(!d.on_press(1.1, 40.0, 10.0));
    }

    #[test]
    fn triple_press_yields_one_double_click() {
        let mut d = DoubleClickDetector::default();
        let hits = [1.0, 1.1, 1.2]
            .into_iter()
            .filter(|t| d.on_press(*t, 0.0, 0.0))
            .count();
        assert_eq!(hits, 1);
    }
}
