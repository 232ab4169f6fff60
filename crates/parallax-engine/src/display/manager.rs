use crate::coords::Viewport;
use crate::error::ConfigurationError;
use crate::events::{Subscribers, Subscription};

/// Default cap on the device pixel ratio.
///
/// Ratios above 2 cost fill rate and memory without a visible gain.
pub const DEFAULT_MAX_PIXEL_RATIO: f64 = 2.0;

/// Host capability reporting the physical/logical pixel ratio of the display
/// currently showing the viewport.
pub trait HostDisplay {
    fn device_pixel_ratio(&self) -> f64;
}

/// `HostDisplay` with a constant ratio (headless hosts, tests).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FixedDisplay(pub f64);

impl HostDisplay for FixedDisplay {
    fn device_pixel_ratio(&self) -> f64 {
        self.0
    }
}

/// Notification raised when the viewport actually changes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewportChanged {
    pub previous: Viewport,
    pub current: Viewport,
}

impl ViewportChanged {
    pub fn size_changed(&self) -> bool {
        self.previous.width_px != self.current.width_px
            || self.previous.height_px != self.current.height_px
    }

    pub fn pixel_ratio_changed(&self) -> bool {
        self.previous.device_pixel_ratio != self.current.device_pixel_ratio
    }
}

/// Owns the logical viewport and its clamped pixel ratio.
pub struct ViewportManager {
    host: Box<dyn HostDisplay>,
    max_pixel_ratio: f64,
    current: Viewport,
    listeners: Subscribers<ViewportChanged>,
}

impl ViewportManager {
    /// Creates a manager for an initial viewport of `width` x `height` logical pixels.
    ///
    /// A zero-sized initial viewport has nothing to fall back to and is rejected.
    pub fn new(
        host: Box<dyn HostDisplay>,
        width: u32,
        height: u32,
        max_pixel_ratio: f64,
    ) -> Result<Self, ConfigurationError> {
        if !(max_pixel_ratio > 0.0 && max_pixel_ratio.is_finite()) {
            return Err(ConfigurationError::PixelRatioCap { max: max_pixel_ratio });
        }
        if width == 0 || height == 0 {
            return Err(ConfigurationError::ZeroViewport { width, height });
        }

        let ratio = clamp_ratio(host.device_pixel_ratio(), max_pixel_ratio);
        Ok(Self {
            host,
            max_pixel_ratio,
            current: Viewport::new(width, height, ratio),
            listeners: Subscribers::new(),
        })
    }

    /// Latest valid viewport.
    #[inline]
    pub fn current(&self) -> Viewport {
        self.current
    }

    #[inline]
    pub fn max_pixel_ratio(&self) -> f64 {
        self.max_pixel_ratio
    }

    /// Applies a new logical size and re-reads the host pixel ratio.
    ///
    /// Zero-sized requests (hidden or minimized windows) keep the previous
    /// viewport. Returns the change, if any, after notifying subscribers.
    pub fn on_resize(&mut self, width: u32, height: u32) -> Option<ViewportChanged> {
        if width == 0 || height == 0 {
            log::debug!(
                "ignoring degenerate viewport {width}x{height}; keeping {}x{}",
                self.current.width_px,
                self.current.height_px
            );
            return None;
        }

        let ratio = clamp_ratio(self.host.device_pixel_ratio(), self.max_pixel_ratio);
        self.apply(Viewport::new(width, height, ratio))
    }

    /// Re-reads the host pixel ratio without a size change.
    ///
    /// Hosts call this when the window moves to a display with a different density.
    pub fn refresh_pixel_ratio(&mut self) -> Option<ViewportChanged> {
        let ratio = clamp_ratio(self.host.device_pixel_ratio(), self.max_pixel_ratio);
        self.apply(Viewport::new(self.current.width_px, self.current.height_px, ratio))
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&ViewportChanged) + 'static) -> Subscription {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: Subscription) -> bool {
        self.listeners.unsubscribe(id)
    }

    fn apply(&mut self, next: Viewport) -> Option<ViewportChanged> {
        if next == self.current {
            return None;
        }

        let change = ViewportChanged {
            previous: self.current,
            current: next,
        };
        self.current = next;

        log::debug!(
            "viewport {}x{} @{} -> {}x{} @{}",
            change.previous.width_px,
            change.previous.height_px,
            change.previous.device_pixel_ratio,
            next.width_px,
            next.height_px,
            next.device_pixel_ratio
        );

        self.listeners.emit(&change);
        Some(change)
    }
}

fn clamp_ratio(host_ratio: f64, max: f64) -> f64 {
    if host_ratio > 0.0 && host_ratio.is_finite() {
        host_ratio.min(max)
    } else {
        1.0_f64.min(max)
    }
}
