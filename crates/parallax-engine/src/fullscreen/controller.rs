use crate::input::Key;

/// Equivalent fullscreen API variants a host may expose.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum FullscreenApi {
    Standard,
    /// Vendor-prefixed variant found on older hosts.
    Webkit,
}

impl FullscreenApi {
    /// Preference order used when more than one variant is available.
    pub const ALL: [FullscreenApi; 2] = [FullscreenApi::Standard, FullscreenApi::Webkit];
}

/// Host surface that can be put into fullscreen.
///
/// Each method addresses one API variant. Hosts report `false` from
/// `supports` for variants they do not have; the remaining methods are only
/// called for supported variants.
pub trait PresentationSurface {
    fn supports(&self, api: FullscreenApi) -> bool;

    fn is_fullscreen(&self, api: FullscreenApi) -> bool;

    fn request_fullscreen(&mut self, api: FullscreenApi);

    fn exit_fullscreen(&mut self, api: FullscreenApi);
}

/// What `toggle` did.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FullscreenToggle {
    Entered,
    Exited,
    /// No supported API; nothing happened.
    Unavailable,
}

/// Input bindings that toggle fullscreen.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FullscreenBindings {
    pub double_click: bool,
    pub key: Option<Key>,
}

impl Default for FullscreenBindings {
    fn default() -> Self {
        Self {
            double_click: true,
            key: Some(Key::Character('f')),
        }
    }
}

/// Enters and leaves fullscreen through whichever API the surface exposes.
#[derive(Debug, Clone)]
pub struct FullscreenController {
    strategies: Vec<FullscreenApi>,
}

impl Default for FullscreenController {
    fn default() -> Self {
        Self::new()
    }
}

impl FullscreenController {
    pub fn new() -> Self {
        Self::with_strategies(FullscreenApi::ALL.to_vec())
    }

    /// Controller trying `strategies` in order.
    pub fn with_strategies(strategies: Vec<FullscreenApi>) -> Self {
        Self { strategies }
    }

    /// First strategy the surface currently supports.
    pub fn select(&self, surface: &dyn PresentationSurface) -> Option<FullscreenApi> {
        self.strategies.iter().copied().find(|api| surface.supports(*api))
    }

    /// Queries the surface. Any supported variant reporting fullscreen counts.
    pub fn is_fullscreen(&self, surface: &dyn PresentationSurface) -> bool {
        self.strategies
            .iter()
            .any(|api| surface.supports(*api) && surface.is_fullscreen(*api))
    }

    pub fn toggle(&self, surface: &mut dyn PresentationSurface) -> FullscreenToggle {
        let Some(api) = self.select(surface) else {
            log::debug!("fullscreen toggle ignored: surface exposes no fullscreen API");
            return FullscreenToggle::Unavailable;
        };

        if self.is_fullscreen(surface) {
            surface.exit_fullscreen(api);
            log::info!("leaving fullscreen ({api:?})");
            FullscreenToggle::Exited
        } else {
            surface.request_fullscreen(api);
            log::info!("entering fullscreen ({api:?})");
            FullscreenToggle::Entered
        }
    }
}
