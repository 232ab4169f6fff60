//! Fullscreen presentation.
//!
//! Hosts expose one or more equivalent fullscreen APIs. `FullscreenController`
//! picks whichever the surface supports at call time and never caches state.

mod controller;

pub use controller::{
    FullscreenApi, FullscreenBindings, FullscreenController, FullscreenToggle, PresentationSurface,
};

#[cfg(test)]
pub(crate) use controller::tests::FakeSurface;
