//! Asynchronous resource bookkeeping.
//!
//! `ResourceLoadManager` counts tasks and fires progress hooks. `Resources`
//! pairs it with an `AssetLoader` and delivers completions to the scene
//! between frames, so loading never blocks rendering.

mod loader;
mod manager;

pub use loader::{Asset, AssetLoader, FileLoader, LoadHandler, LoadRequest, LoadResult, Resources};
pub use manager::{
    LoadHooks, LoadKind, LoadStatus, LoadTask, ResourceLoadManager, TaskId, TaskStatus,
};

#[cfg(test)]
pub(crate) use loader::tests::ManualLoader;
