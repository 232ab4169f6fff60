//! Time subsystem.
//!
//! Provides stable, testable frame timing without coupling to the runtime.
//! Intended usage:
//! - one `Clock` per render loop
//! - call `tick()` once per presented frame to obtain `FrameTime`

mod clock;

pub use clock::{Clock, FrameTime, MonotonicSource, TimeSource};

#[cfg(test)]
pub(crate) use clock::tests::ScriptedSource;
