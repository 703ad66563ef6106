//! Time subsystem.
//!
//! Provides stable, testable frame timing without coupling to the runtime.
//! Intended usage:
//! - one `GameClock` per application loop
//! - call `tick()` exactly once per frame to obtain `FrameTime`
//! - call `stop()` on shutdown and log `report()`

mod clock;

pub use clock::{FrameTime, GameClock, TimingReport};
