//! Time subsystem.
//!
//! Frame timing for animated shader surfaces, decoupled from any host loop.
//! Intended usage:
//! - one `FrameClock` per graph (or per render loop)
//! - call `tick()` once per presented frame and pass the `FrameTime` to `Graph::tick`

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
