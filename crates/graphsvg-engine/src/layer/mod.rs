//! Layers: replayable command logs, and the registry that creates them.

mod command;
mod ctx;
mod registry;

pub use command::{Command, Layer};
pub use ctx::LayerCtx;
pub use registry::LayerRegistry;
