//! Input subsystem.
//!
//! Public API is platform-agnostic. Hosts translate their pointer events into
//! [`PointerEvent`]s and feed them to the graph.

mod pan;
mod types;

pub use pan::{PanPointer, PanState, PointerResponse};
pub use types::{ButtonState, MouseButton, PointerEvent};
