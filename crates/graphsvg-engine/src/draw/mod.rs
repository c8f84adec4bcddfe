//! Drawing context and primitives.
//!
//! A primitive is a plain function of a [`RenderFrame`] (where and how big)
//! and its arguments, writing into a [`DrawTarget`]. Layers and the graph go
//! through [`PrimitiveRegistry::invoke`] rather than calling primitives directly.

mod frame;
mod params;
pub mod primitives;
mod range;
mod registry;

pub use frame::{DrawTarget, Handle, RenderFrame};
pub use params::{Func, Param, Props};
pub use range::{grid_steps, samples};
pub use registry::{Primitive, PrimitiveRegistry};
