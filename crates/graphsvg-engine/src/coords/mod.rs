//! Coordinate and geometry types shared by the primitives, layers and graph.
//!
//! Two spaces are in play:
//! - logical space: the mathematical plane a graph shows, +Y up
//! - device space: the output canvas in pixels, origin top-left, +Y down
//!
//! [`Extent`] maps between logical space and the unit interval; primitives then
//! scale by the device size and flip Y.

mod extent;
mod size;
mod vec2;

pub use extent::Extent;
pub use size::DeviceSize;
pub use vec2::Vec2;
