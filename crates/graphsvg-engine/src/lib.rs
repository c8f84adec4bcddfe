//! graphsvg engine crate.
//!
//! Maps a logical plane onto a fixed-size device surface and draws functions,
//! grids, points and shader surfaces into named layers that replay on every
//! view or size change.

pub mod coords;
pub mod device;
pub mod draw;
pub mod error;
pub mod graph;
pub mod input;
pub mod layer;
pub mod logging;
pub mod scene;
pub mod shader;
pub mod time;

pub use graph::{CommandDecl, Graph, GraphConfig, GraphDecl};
