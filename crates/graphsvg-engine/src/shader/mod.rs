//! Shader-backed raster surfaces.
//!
//! A `shader` command allocates one full-surface fragment pass sized to the
//! graph's device size. Surfaces sit behind the vector scene, survive layer
//! clears, and are re-rendered once per animation frame with the elapsed time
//! and the current view corners.
//!
//! Convention for fragment sources (WGSL):
//! - define `@fragment fn fs_main(in: VertexOut) -> @location(0) vec4<f32>`
//! - `in.uv` is the logical coordinate under the fragment
//! - `u.time` (seconds) and `u.viewport` (`min_x, min_y, max_x, max_y`) are in scope

mod compile;
mod gpu;
mod surface;

pub use compile::{compile_fragment, FRAGMENT_ENTRY, VERTEX_ENTRY};
pub use gpu::GpuBackend;
pub use surface::{RasterBackend, RasterStack, RasterSurface, ShaderProgram, ShaderUniforms, SurfaceId};
