use core::fmt;

use bytemuck::{Pod, Zeroable};

use crate::coords::{DeviceSize, Extent};
use crate::error::ShaderError;

/// Per-frame uniform block, laid out to match the WGSL `ShaderUniforms`
/// struct (32 bytes, 16-byte aligned).
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct ShaderUniforms {
    /// View corners: `min_x, min_y, max_x, max_y`.
    pub viewport: [f32; 4],
    /// Seconds since the animation clock started.
    pub time: f32,
    pub _pad: [f32; 3],
}

impl ShaderUniforms {
    pub fn new(view: Extent, time: f32) -> Self {
        let [x0, y0, x1, y1] = view.corners();
        Self {
            viewport: [x0 as f32, y0 as f32, x1 as f32, y1 as f32],
            time,
            _pad: [0.0; 3],
        }
    }
}

/// A compiled, allocated fragment pass.
pub trait ShaderProgram {
    /// Reallocates the render target for a new device size. On error the
    /// program keeps its previous target.
    fn resize(&mut self, size: DeviceSize) -> Result<(), ShaderError>;

    /// Renders one frame.
    fn render(&mut self, uniforms: &ShaderUniforms);

    /// Reads back the last rendered frame as tightly packed RGBA8 rows.
    /// Backends that cannot read back return `None`.
    fn read_pixels(&self) -> Option<Vec<u8>> {
        None
    }
}

/// Factory for shader programs. The graph holds at most one.
pub trait RasterBackend {
    /// Compiles `fragment_source` and allocates a surface of `size`.
    ///
    /// Failures are fatal configuration errors and must not be retried.
    fn create_program(
        &mut self,
        fragment_source: &str,
        size: DeviceSize,
    ) -> Result<Box<dyn ShaderProgram>, ShaderError>;
}

/// An opaque reference to a raster surface in a [`RasterStack`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub(crate) u32);

impl SurfaceId {
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SurfaceId({})", self.0)
    }
}

/// One shader-backed raster surface.
pub struct RasterSurface {
    source: String,
    size: DeviceSize,
    frames: u64,
    program: Box<dyn ShaderProgram>,
}

impl RasterSurface {
    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[inline]
    pub fn size(&self) -> DeviceSize {
        self.size
    }

    /// Frames rendered since creation.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    #[inline]
    pub fn read_pixels(&self) -> Option<Vec<u8>> {
        self.program.read_pixels()
    }
}

impl fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterSurface")
            .field("size", &self.size)
            .field("frames", &self.frames)
            .field("source_len", &self.source.len())
            .finish_non_exhaustive()
    }
}

/// Raster surfaces stacked behind the vector scene, in creation order.
///
/// A shader command keeps its surface across redraws. Resetting the owning
/// layer frees it; freed slots are never reused, so stale ids stay dead.
#[derive(Debug, Default)]
pub struct RasterStack {
    surfaces: Vec<Option<RasterSurface>>,
}

impl RasterStack {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Live surfaces.
    pub fn len(&self) -> usize {
        self.surfaces.iter().flatten().count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn insert(
        &mut self,
        source: impl Into<String>,
        size: DeviceSize,
        program: Box<dyn ShaderProgram>,
    ) -> SurfaceId {
        let id = SurfaceId(u32::try_from(self.surfaces.len()).unwrap_or(u32::MAX));
        self.surfaces.push(Some(RasterSurface { source: source.into(), size, frames: 0, program }));
        id
    }

    /// Drops the surface and its program. Returns `false` if `id` was not live.
    pub fn remove(&mut self, id: SurfaceId) -> bool {
        match self.surfaces.get_mut(id.0 as usize) {
            Some(slot) => slot.take().is_some(),
            None => false,
        }
    }

    #[inline]
    pub fn contains(&self, id: SurfaceId) -> bool {
        self.get(id).is_some()
    }

    #[inline]
    pub fn get(&self, id: SurfaceId) -> Option<&RasterSurface> {
        self.surfaces.get(id.0 as usize)?.as_ref()
    }

    /// Iterates back-to-front.
    pub fn iter(&self) -> impl Iterator<Item = (SurfaceId, &RasterSurface)> {
        self.surfaces
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|s| (SurfaceId(i as u32), s)))
    }

    /// Resizes every surface not already at `size`. Surfaces that fail keep
    /// their old size and are reported back.
    pub fn resize_all(&mut self, size: DeviceSize) -> Vec<(SurfaceId, ShaderError)> {
        let mut failed = Vec::new();
        for (i, slot) in self.surfaces.iter_mut().enumerate() {
            let Some(surface) = slot.as_mut().filter(|s| s.size != size) else {
                continue;
            };
            match surface.program.resize(size) {
                Ok(()) => surface.size = size,
                Err(err) => failed.push((SurfaceId(i as u32), err)),
            }
        }
        failed
    }

    pub fn render_all(&mut self, uniforms: &ShaderUniforms) {
        for surface in self.surfaces.iter_mut().flatten() {
            surface.program.render(uniforms);
            surface.frames += 1;
        }
    }
}
